//! Matrix type for 2D numeric data.

use crate::error::{Result, SketchError};
use serde::{Deserialize, Serialize};

/// A 2D matrix of floating-point values (row-major storage).
///
/// Rows are samples, columns are features.
///
/// # Examples
///
/// ```
/// use sketchtron::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(SketchError::DimensionMismatch {
                expected: format!("{rows}x{cols}={} elements", rows * cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Returns true if the matrix has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrows a row without copying.
    ///
    /// # Panics
    ///
    /// Panics if `row_idx` is out of bounds.
    #[must_use]
    pub fn row_slice(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Mutably borrows a row.
    ///
    /// # Panics
    ///
    /// Panics if `row_idx` is out of bounds.
    pub fn row_slice_mut(&mut self, row_idx: usize) -> &mut [T] {
        let start = row_idx * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterates over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |i| self.row_slice(i))
    }

    /// Gathers the given rows, in the given order, into a new matrix.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row_slice(i));
        }
        Self {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    /// Stacks matrices vertically.
    ///
    /// # Errors
    ///
    /// Returns an error if column counts differ.
    pub fn vstack(cols: usize, parts: &[Self]) -> Result<Self> {
        let total: usize = parts.iter().map(|p| p.rows).sum();
        let mut data = Vec::with_capacity(total * cols);
        for part in parts {
            if part.cols != cols {
                return Err(SketchError::dimension_mismatch("n_cols", cols, part.cols));
            }
            data.extend_from_slice(&part.data);
        }
        Ok(Self {
            data,
            rows: total,
            cols,
        })
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f32> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Scores every row against every row of `other`: `self · otherᵗ`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column counts differ.
    pub fn matmul_transposed(&self, other: &Self) -> Result<Self> {
        if self.cols != other.cols {
            return Err(SketchError::dimension_mismatch(
                "n_features",
                other.cols,
                self.cols,
            ));
        }

        let mut data = Vec::with_capacity(self.rows * other.rows);
        for a in self.rows() {
            for b in other.rows() {
                data.push(dot(a, b));
            }
        }

        Ok(Self {
            data,
            rows: self.rows,
            cols: other.rows,
        })
    }
}

/// Dot product of two equally long slices.
///
/// Accumulates left to right so results are reproducible bit for bit.
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
