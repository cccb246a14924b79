//! Vector type for 1D numeric data.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A 1D vector of floating-point values, used for weights and dual
/// coefficients.
///
/// # Examples
///
/// ```
/// use sketchtron::primitives::Vector;
///
/// let mut w = Vector::zeros(3);
/// w.axpy(2.0, &[1.0, 0.0, -1.0]);
/// assert_eq!(w.as_slice(), &[2.0, 0.0, -2.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Copy> Vector<T> {
    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Vector<f32> {
    /// Creates a vector of zeros.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// In-place `self += alpha * x`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if lengths differ.
    pub fn axpy(&mut self, alpha: f32, x: &[f32]) {
        debug_assert_eq!(self.data.len(), x.len());
        for (w, &xi) in self.data.iter_mut().zip(x) {
            *w += alpha * xi;
        }
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.data[idx]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        &mut self.data[idx]
    }
}

#[cfg(test)]
#[path = "tests_vector_contract.rs"]
mod tests;
