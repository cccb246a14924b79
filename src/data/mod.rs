//! Labeled datasets and the fixed label set.
//!
//! A [`Dataset`] is a feature matrix paired with one label per row. Every
//! label must belong to a [`LabelSet`] known before training starts.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};
use crate::primitives::Matrix;

/// The fixed, finite set of class identifiers.
///
/// Labels are kept in ascending order; position `i` in the set is the
/// model row that belongs to `labels()[i]`.
///
/// # Examples
///
/// ```
/// use sketchtron::data::LabelSet;
///
/// let labels = LabelSet::new(vec![2, 0, 1]).expect("distinct labels");
/// assert_eq!(labels.as_slice(), &[0, 1, 2]);
/// assert_eq!(labels.index_of(2), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<usize>,
}

impl LabelSet {
    /// Creates a label set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLabelSet` if `labels` is empty or has duplicates.
    pub fn new(mut labels: Vec<usize>) -> Result<Self> {
        if labels.is_empty() {
            return Err(SketchError::InvalidLabelSet {
                reason: "label set must contain at least one label".to_string(),
            });
        }
        labels.sort_unstable();
        for pair in labels.windows(2) {
            if pair[0] == pair[1] {
                return Err(SketchError::InvalidLabelSet {
                    reason: format!("duplicate label {}", pair[0]),
                });
            }
        }
        Ok(Self { labels })
    }

    /// The label set `{0, 1, ..., n - 1}`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLabelSet` if `n == 0`.
    pub fn range(n: usize) -> Result<Self> {
        Self::new((0..n).collect())
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    /// Position of `label` in the set.
    #[must_use]
    pub fn index_of(&self, label: usize) -> Option<usize> {
        self.labels.binary_search(&label).ok()
    }

    /// Label stored at position `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len()`.
    #[must_use]
    pub fn label_at(&self, idx: usize) -> usize {
        self.labels[idx]
    }

    /// Checks that every entry of `y` belongs to the set.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLabel` for the first label outside the set.
    pub fn validate(&self, y: &[usize]) -> Result<()> {
        match y.iter().find(|&&label| self.index_of(label).is_none()) {
            Some(&label) => Err(SketchError::UnknownLabel { label }),
            None => Ok(()),
        }
    }

    /// One-vs-rest targets: `+1.0` where `y == label`, `-1.0` elsewhere.
    #[must_use]
    pub fn sign_targets(y: &[usize], label: usize) -> Vec<f32> {
        y.iter()
            .map(|&yi| if yi == label { 1.0 } else { -1.0 })
            .collect()
    }
}

/// A labeled dataset: one feature row per label.
///
/// # Examples
///
/// ```
/// use sketchtron::data::{Dataset, LabelSet};
/// use sketchtron::primitives::Matrix;
///
/// let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("3x1");
/// let ds = Dataset::new(x, vec![1, 0, 1]).expect("one label per row");
/// let labels = LabelSet::range(2).expect("two labels");
/// assert_eq!(ds.label_counts(&labels).expect("labels in set"), vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    x: Matrix<f32>,
    y: Vec<usize>,
}

impl Dataset {
    /// Pairs a feature matrix with its labels.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the row and label counts differ.
    pub fn new(x: Matrix<f32>, y: Vec<usize>) -> Result<Self> {
        if x.n_rows() != y.len() {
            return Err(SketchError::dimension_mismatch(
                "n_labels",
                x.n_rows(),
                y.len(),
            ));
        }
        Ok(Self { x, y })
    }

    /// Feature matrix.
    #[must_use]
    pub fn features(&self) -> &Matrix<f32> {
        &self.x
    }

    /// Labels, one per row.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.y
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns true if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Feature dimension.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.x.n_cols()
    }

    /// Splits into `(features, labels)`.
    #[must_use]
    pub fn into_parts(self) -> (Matrix<f32>, Vec<usize>) {
        (self.x, self.y)
    }

    /// Sample count per label, in label-set order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLabel` if a sample's label is not in `labels`.
    pub fn label_counts(&self, labels: &LabelSet) -> Result<Vec<usize>> {
        let mut counts = vec![0usize; labels.len()];
        for &label in &self.y {
            let idx = labels
                .index_of(label)
                .ok_or(SketchError::UnknownLabel { label })?;
            counts[idx] += 1;
        }
        Ok(counts)
    }

    /// Stable partition of the feature rows by label.
    ///
    /// Returns one matrix per label in label-set order, including empty
    /// ones. Rows keep their original relative order within a bucket.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLabel` if a sample's label is not in `labels`.
    pub fn label_buckets(&self, labels: &LabelSet) -> Result<Vec<Matrix<f32>>> {
        let mut indices: Vec<Vec<usize>> = vec![Vec::new(); labels.len()];
        for (row, &label) in self.y.iter().enumerate() {
            let idx = labels
                .index_of(label)
                .ok_or(SketchError::UnknownLabel { label })?;
            indices[idx].push(row);
        }
        Ok(indices
            .iter()
            .map(|rows| self.x.select_rows(rows))
            .collect())
    }

    /// Applies a row permutation to features and labels together.
    ///
    /// # Panics
    ///
    /// Panics if `permutation` holds an out-of-range index.
    #[must_use]
    pub fn permuted(&self, permutation: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(permutation),
            y: permutation.iter().map(|&i| self.y[i]).collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
