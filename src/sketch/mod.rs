//! Class-stratified dataset compression ("sketching").
//!
//! The dataset is split into one bucket per label, each bucket is reduced
//! to a number of cluster centers proportional to its share of the data,
//! and the centers are relabeled and shuffled into a new, smaller dataset.
//!
//! # Example
//!
//! ```
//! use sketchtron::prelude::*;
//!
//! let x = Matrix::from_vec(10, 2, vec![
//!     1.0, 0.0,  2.0, 1.0,  3.0, -1.0,  4.0, 0.5,  5.0, -0.5,
//!     -1.0, 0.0, -2.0, 1.0, -3.0, -1.0, -4.0, 0.5, -5.0, -0.5,
//! ]).expect("10x2");
//! let train = Dataset::new(x, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]).expect("10 labels");
//!
//! let compressor = StratifiedCompressor::new(LabelSet::range(2).expect("labels"), KMeans::new());
//! let sketch = compressor.compress(&train, 4).expect("compression");
//! assert_eq!(sketch.dataset.len(), 4);
//! assert_eq!(sketch.summary.centers_per_label, vec![2, 2]);
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compute::ComputeContext;
use crate::data::{Dataset, LabelSet};
use crate::error::{Result, SketchError};
use crate::primitives::Matrix;
use crate::traits::ClusteringOracle;

/// Smallest number of centers any label is reduced to.
pub const MIN_CENTERS_PER_LABEL: usize = 2;

/// What to do with a label that has no samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBucketPolicy {
    /// Abort with [`SketchError::EmptyPartition`].
    #[default]
    Fail,
    /// Leave the label out of the compressed dataset.
    Skip,
}

/// Per-label bookkeeping of one compression run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionSummary {
    /// Samples per label in the input, in label-set order.
    pub bucket_sizes: Vec<usize>,
    /// Centers produced per label, in label-set order (0 for skipped labels).
    pub centers_per_label: Vec<usize>,
    /// Labels left out because they had no samples.
    pub skipped_labels: Vec<usize>,
}

/// A compressed dataset and how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedDataset {
    /// Shuffled centers tagged with their label.
    pub dataset: Dataset,
    /// Per-label sizes.
    pub summary: CompressionSummary,
}

/// Number of centers for a bucket of `bucket_len` samples out of `total`
/// when the whole dataset is reduced to `target_size`.
///
/// `max(2, floor(bucket_len * target_size / total))`.
///
/// # Errors
///
/// Returns an error if `total` is zero or the product overflows.
///
/// # Examples
///
/// ```
/// use sketchtron::sketch::centers_for;
///
/// assert_eq!(centers_for(5, 4, 10).expect("valid sizes"), 2);
/// assert_eq!(centers_for(5_923, 200, 60_000).expect("valid sizes"), 19);
/// assert_eq!(centers_for(0, 200, 60_000).expect("valid sizes"), 2);
/// ```
pub fn centers_for(bucket_len: usize, target_size: usize, total: usize) -> Result<usize> {
    if total == 0 {
        return Err(SketchError::empty_input("dataset has no samples"));
    }
    let scaled = bucket_len.checked_mul(target_size).ok_or_else(|| {
        SketchError::invalid_hyperparameter(
            "target_size",
            target_size,
            "small enough that bucket_len * target_size fits in usize",
        )
    })?;
    Ok((scaled / total).max(MIN_CENTERS_PER_LABEL))
}

/// Reduces a labeled dataset to a target size, label by label.
///
/// The clustering oracle is invoked once per label, with the label's
/// bucket and its center count. Buckets are independent, so with a
/// parallel [`ComputeContext`] they are clustered concurrently; the result
/// is assembled in label order either way.
#[derive(Debug, Clone)]
pub struct StratifiedCompressor<O> {
    labels: LabelSet,
    oracle: O,
    random_state: u64,
    empty_bucket_policy: EmptyBucketPolicy,
    context: ComputeContext,
}

impl<O: ClusteringOracle + Sync> StratifiedCompressor<O> {
    /// Creates a compressor over `labels` using `oracle` for clustering.
    #[must_use]
    pub fn new(labels: LabelSet, oracle: O) -> Self {
        Self {
            labels,
            oracle,
            random_state: 42,
            empty_bucket_policy: EmptyBucketPolicy::default(),
            context: ComputeContext::default(),
        }
    }

    /// Sets the seed of the final shuffle.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Sets the handling of labels without samples.
    #[must_use]
    pub fn with_empty_bucket_policy(mut self, policy: EmptyBucketPolicy) -> Self {
        self.empty_bucket_policy = policy;
        self
    }

    /// Sets the compute context.
    #[must_use]
    pub fn with_context(mut self, context: ComputeContext) -> Self {
        self.context = context;
        self
    }

    /// The label set.
    #[must_use]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Compresses `dataset` to roughly `target_size` samples.
    ///
    /// The result holds exactly `Σ centers_for(bucket, target_size, N)`
    /// samples over the labels that were not skipped. The input is not
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns an error if `target_size` is zero, `dataset` is empty, a
    /// label is outside the label set, a bucket is empty under
    /// [`EmptyBucketPolicy::Fail`], or the oracle fails or returns a
    /// wrongly shaped center set.
    pub fn compress(&self, dataset: &Dataset, target_size: usize) -> Result<CompressedDataset> {
        if target_size == 0 {
            return Err(SketchError::invalid_hyperparameter(
                "target_size",
                target_size,
                "> 0",
            ));
        }
        if dataset.is_empty() {
            return Err(SketchError::empty_input("cannot compress an empty dataset"));
        }

        let total = dataset.len();
        let n_features = dataset.n_features();
        let buckets = dataset.label_buckets(&self.labels)?;
        let bucket_sizes: Vec<usize> = buckets.iter().map(Matrix::n_rows).collect();

        let centers = self
            .context
            .map_labels(self.labels.len(), |idx| {
                self.cluster_bucket(idx, &buckets[idx], target_size, total)
            })
            .into_iter()
            .collect::<Result<Vec<Option<Matrix<f32>>>>>()?;

        let mut parts = Vec::with_capacity(centers.len());
        let mut y = Vec::new();
        let mut centers_per_label = Vec::with_capacity(centers.len());
        let mut skipped_labels = Vec::new();
        for (idx, center_set) in centers.into_iter().enumerate() {
            let label = self.labels.label_at(idx);
            match center_set {
                Some(c) => {
                    centers_per_label.push(c.n_rows());
                    y.extend(std::iter::repeat(label).take(c.n_rows()));
                    parts.push(c);
                }
                None => {
                    centers_per_label.push(0);
                    skipped_labels.push(label);
                }
            }
        }

        let provisional = Dataset::new(Matrix::vstack(n_features, &parts)?, y)?;

        let mut permutation: Vec<usize> = (0..provisional.len()).collect();
        let mut rng = StdRng::seed_from_u64(self.random_state);
        permutation.shuffle(&mut rng);
        let dataset = provisional.permuted(&permutation);

        info!(
            input = total,
            target_size,
            output = dataset.len(),
            skipped = skipped_labels.len(),
            "compressed dataset"
        );

        Ok(CompressedDataset {
            dataset,
            summary: CompressionSummary {
                bucket_sizes,
                centers_per_label,
                skipped_labels,
            },
        })
    }

    /// Clusters one label's bucket. `None` means the label was skipped.
    fn cluster_bucket(
        &self,
        idx: usize,
        bucket: &Matrix<f32>,
        target_size: usize,
        total: usize,
    ) -> Result<Option<Matrix<f32>>> {
        let label = self.labels.label_at(idx);
        if bucket.is_empty() {
            return match self.empty_bucket_policy {
                EmptyBucketPolicy::Fail => Err(SketchError::EmptyPartition { label }),
                EmptyBucketPolicy::Skip => {
                    debug!(label, "skipping label without samples");
                    Ok(None)
                }
            };
        }

        let k = centers_for(bucket.n_rows(), target_size, total)?;
        let centers = self.oracle.cluster(bucket, k)?;
        if centers.n_rows() != k {
            return Err(SketchError::dimension_mismatch("n_centers", k, centers.n_rows()));
        }
        if centers.n_cols() != bucket.n_cols() {
            return Err(SketchError::dimension_mismatch(
                "n_features",
                bucket.n_cols(),
                centers.n_cols(),
            ));
        }

        debug!(label, bucket = bucket.n_rows(), centers = k, "clustered label bucket");
        Ok(Some(centers))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
