//! K-Means clustering algorithm.
//!
//! Uses Lloyd's algorithm with a deterministic k-means++-style
//! (farthest point) initialization.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};
use crate::primitives::Matrix;
use crate::traits::ClusteringOracle;

/// K-Means clustering, used as the clustering oracle for sketching.
///
/// # Algorithm
///
/// 1. Seed the first centroid from `random_state`, then repeatedly pick
///    the sample farthest from every chosen centroid
/// 2. Assign each sample to nearest centroid
/// 3. Update centroids as mean of assigned samples
/// 4. Repeat until centroid shift is below `tol` or `max_iter` is hit
///
/// # Examples
///
/// ```
/// use sketchtron::cluster::KMeans;
/// use sketchtron::primitives::Matrix;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     1.0, 2.0,
///     1.5, 1.8,
///     5.0, 8.0,
///     8.0, 8.0,
///     1.0, 0.6,
///     9.0, 11.0,
/// ]).expect("Valid matrix dimensions and data length");
///
/// let fit = KMeans::new().fit(&data, 2).expect("Fit succeeds with valid data");
/// assert_eq!(fit.labels.len(), 6);
/// assert_eq!(fit.centroids.shape(), (2, 2));
/// ```
///
/// # Performance
///
/// - Time complexity: O(nkdi) where n=samples, k=clusters, d=features, i=iterations
/// - Space complexity: O(nk)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance.
    tol: f32,
    /// Random seed for initialization.
    random_state: Option<u64>,
}

/// Result of a K-Means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// `k x n_features` cluster centers.
    pub centroids: Matrix<f32>,
    /// Cluster index of every input row.
    pub labels: Vec<usize>,
    /// Sum of squared distances to the assigned centers.
    pub inertia: f32,
    /// Lloyd iterations run.
    pub n_iter: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new()
    }
}

impl KMeans {
    /// Creates K-Means with `max_iter = 300` and `tol = 1e-4`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_iter: 300,
            tol: 1e-4,
            random_state: None,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Clusters `x` into `k` groups.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `x` is empty
    /// - `k` is zero or larger than the number of samples
    /// - `x` holds fewer than `k` distinct rows
    pub fn fit(&self, x: &Matrix<f32>, k: usize) -> Result<KMeansFit> {
        let n_samples = x.n_rows();

        if n_samples == 0 {
            return Err(SketchError::empty_input("cannot cluster zero samples"));
        }
        if k == 0 {
            return Err(SketchError::invalid_hyperparameter("k", k, ">= 1"));
        }
        if n_samples < k {
            return Err(SketchError::invalid_hyperparameter(
                "k",
                k,
                &format!("<= number of samples ({n_samples})"),
            ));
        }

        let mut centroids = self.farthest_point_init(x, k)?;
        let mut labels = vec![0; n_samples];
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            labels = assign_labels(x, &centroids);
            let new_centroids = update_centroids(x, &labels, &centroids);
            let converged = self.centroids_converged(&centroids, &new_centroids);

            centroids = new_centroids;
            n_iter = iter + 1;
            if converged {
                break;
            }
        }

        if n_iter == 0 {
            labels = assign_labels(x, &centroids);
        }
        let inertia = inertia(x, &centroids, &labels);

        Ok(KMeansFit {
            centroids,
            labels,
            inertia,
            n_iter,
        })
    }

    /// Picks the seeded first centroid, then farthest points.
    fn farthest_point_init(&self, x: &Matrix<f32>, k: usize) -> Result<Matrix<f32>> {
        let (n_samples, n_features) = x.shape();
        let mut centroids_data = Vec::with_capacity(k * n_features);

        let seed = self.random_state.unwrap_or(42);
        let first_idx = (seed % n_samples as u64) as usize;
        centroids_data.extend_from_slice(x.row_slice(first_idx));

        let mut min_distances = vec![f32::INFINITY; n_samples];
        for chosen in 1..k {
            let last = &centroids_data[(chosen - 1) * n_features..chosen * n_features];
            for (i, min_dist) in min_distances.iter_mut().enumerate() {
                let d = squared_distance(x.row_slice(i), last);
                if d < *min_dist {
                    *min_dist = d;
                }
            }

            let mut max_dist = 0.0;
            let mut max_idx = None;
            for (i, &dist) in min_distances.iter().enumerate() {
                if dist > max_dist {
                    max_dist = dist;
                    max_idx = Some(i);
                }
            }

            // every remaining sample coincides with a chosen centroid
            let idx = max_idx.ok_or_else(|| {
                SketchError::invalid_hyperparameter(
                    "k",
                    k,
                    &format!("<= number of distinct samples ({chosen})"),
                )
            })?;
            centroids_data.extend_from_slice(x.row_slice(idx));
        }

        Matrix::from_vec(k, n_features, centroids_data)
    }

    fn centroids_converged(&self, old: &Matrix<f32>, new: &Matrix<f32>) -> bool {
        old.rows()
            .zip(new.rows())
            .all(|(a, b)| squared_distance(a, b) <= self.tol * self.tol)
    }
}

impl ClusteringOracle for KMeans {
    fn cluster(&self, x: &Matrix<f32>, k: usize) -> Result<Matrix<f32>> {
        let fit = self.fit(x, k)?;
        tracing::trace!(k, n_iter = fit.n_iter, inertia = fit.inertia, "k-means finished");
        Ok(fit.centroids)
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Assigns each sample to the nearest centroid (lowest index on ties).
fn assign_labels(x: &Matrix<f32>, centroids: &Matrix<f32>) -> Vec<usize> {
    x.rows()
        .map(|point| {
            let mut min_dist = f32::INFINITY;
            let mut min_cluster = 0;
            for (k, centroid) in centroids.rows().enumerate() {
                let dist = squared_distance(point, centroid);
                if dist < min_dist {
                    min_dist = dist;
                    min_cluster = k;
                }
            }
            min_cluster
        })
        .collect()
}

/// Recomputes centroids as cluster means. A cluster that lost all of its
/// samples keeps its previous center.
fn update_centroids(x: &Matrix<f32>, labels: &[usize], previous: &Matrix<f32>) -> Matrix<f32> {
    let (n_clusters, n_features) = previous.shape();
    let mut sums = Matrix::zeros(n_clusters, n_features);
    let mut counts = vec![0usize; n_clusters];

    for (point, &label) in x.rows().zip(labels) {
        counts[label] += 1;
        for (s, &v) in sums.row_slice_mut(label).iter_mut().zip(point) {
            *s += v;
        }
    }

    for (k, &count) in counts.iter().enumerate() {
        let row = sums.row_slice_mut(k);
        if count == 0 {
            row.copy_from_slice(previous.row_slice(k));
        } else {
            for v in row.iter_mut() {
                *v /= count as f32;
            }
        }
    }

    sums
}

fn inertia(x: &Matrix<f32>, centroids: &Matrix<f32>, labels: &[usize]) -> f32 {
    x.rows()
        .zip(labels)
        .map(|(point, &label)| squared_distance(point, centroids.row_slice(label)))
        .sum()
}

#[cfg(test)]
#[path = "tests_kmeans_contract.rs"]
mod tests;
