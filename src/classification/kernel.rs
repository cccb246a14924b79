//! Kernels and the dual-form (kernel) perceptron.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::{log_convergence, train_until_clean, validate_training_data, Convergence, EpochLimit};
use crate::compute::ComputeContext;
use crate::data::LabelSet;
use crate::error::{Result, SketchError};
use crate::metrics::argmax_rows;
use crate::primitives::{dot, Matrix, Vector};
use crate::traits::Classifier;

/// Similarity between two feature vectors of equal length.
pub trait Kernel: Debug + Send + Sync {
    /// Evaluates the kernel.
    fn compute(&self, a: &[f32], b: &[f32]) -> f32;

    /// Kernel matrix `K[i][j] = k(a_i, b_j)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature dimensions differ.
    fn matrix(&self, a: &Matrix<f32>, b: &Matrix<f32>) -> Result<Matrix<f32>> {
        if a.n_cols() != b.n_cols() {
            return Err(SketchError::dimension_mismatch("n_features", b.n_cols(), a.n_cols()));
        }
        let mut data = Vec::with_capacity(a.n_rows() * b.n_rows());
        for ai in a.rows() {
            for bj in b.rows() {
                data.push(self.compute(ai, bj));
            }
        }
        Matrix::from_vec(a.n_rows(), b.n_rows(), data)
    }
}

/// Plain dot product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linear;

impl Kernel for Linear {
    fn compute(&self, a: &[f32], b: &[f32]) -> f32 {
        dot(a, b)
    }
}

/// Inhomogeneous polynomial kernel `(1 + <a, b>)^degree`.
///
/// # Examples
///
/// ```
/// use sketchtron::classification::{Kernel, Polynomial};
///
/// let k = Polynomial::new(2).expect("degree >= 1");
/// assert_eq!(k.compute(&[1.0, 2.0], &[3.0, 0.5]), 25.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polynomial {
    degree: u32,
}

impl Polynomial {
    /// Creates a polynomial kernel.
    ///
    /// # Errors
    ///
    /// Returns an error if `degree` is zero.
    pub fn new(degree: u32) -> Result<Self> {
        if degree == 0 {
            return Err(SketchError::invalid_hyperparameter("degree", degree, ">= 1"));
        }
        Ok(Self { degree })
    }

    /// The degree.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.degree
    }
}

impl Kernel for Polynomial {
    fn compute(&self, a: &[f32], b: &[f32]) -> f32 {
        let base = 1.0 + dot(a, b);
        (1..self.degree).fold(base, |acc, _| acc * base)
    }
}

/// One-vs-rest perceptron in dual form.
///
/// Each label keeps a signed coefficient per training sample; the score of
/// `x` for a label is `Σ_j c_j * k(x_j, x)`. A mistake on sample `i` adds
/// its target to `c_i`, mirroring `w += t_i * x_i` in the primal form.
/// With [`Linear`] it makes exactly the predictions of
/// [`super::Perceptron`].
///
/// # Examples
///
/// ```
/// use sketchtron::prelude::*;
///
/// // label 1 on the diagonal band, not linearly separable through the origin
/// let x = Matrix::from_vec(4, 2, vec![1.0, 1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0]).expect("4x2");
/// let y = vec![0, 0, 1, 1];
///
/// let kernel = Polynomial::new(2).expect("degree");
/// let mut model = KernelPerceptron::new(kernel, LabelSet::range(2).expect("labels"), EpochLimit::Bounded(20));
/// model.fit(&x, &y).expect("fit");
/// assert_eq!(model.predict_error(&x, &y).expect("evaluation"), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct KernelPerceptron<K> {
    kernel: K,
    labels: LabelSet,
    epochs: EpochLimit,
    context: ComputeContext,
    /// Training rows with a nonzero coefficient for some label.
    support: Option<Matrix<f32>>,
    /// `n_labels x n_support` signed coefficients.
    coefficients: Option<Matrix<f32>>,
    convergence: Vec<Convergence>,
}

impl<K: Kernel> KernelPerceptron<K> {
    /// Creates an unfitted kernel perceptron.
    #[must_use]
    pub fn new(kernel: K, labels: LabelSet, epochs: EpochLimit) -> Self {
        Self {
            kernel,
            labels,
            epochs,
            context: ComputeContext::default(),
            support: None,
            coefficients: None,
            convergence: Vec::new(),
        }
    }

    /// Sets the compute context; with parallelism on, labels train concurrently.
    #[must_use]
    pub fn with_context(mut self, context: ComputeContext) -> Self {
        self.context = context;
        self
    }

    /// The kernel.
    #[must_use]
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Number of retained training samples.
    #[must_use]
    pub fn n_support(&self) -> usize {
        self.support.as_ref().map_or(0, Matrix::n_rows)
    }

    /// Per-label training outcome of the last `fit`, in label-set order.
    #[must_use]
    pub fn convergence(&self) -> &[Convergence] {
        &self.convergence
    }

    /// True if fitted and no label was cut off by the epoch limit.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.coefficients.is_some() && self.convergence.iter().all(Convergence::is_settled)
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Scores every row against every label.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted or the feature dimension differs.
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (support, coefficients) = match (&self.support, &self.coefficients) {
            (Some(s), Some(c)) => (s, c),
            _ => {
                return Err(SketchError::NotFitted {
                    model: "KernelPerceptron".to_string(),
                })
            }
        };
        if x.n_cols() != support.n_cols() {
            return Err(SketchError::dimension_mismatch(
                "n_features",
                support.n_cols(),
                x.n_cols(),
            ));
        }
        self.kernel
            .matrix(x, support)?
            .matmul_transposed(coefficients)
    }

    fn fit_label(&self, gram: &Matrix<f32>, y: &[usize], label: usize) -> (Vector<f32>, Convergence) {
        let mut c = Vector::zeros(y.len());
        if !y.contains(&label) {
            return (c, Convergence::NoSamples);
        }

        let targets = LabelSet::sign_targets(y, label);
        // the Gram matrix is symmetric, so row i holds k(x_j, x_i) for all j
        let status = train_until_clean(self.epochs, y.len(), |i| {
            let t = targets[i];
            if t * dot(c.as_slice(), gram.row_slice(i)) <= 0.0 {
                c[i] += t;
                true
            } else {
                false
            }
        });
        (c, status)
    }
}

impl<K: Kernel> Classifier for KernelPerceptron<K> {
    fn labels(&self) -> &LabelSet {
        &self.labels
    }

    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        validate_training_data(&self.labels, x, y)?;
        let gram = self.kernel.matrix(x, x)?;

        let rows = self
            .context
            .map_labels(self.labels.len(), |idx| {
                self.fit_label(&gram, y, self.labels.label_at(idx))
            });

        let keep: Vec<usize> = (0..x.n_rows())
            .filter(|&j| rows.iter().any(|(c, _)| c[j] != 0.0))
            .collect();

        let mut coefficients = Matrix::zeros(self.labels.len(), keep.len());
        let mut convergence = Vec::with_capacity(rows.len());
        for (idx, (c, status)) in rows.into_iter().enumerate() {
            for (slot, &j) in coefficients.row_slice_mut(idx).iter_mut().zip(&keep) {
                *slot = c[j];
            }
            convergence.push(status);
        }

        log_convergence(&self.labels, &convergence);
        tracing::debug!(n_support = keep.len(), n_samples = x.n_rows(), "kernel perceptron fitted");
        self.support = Some(x.select_rows(&keep));
        self.coefficients = Some(coefficients);
        self.convergence = convergence;
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let scores = self.decision_function(x)?;
        Ok(argmax_rows(&scores)
            .into_iter()
            .map(|idx| self.labels.label_at(idx))
            .collect())
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
