//! Primal multiclass perceptron.

use serde::{Deserialize, Serialize};

use super::{log_convergence, train_until_clean, validate_training_data, Convergence, EpochLimit};
use crate::compute::ComputeContext;
use crate::data::LabelSet;
use crate::error::{Result, SketchError};
use crate::metrics::argmax_rows;
use crate::primitives::{dot, Matrix, Vector};
use crate::traits::Classifier;

/// One-vs-rest perceptron with one weight vector per label.
///
/// For each label the weights start at zero; every sample with
/// `target * dot(w, x) <= 0` adds `target * x` to `w`. Samples sitting
/// exactly on the boundary count as mistakes.
///
/// # Examples
///
/// ```
/// use sketchtron::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, -1.0, -2.0]).expect("4x1");
/// let y = vec![0, 0, 1, 1];
///
/// let mut model = Perceptron::new(LabelSet::range(2).expect("labels"), EpochLimit::Unbounded);
/// model.fit(&x, &y).expect("separable data");
/// assert!(model.is_converged());
/// assert_eq!(model.predict(&x).expect("fitted"), y);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perceptron {
    labels: LabelSet,
    epochs: EpochLimit,
    #[serde(skip)]
    context: ComputeContext,
    /// `n_labels x n_features`, row `i` belongs to `labels.label_at(i)`.
    model: Option<Matrix<f32>>,
    convergence: Vec<Convergence>,
}

impl Perceptron {
    /// Creates an unfitted perceptron.
    #[must_use]
    pub fn new(labels: LabelSet, epochs: EpochLimit) -> Self {
        Self {
            labels,
            epochs,
            context: ComputeContext::default(),
            model: None,
            convergence: Vec::new(),
        }
    }

    /// Sets the compute context; with parallelism on, labels train concurrently.
    #[must_use]
    pub fn with_context(mut self, context: ComputeContext) -> Self {
        self.context = context;
        self
    }

    /// The epoch limit.
    #[must_use]
    pub fn epochs(&self) -> EpochLimit {
        self.epochs
    }

    /// The weight matrix, if fitted.
    #[must_use]
    pub fn model(&self) -> Option<&Matrix<f32>> {
        self.model.as_ref()
    }

    /// Per-label training outcome of the last `fit`, in label-set order.
    #[must_use]
    pub fn convergence(&self) -> &[Convergence] {
        &self.convergence
    }

    /// True if fitted and no label was cut off by the epoch limit.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.model.is_some() && self.convergence.iter().all(Convergence::is_settled)
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Scores every row against every label: `x · Wᵗ`.
    ///
    /// # Errors
    ///
    /// Returns an error if unfitted or the feature dimension differs.
    pub fn decision_function(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let model = self.model.as_ref().ok_or_else(|| SketchError::NotFitted {
            model: "Perceptron".to_string(),
        })?;
        if x.n_cols() != model.n_cols() {
            return Err(SketchError::dimension_mismatch(
                "n_features",
                model.n_cols(),
                x.n_cols(),
            ));
        }
        x.matmul_transposed(model)
    }

    fn fit_label(&self, x: &Matrix<f32>, y: &[usize], label: usize) -> (Vector<f32>, Convergence) {
        let mut w = Vector::zeros(x.n_cols());
        if !y.contains(&label) {
            return (w, Convergence::NoSamples);
        }

        let targets = LabelSet::sign_targets(y, label);
        let status = train_until_clean(self.epochs, x.n_rows(), |i| {
            let point = x.row_slice(i);
            let t = targets[i];
            if t * dot(w.as_slice(), point) <= 0.0 {
                w.axpy(t, point);
                true
            } else {
                false
            }
        });
        (w, status)
    }
}

impl Classifier for Perceptron {
    fn labels(&self) -> &LabelSet {
        &self.labels
    }

    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        validate_training_data(&self.labels, x, y)?;

        let rows = self
            .context
            .map_labels(self.labels.len(), |idx| {
                self.fit_label(x, y, self.labels.label_at(idx))
            });

        let mut model = Matrix::zeros(self.labels.len(), x.n_cols());
        let mut convergence = Vec::with_capacity(rows.len());
        for (idx, (w, status)) in rows.into_iter().enumerate() {
            model.row_slice_mut(idx).copy_from_slice(w.as_slice());
            convergence.push(status);
        }

        log_convergence(&self.labels, &convergence);
        self.model = Some(model);
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
#[path = "perceptron_tests.rs"]
mod tests;
