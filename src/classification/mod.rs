//! Mistake-driven one-vs-rest classifiers.
//!
//! This module implements:
//! - [`Perceptron`]: one explicit weight vector per label, scored by dot product
//! - [`KernelPerceptron`]: the dual form, scored through a [`Kernel`]
//!
//! Both train every label independently against all others (targets
//! `+1` / `-1`), updating on every sample whose signed score is `<= 0`,
//! and predict the arg-max label with ties going to the lowest label.
//!
//! # Example
//!
//! ```
//! use sketchtron::prelude::*;
//!
//! let x = Matrix::from_vec(6, 2, vec![
//!     2.0, 1.0,
//!     3.0, -1.0,
//!     -2.0, 1.0,
//!     -3.0, -1.0,
//!     0.5, 4.0,
//!     -0.5, 5.0,
//! ]).expect("Matrix dimensions match data length");
//! let y = vec![0, 0, 1, 1, 2, 2];
//!
//! let mut model = Perceptron::new(LabelSet::range(3).expect("labels"), EpochLimit::Bounded(10));
//! model.fit(&x, &y).expect("Training data is valid");
//! let predictions = model.predict(&x).expect("model is fitted");
//! assert_eq!(predictions.len(), 6);
//! ```

mod kernel;
mod perceptron;

pub use kernel::{Kernel, KernelPerceptron, Linear, Polynomial};
pub use perceptron::Perceptron;

use serde::{Deserialize, Serialize};

use crate::data::LabelSet;
use crate::error::{Result, SketchError};
use crate::primitives::Matrix;

/// Cap on full passes over the training data, per label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpochLimit {
    /// At most this many updating passes.
    Bounded(usize),
    /// Run until a pass makes no update. Terminates only on data the
    /// scorer can separate.
    Unbounded,
}

impl EpochLimit {
    fn allows(self, completed: usize) -> bool {
        match self {
            EpochLimit::Bounded(limit) => completed < limit,
            EpochLimit::Unbounded => true,
        }
    }
}

impl From<Option<usize>> for EpochLimit {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(EpochLimit::Unbounded, EpochLimit::Bounded)
    }
}

/// How training of one label ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Convergence {
    /// A full pass made no update. `epochs` counts the passes that did.
    Converged {
        /// Updating passes before the clean one.
        epochs: usize,
    },
    /// The epoch cap was hit before a clean pass.
    EpochLimitReached {
        /// Passes run.
        epochs: usize,
    },
    /// The label has no training samples; its scorer stays zero.
    NoSamples,
}

impl Convergence {
    /// True unless training was cut off by the epoch cap.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Convergence::EpochLimitReached { .. })
    }
}

/// Runs passes over `n_samples` samples until one makes no update or the
/// limit is hit. `step(i)` visits sample `i` and reports whether it updated.
///
/// The limit is checked before each pass, so `Bounded(0)` runs nothing.
fn train_until_clean<F>(limit: EpochLimit, n_samples: usize, mut step: F) -> Convergence
where
    F: FnMut(usize) -> bool,
{
    let mut epochs = 0;
    loop {
        if !limit.allows(epochs) {
            return Convergence::EpochLimitReached { epochs };
        }
        let mut updated = false;
        for i in 0..n_samples {
            updated |= step(i);
        }
        if !updated {
            return Convergence::Converged { epochs };
        }
        epochs += 1;
    }
}

/// Shared input checks for `fit`.
fn validate_training_data(labels: &LabelSet, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(SketchError::dimension_mismatch("n_samples", x.n_rows(), y.len()));
    }
    if x.is_empty() {
        return Err(SketchError::empty_input("cannot fit with zero samples"));
    }
    if x.n_cols() == 0 {
        return Err(SketchError::empty_input("samples have no features"));
    }
    labels.validate(y)
}

fn log_convergence(labels: &LabelSet, convergence: &[Convergence]) {
    for (idx, status) in convergence.iter().enumerate() {
        let label = labels.label_at(idx);
        match status {
            Convergence::Converged { epochs } => {
                tracing::debug!(label, epochs, "label converged");
            }
            Convergence::EpochLimitReached { epochs } => {
                tracing::debug!(label, epochs, "epoch limit reached before convergence");
            }
            Convergence::NoSamples => tracing::debug!(label, "no training samples for label"),
        }
    }
}
