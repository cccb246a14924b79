//! Error types for sketching and perceptron training.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for sketchtron operations.
///
/// Configuration problems (dimension mismatches, bad label sets, invalid
/// hyperparameters) are fatal and never retried. Reaching an epoch cap is
/// not an error; see [`crate::classification::Convergence`].
///
/// # Examples
///
/// ```
/// use sketchtron::error::SketchError;
///
/// let err = SketchError::DimensionMismatch {
///     expected: "n_features=784".to_string(),
///     actual: "10".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum SketchError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Label set is empty or contains duplicates.
    InvalidLabelSet {
        /// What is wrong with the set
        reason: String,
    },

    /// A sample carries a label outside the fixed label set.
    UnknownLabel {
        /// The offending label
        label: usize,
    },

    /// An input that must hold at least one sample was empty.
    EmptyInput {
        /// Where the empty input was found
        context: String,
    },

    /// Clustering was requested for a label with no samples.
    EmptyPartition {
        /// Label whose bucket is empty
        label: usize,
    },

    /// Prediction was requested before `fit`.
    NotFitted {
        /// Model name
        model: String,
    },

    /// Requested compute backend is not available.
    BackendUnavailable {
        /// Backend name (e.g., "cuda")
        backend: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::DimensionMismatch { expected, actual } => {
                write!(f, "Matrix dimension mismatch: expected {expected}, got {actual}")
            }
            SketchError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            SketchError::InvalidLabelSet { reason } => write!(f, "Invalid label set: {reason}"),
            SketchError::UnknownLabel { label } => {
                write!(f, "Label {label} is not a member of the label set")
            }
            SketchError::EmptyInput { context } => write!(f, "Empty input: {context}"),
            SketchError::EmptyPartition { label } => {
                write!(f, "Empty partition: no samples with label {label} to cluster")
            }
            SketchError::NotFitted { model } => {
                write!(f, "{model} not fitted. Call fit() first.")
            }
            SketchError::BackendUnavailable { backend } => {
                write!(f, "Backend not available: {backend}")
            }
            SketchError::Io(e) => write!(f, "I/O error: {e}"),
            SketchError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            SketchError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SketchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SketchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SketchError {
    fn from(err: std::io::Error) -> Self {
        SketchError::Io(err)
    }
}

impl From<serde_json::Error> for SketchError {
    fn from(err: serde_json::Error) -> Self {
        SketchError::Serialization(err.to_string())
    }
}

impl From<&str> for SketchError {
    fn from(msg: &str) -> Self {
        SketchError::Other(msg.to_string())
    }
}

impl From<String> for SketchError {
    fn from(msg: String) -> Self {
        SketchError::Other(msg)
    }
}

impl SketchError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Create an invalid hyperparameter error
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// True for the configuration class of errors (bad shapes, labels or parameters).
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SketchError::DimensionMismatch { .. }
                | SketchError::InvalidHyperparameter { .. }
                | SketchError::InvalidLabelSet { .. }
                | SketchError::UnknownLabel { .. }
        )
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SketchError>;
