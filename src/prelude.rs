//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use sketchtron::prelude::*;
//! ```

pub use crate::classification::{
    Convergence, EpochLimit, Kernel, KernelPerceptron, Linear, Perceptron, Polynomial,
};
pub use crate::cluster::KMeans;
pub use crate::compute::{Backend, ComputeContext};
pub use crate::data::{Dataset, LabelSet};
pub use crate::error::{Result, SketchError};
pub use crate::experiment::{Experiment, ExperimentConfig, ExperimentReport, Scorer};
pub use crate::metrics::{argmax_rows, error_rate};
pub use crate::primitives::{Matrix, Vector};
pub use crate::sketch::{EmptyBucketPolicy, StratifiedCompressor};
pub use crate::store::{ArrayStore, DirStore, MemoryStore};
pub use crate::traits::{Classifier, ClusteringOracle};
