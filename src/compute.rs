//! Execution context for the per-label work loops.
//!
//! The context is built once, before any component runs, and is read-only
//! afterwards. Components receive it explicitly instead of consulting
//! process-wide state.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SketchError};

/// Compute backend used for vector arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Portable scalar code.
    #[default]
    Cpu,
    /// CUDA accelerator.
    Cuda,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Cpu => write!(f, "cpu"),
            Backend::Cuda => write!(f, "cuda"),
        }
    }
}

/// Explicit compute configuration passed to compressor and classifiers.
///
/// # Examples
///
/// ```
/// use sketchtron::compute::{Backend, ComputeContext};
///
/// let ctx = ComputeContext::new(Backend::Cpu).expect("cpu is always available");
/// let squares = ctx.map_labels(4, |i| i * i);
/// assert_eq!(squares, vec![0, 1, 4, 9]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputeContext {
    backend: Backend,
    parallel: bool,
}

impl ComputeContext {
    /// Creates a sequential context on the given backend.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` for any backend other than CPU.
    pub fn new(backend: Backend) -> Result<Self> {
        match backend {
            Backend::Cpu => Ok(Self {
                backend,
                parallel: false,
            }),
            other => Err(SketchError::BackendUnavailable {
                backend: other.to_string(),
            }),
        }
    }

    /// Sequential CPU context.
    #[must_use]
    pub fn cpu() -> Self {
        Self::default()
    }

    /// Enables or disables running per-label work on a thread pool.
    ///
    /// Without the `parallel` feature the flag is recorded but work stays
    /// on the calling thread.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        #[cfg(not(feature = "parallel"))]
        {
            if parallel {
                tracing::warn!(
                    "parallel execution requested but the `parallel` feature is disabled"
                );
            }
        }
        self.parallel = parallel;
        self
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Returns true if per-label work may run concurrently.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Runs `f` for every label index in `0..n_labels`, returning results in index order.
    ///
    /// Each invocation owns its slot of the output; no state is shared
    /// between invocations.
    pub fn map_labels<T, F>(&self, n_labels: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return (0..n_labels).into_par_iter().map(f).collect();
            }
        }
        (0..n_labels).map(f).collect()
    }
}
