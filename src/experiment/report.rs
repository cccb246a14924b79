//! Experiment results.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SketchError};
use crate::sketch::CompressionSummary;

/// Scoring rule of one configuration.
///
/// Serialized as `"linear"` or the polynomial degree (`"3"`), which makes
/// it usable as a JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scorer {
    /// Primal perceptron, plain dot product.
    Linear,
    /// Kernel perceptron with a polynomial kernel of this degree.
    Polynomial(u32),
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scorer::Linear => write!(f, "linear"),
            Scorer::Polynomial(degree) => write!(f, "{degree}"),
        }
    }
}

impl FromStr for Scorer {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "linear" {
            return Ok(Scorer::Linear);
        }
        s.parse::<u32>().map(Scorer::Polynomial).map_err(|_| {
            SketchError::invalid_hyperparameter("scorer", s, "\"linear\" or a polynomial degree")
        })
    }
}

impl Serialize for Scorer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scorer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Metrics of one fitted configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Wall-clock seconds spent in `fit`.
    pub training_time: f64,
    /// Error rate on the compressed training set.
    pub training_error: f32,
    /// Error rate on the test set.
    pub test_error: f32,
}

/// Result of one configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunOutcome {
    /// Fit and evaluation succeeded.
    Completed(RunRecord),
    /// The configuration failed; the others were unaffected.
    Failed {
        /// Error message
        error: String,
    },
}

impl RunOutcome {
    /// The record, if the run completed.
    #[must_use]
    pub fn record(&self) -> Option<&RunRecord> {
        match self {
            RunOutcome::Completed(record) => Some(record),
            RunOutcome::Failed { .. } => None,
        }
    }
}

/// Result of compressing to one target size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SketchOutcome {
    /// Compression and storage succeeded.
    Completed {
        /// Wall-clock seconds spent compressing.
        seconds: f64,
        /// Samples in the compressed set.
        size: usize,
        /// Per-label center counts.
        summary: CompressionSummary,
    },
    /// Compression failed for this size.
    Failed {
        /// Error message
        error: String,
    },
}

/// `target_size -> epochs -> scorer -> outcome`.
pub type ResultGrid = BTreeMap<usize, BTreeMap<usize, BTreeMap<Scorer, RunOutcome>>>;

/// Everything one experiment produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Compression outcome per target size.
    pub sketching: BTreeMap<usize, SketchOutcome>,
    /// Training outcome per configuration.
    pub results: ResultGrid,
}

impl ExperimentReport {
    /// Looks up one configuration.
    #[must_use]
    pub fn get(&self, target_size: usize, epochs: usize, scorer: Scorer) -> Option<&RunOutcome> {
        self.results.get(&target_size)?.get(&epochs)?.get(&scorer)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
