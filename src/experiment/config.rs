//! Experiment grid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::Scorer;
use crate::error::{Result, SketchError};

/// Which sizes, epoch caps and scorers to run.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
///
/// # Examples
///
/// ```
/// use sketchtron::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::from_json_str(r#"{"reductions": [50], "degrees": [2, 3]}"#)
///     .expect("valid config");
/// assert_eq!(config.reductions, vec![50]);
/// assert_eq!(config.epochs, (1..=10).collect::<Vec<_>>());
/// assert_eq!(config.seed, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Target sizes of the compressed training set.
    pub reductions: Vec<usize>,
    /// Epoch caps to train with.
    pub epochs: Vec<usize>,
    /// Polynomial kernel degrees.
    pub degrees: Vec<u32>,
    /// Also run the primal (dot product) perceptron.
    pub include_linear: bool,
    /// Seed of the post-compression shuffle. The clustering oracle is
    /// passed in already configured and keeps its own seed.
    pub seed: u64,
    /// Run per-label work on a thread pool.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            reductions: vec![200, 1000, 1500],
            epochs: (1..=10).collect(),
            degrees: (1..=6).collect(),
            include_linear: false,
            seed: 42,
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    /// Parses a JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON, unknown fields or invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks that every list is usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` for empty grids or zero sizes/degrees.
    pub fn validate(&self) -> Result<()> {
        if self.reductions.is_empty() {
            return Err(SketchError::invalid_hyperparameter(
                "reductions",
                "[]",
                "at least one target size",
            ));
        }
        if let Some(&zero) = self.reductions.iter().find(|&&r| r == 0) {
            return Err(SketchError::invalid_hyperparameter("reductions", zero, "> 0"));
        }
        if self.epochs.is_empty() {
            return Err(SketchError::invalid_hyperparameter(
                "epochs",
                "[]",
                "at least one epoch cap",
            ));
        }
        if let Some(&zero) = self.degrees.iter().find(|&&d| d == 0) {
            return Err(SketchError::invalid_hyperparameter("degrees", zero, ">= 1"));
        }
        if self.degrees.is_empty() && !self.include_linear {
            return Err(SketchError::invalid_hyperparameter(
                "degrees",
                "[]",
                "at least one degree, or include_linear = true",
            ));
        }
        Ok(())
    }

    /// Scorers to run, linear first.
    #[must_use]
    pub fn scorers(&self) -> Vec<Scorer> {
        let linear = self.include_linear.then_some(Scorer::Linear);
        linear
            .into_iter()
            .chain(self.degrees.iter().map(|&d| Scorer::Polynomial(d)))
            .collect()
    }
}
