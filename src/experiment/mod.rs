//! Sketch-then-train experiment driver.
//!
//! Compresses the training set to every configured target size, stores
//! the results, then fits one classifier per `(target size, epochs, scorer)`
//! configuration and records training time plus training and test error.
//!
//! A failing configuration is recorded in the report and does not stop
//! the others.

mod config;
mod report;

pub use config::ExperimentConfig;
pub use report::{ExperimentReport, ResultGrid, RunOutcome, RunRecord, Scorer, SketchOutcome};

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{info, warn};

use crate::classification::{EpochLimit, KernelPerceptron, Perceptron, Polynomial};
use crate::compute::ComputeContext;
use crate::data::{Dataset, LabelSet};
use crate::error::Result;
use crate::sketch::StratifiedCompressor;
use crate::store::ArrayStore;
use crate::traits::{Classifier, ClusteringOracle};

/// Store key of the test features.
pub const X_TEST_KEY: &str = "x_test";
/// Store key of the test labels.
pub const Y_TEST_KEY: &str = "y_test";

/// Store key of the compressed features for `target_size`.
#[must_use]
pub fn x_train_key(target_size: usize) -> String {
    format!("{target_size}/x_train_km")
}

/// Store key of the compressed labels for `target_size`.
#[must_use]
pub fn y_train_key(target_size: usize) -> String {
    format!("{target_size}/y_train_km")
}

/// Runs the sketching and training grid described by an [`ExperimentConfig`].
#[derive(Debug)]
pub struct Experiment<O, S> {
    config: ExperimentConfig,
    labels: LabelSet,
    oracle: O,
    store: S,
    context: ComputeContext,
}

impl<O: ClusteringOracle + Sync, S: ArrayStore> Experiment<O, S> {
    /// Creates a driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ExperimentConfig, labels: LabelSet, oracle: O, store: S) -> Result<Self> {
        config.validate()?;
        let context = ComputeContext::cpu().with_parallel(config.parallel);
        Ok(Self {
            config,
            labels,
            oracle,
            store,
            context,
        })
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compresses `train` to every configured size and stores the results.
    ///
    /// A size that fails to compress or save is recorded as failed.
    pub fn compress_all(&self, train: &Dataset) -> BTreeMap<usize, SketchOutcome> {
        let compressor = StratifiedCompressor::new(self.labels.clone(), &self.oracle)
            .with_random_state(self.config.seed)
            .with_context(self.context);

        let mut outcomes = BTreeMap::new();
        for &target_size in &self.config.reductions {
            info!(target_size, "sketching training set");
            let start = Instant::now();
            let outcome = compressor
                .compress(train, target_size)
                .and_then(|sketch| {
                    let seconds = start.elapsed().as_secs_f64();
                    self.store
                        .save_matrix(&x_train_key(target_size), sketch.dataset.features())?;
                    self.store
                        .save_labels(&y_train_key(target_size), sketch.dataset.labels())?;
                    Ok(SketchOutcome::Completed {
                        seconds,
                        size: sketch.dataset.len(),
                        summary: sketch.summary,
                    })
                })
                .unwrap_or_else(|e| {
                    warn!(target_size, error = %e, "sketching failed");
                    SketchOutcome::Failed {
                        error: e.to_string(),
                    }
                });
            outcomes.insert(target_size, outcome);
        }
        outcomes
    }

    /// Fits and evaluates every configuration on the stored compressed sets.
    ///
    /// # Errors
    ///
    /// Returns an error only if the test set cannot be loaded; per-size and
    /// per-configuration failures are recorded in the report.
    pub fn evaluate_all(&self) -> Result<ResultGrid> {
        let test = Dataset::new(
            self.store.load_matrix(X_TEST_KEY)?,
            self.store.load_labels(Y_TEST_KEY)?,
        )?;

        let mut results = BTreeMap::new();
        for &target_size in &self.config.reductions {
            let train = self
                .store
                .load_matrix(&x_train_key(target_size))
                .and_then(|x| Dataset::new(x, self.store.load_labels(&y_train_key(target_size))?));

            let mut by_epochs = BTreeMap::new();
            for &epochs in &self.config.epochs {
                let mut by_scorer = BTreeMap::new();
                for scorer in self.config.scorers() {
                    let outcome = match &train {
                        Ok(train) => self.run_one(train, &test, epochs, scorer),
                        Err(e) => RunOutcome::Failed {
                            error: format!("compressed set unavailable: {e}"),
                        },
                    };
                    by_scorer.insert(scorer, outcome);
                }
                by_epochs.insert(epochs, by_scorer);
            }
            results.insert(target_size, by_epochs);
        }
        Ok(results)
    }

    /// Stores the test set, compresses, then evaluates every configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the test set cannot be stored or reloaded.
    pub fn run(&self, train: &Dataset, test: &Dataset) -> Result<ExperimentReport> {
        self.store.save_matrix(X_TEST_KEY, test.features())?;
        self.store.save_labels(Y_TEST_KEY, test.labels())?;

        let sketching = self.compress_all(train);
        let results = self.evaluate_all()?;
        Ok(ExperimentReport { sketching, results })
    }

    fn run_one(&self, train: &Dataset, test: &Dataset, epochs: usize, scorer: Scorer) -> RunOutcome {
        let limit = EpochLimit::Bounded(epochs);
        let outcome = match scorer {
            Scorer::Linear => {
                let model = Perceptron::new(self.labels.clone(), limit).with_context(self.context);
                evaluate(model, train, test)
            }
            Scorer::Polynomial(degree) => Polynomial::new(degree).and_then(|kernel| {
                let model = KernelPerceptron::new(kernel, self.labels.clone(), limit)
                    .with_context(self.context);
                evaluate(model, train, test)
            }),
        };

        outcome.map_or_else(
            |e| {
                warn!(epochs, %scorer, error = %e, "configuration failed");
                RunOutcome::Failed {
                    error: e.to_string(),
                }
            },
            RunOutcome::Completed,
        )
    }
}

/// Fits `model` on `train`, timing the fit, then scores both sets.
fn evaluate<C: Classifier>(mut model: C, train: &Dataset, test: &Dataset) -> Result<RunRecord> {
    let start = Instant::now();
    model.fit(train.features(), train.labels())?;
    let training_time = start.elapsed().as_secs_f64();

    Ok(RunRecord {
        training_time,
        training_error: model.predict_error(train.features(), train.labels())?,
        test_error: model.predict_error(test.features(), test.labels())?,
    })
}
