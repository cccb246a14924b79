//! Sketchtron: class-stratified k-means sketching and one-vs-rest perceptrons.
//!
//! A large labeled training set is reduced ("sketched") to a small set of
//! per-label cluster centers, then linear and kernel perceptrons are
//! trained on the sketch and evaluated on a held-out test set.
//!
//! # Quick Start
//!
//! ```
//! use sketchtron::prelude::*;
//!
//! let x = Matrix::from_vec(10, 2, vec![
//!     1.0, 0.0,  2.0, 1.0,  3.0, -1.0,  4.0, 0.5,  5.0, -0.5,
//!     -1.0, 0.0, -2.0, 1.0, -3.0, -1.0, -4.0, 0.5, -5.0, -0.5,
//! ]).expect("10x2");
//! let train = Dataset::new(x, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]).expect("10 labels");
//! let labels = LabelSet::range(2).expect("two labels");
//!
//! // Reduce to 4 samples, 2 centers per label
//! let sketch = StratifiedCompressor::new(labels.clone(), KMeans::new())
//!     .compress(&train, 4)
//!     .expect("compression");
//!
//! let mut model = Perceptron::new(labels, EpochLimit::Bounded(5));
//! model.fit(sketch.dataset.features(), sketch.dataset.labels()).expect("fit");
//! let error = model
//!     .predict_error(sketch.dataset.features(), sketch.dataset.labels())
//!     .expect("predict");
//! assert_eq!(error, 0.0);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Row-major `Matrix` and `Vector`
//! - [`data`]: Label sets and labeled datasets
//! - [`cluster`]: K-Means, the default clustering oracle
//! - [`sketch`]: Class-stratified compression
//! - [`classification`]: Primal and kernel one-vs-rest perceptrons
//! - [`metrics`]: Arg-max decoding and error rate
//! - [`store`]: Keyed array persistence
//! - [`experiment`]: Sketch-then-train experiment grid
//! - [`compute`]: Execution context (backend, parallelism)

pub mod classification;
pub mod cluster;
pub mod compute;
pub mod data;
pub mod error;
pub mod experiment;
pub mod metrics;
pub mod prelude;
pub mod primitives;
pub mod sketch;
pub mod store;
pub mod traits;

pub use error::{Result, SketchError};
pub use primitives::{Matrix, Vector};
pub use traits::{Classifier, ClusteringOracle};
