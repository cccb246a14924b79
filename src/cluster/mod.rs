//! Clustering oracles.
//!
//! Includes K-Means clustering with deterministic farthest-point seeding.

mod kmeans;

pub use kmeans::{KMeans, KMeansFit};
