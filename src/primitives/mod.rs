//! Core compute primitives (Vector, Matrix).
//!
//! These types provide the foundation for the sketching and perceptron code.

mod matrix;
mod vector;

pub use matrix::{dot, Matrix};
pub use vector::Vector;
