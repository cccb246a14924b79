//! Core traits for clustering oracles and classifiers.
//!
//! These traits define the API contracts the compressor and the
//! experiment driver are written against.

use crate::data::LabelSet;
use crate::error::Result;
use crate::primitives::Matrix;

/// Reduces a set of vectors to `k` representative centers.
///
/// Implementations must fail explicitly, never degrade silently, when
/// `x` is empty or `k` cannot be satisfied.
///
/// # Examples
///
/// ```
/// use sketchtron::prelude::*;
///
/// let data = Matrix::from_vec(4, 1, vec![0.0, 0.1, 10.0, 10.1]).expect("4x1");
/// let centers = KMeans::new().cluster(&data, 2).expect("two centers");
/// assert_eq!(centers.shape(), (2, 1));
/// ```
pub trait ClusteringOracle {
    /// Returns a `k x n_features` matrix of centers.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` is empty or `k` is zero or exceeds what
    /// the data supports.
    fn cluster(&self, x: &Matrix<f32>, k: usize) -> Result<Matrix<f32>>;
}

impl<O: ClusteringOracle + ?Sized> ClusteringOracle for &O {
    fn cluster(&self, x: &Matrix<f32>, k: usize) -> Result<Matrix<f32>> {
        (**self).cluster(x, k)
    }
}

/// Multiclass classifier trained on a fixed label set.
///
/// The primal [`crate::classification::Perceptron`] and the dual
/// [`crate::classification::KernelPerceptron`] are interchangeable
/// behind this trait.
///
/// # Examples
///
/// ```
/// use sketchtron::prelude::*;
///
/// let x = Matrix::from_vec(4, 2, vec![
///     1.0, 0.5,
///     2.0, -0.5,
///     -1.0, 0.3,
///     -2.0, -0.2,
/// ]).expect("4x2");
/// let y = vec![0, 0, 1, 1];
///
/// let mut clf = Perceptron::new(LabelSet::range(2).expect("labels"), EpochLimit::Unbounded);
/// clf.fit(&x, &y).expect("separable data");
/// assert_eq!(clf.predict_error(&x, &y).expect("same shape"), 0.0);
/// ```
pub trait Classifier {
    /// The fixed label set the classifier scores against.
    fn labels(&self) -> &LabelSet;

    /// Trains one scorer per label.
    ///
    /// # Errors
    ///
    /// Returns an error on empty input, row/label count mismatch, or a
    /// label outside the label set.
    fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()>;

    /// Predicts one label per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature
    /// dimension differs from the training data.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>>;

    /// Fraction of rows whose predicted label differs from `y`.
    ///
    /// # Errors
    ///
    /// Same as [`Classifier::predict`], plus a row/label count mismatch,
    /// a label outside the label set, or an empty evaluation set.
    fn predict_error(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        self.labels().validate(y)?;
        let predictions = self.predict(x)?;
        crate::metrics::error_rate(&predictions, y)
    }
}
