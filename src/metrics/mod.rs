//! Evaluation metrics for the classifiers.

use crate::error::{Result, SketchError};
use crate::primitives::Matrix;

/// Column index of the largest score in every row.
///
/// Ties resolve to the lowest index: the first maximum wins. A row of all
/// zeros therefore maps to column 0.
///
/// # Examples
///
/// ```
/// use sketchtron::metrics::argmax_rows;
/// use sketchtron::primitives::Matrix;
///
/// let scores = Matrix::from_vec(2, 3, vec![0.1, 0.7, 0.7, 0.0, 0.0, 0.0]).expect("2x3");
/// assert_eq!(argmax_rows(&scores), vec![1, 0]);
/// ```
#[must_use]
pub fn argmax_rows(scores: &Matrix<f32>) -> Vec<usize> {
    scores
        .rows()
        .map(|row| {
            let mut best = 0;
            for (j, &v) in row.iter().enumerate().skip(1) {
                if v > row[best] {
                    best = j;
                }
            }
            best
        })
        .collect()
}

/// Fraction of positions where `predicted` differs from `truth`, in `[0, 1]`.
///
/// # Errors
///
/// Returns an error if the slices differ in length or are empty.
///
/// # Examples
///
/// ```
/// use sketchtron::metrics::error_rate;
///
/// let err = error_rate(&[0, 1, 1, 2], &[0, 1, 2, 2]).expect("same length");
/// assert!((err - 0.25).abs() < 1e-6);
/// ```
pub fn error_rate(predicted: &[usize], truth: &[usize]) -> Result<f32> {
    if predicted.len() != truth.len() {
        return Err(SketchError::dimension_mismatch(
            "n_samples",
            predicted.len(),
            truth.len(),
        ));
    }
    if truth.is_empty() {
        return Err(SketchError::empty_input("evaluation set has no samples"));
    }
    let wrong = predicted.iter().zip(truth).filter(|(p, t)| p != t).count();
    Ok(wrong as f32 / truth.len() as f32)
}
