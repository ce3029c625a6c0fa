//! Classification metrics and label encoding helpers.

use crate::primitives::Matrix;

/// Fraction of predictions matching the true labels.
///
/// # Panics
///
/// Panics if the slices differ in length or are empty.
///
/// # Examples
///
/// ```
/// use adquirir::metrics::accuracy;
///
/// assert_eq!(accuracy(&[0, 1, 2, 1], &[0, 1, 1, 1]), 0.75);
/// ```
#[must_use]
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f32 {
    assert_eq!(y_true.len(), y_pred.len(), "length mismatch");
    assert!(!y_true.is_empty(), "empty input");
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f32 / y_true.len() as f32
}

/// Mean negative log-likelihood of the true labels under a predictive
/// distribution (one row per sample). Probabilities are clamped at 1e-12
/// so degenerate rows stay finite.
///
/// # Panics
///
/// Panics if row count and label count differ, or if a label is out of
/// range for the distribution's width.
#[must_use]
pub fn nll(proba: &Matrix<f32>, y_true: &[usize]) -> f32 {
    assert_eq!(proba.n_rows(), y_true.len(), "row/label count mismatch");
    assert!(!y_true.is_empty(), "empty input");
    let mut total = 0.0f32;
    for (i, &label) in y_true.iter().enumerate() {
        assert!(label < proba.n_cols(), "label {label} out of range");
        total -= proba.get(i, label).max(1e-12).ln();
    }
    total / y_true.len() as f32
}

/// Most probable class per row. Ties break toward the lower class index.
#[must_use]
pub fn argmax_rows(proba: &Matrix<f32>) -> Vec<usize> {
    (0..proba.n_rows())
        .map(|i| {
            let row = proba.row_slice(i);
            let mut best = 0;
            for (c, &p) in row.iter().enumerate() {
                if p > row[best] {
                    best = c;
                }
            }
            best
        })
        .collect()
}

/// One-hot encodes labels into an `n x n_classes` matrix.
///
/// # Panics
///
/// Panics if any label is `>= n_classes`.
#[must_use]
pub fn one_hot(labels: &[usize], n_classes: usize) -> Matrix<f32> {
    let mut out = Matrix::zeros(labels.len(), n_classes);
    for (i, &label) in labels.iter().enumerate() {
        assert!(label < n_classes, "label {label} out of range");
        out.set(i, label, 1.0);
    }
    out
}
