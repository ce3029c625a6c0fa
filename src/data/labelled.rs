//! The growing labelled collection.

use crate::error::{AdquirirError, Result};
use crate::primitives::Matrix;

/// Labelled training data: a fixed baseline plus acquired subsets.
///
/// Conceptually append-only; `reset` rolls back to the baseline and is the
/// only way the collection shrinks.
///
/// # Examples
///
/// ```
/// use adquirir::data::LabelledSet;
/// use adquirir::primitives::Matrix;
///
/// let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
/// let mut set = LabelledSet::from_parts(x, vec![0, 1]).unwrap();
/// assert_eq!(set.baseline_len(), 2);
///
/// let acquired = Matrix::from_vec(1, 1, vec![3.0]).unwrap();
/// set.append(&acquired, &[0]).unwrap();
/// assert_eq!(set.len(), 3);
///
/// set.reset();
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LabelledSet {
    features: Vec<f32>, // row-major
    labels: Vec<usize>,
    n_features: usize,
    baseline_len: usize,
}

impl LabelledSet {
    /// Creates a set from a baseline feature matrix and labels.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if label and row counts differ.
    pub fn from_parts(features: Matrix<f32>, labels: Vec<usize>) -> Result<Self> {
        if labels.len() != features.n_rows() {
            return Err(AdquirirError::config(format!(
                "{} labels for {} samples",
                labels.len(),
                features.n_rows()
            )));
        }
        let n_features = features.n_cols();
        let baseline_len = features.n_rows();
        Ok(Self {
            features: features.as_slice().to_vec(),
            labels,
            n_features,
            baseline_len,
        })
    }

    /// Creates an empty set (empty baseline) with the given feature width.
    #[must_use]
    pub fn empty(n_features: usize) -> Self {
        Self {
            features: Vec::new(),
            labels: Vec::new(),
            n_features,
            baseline_len: 0,
        }
    }

    /// Current number of labelled points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Size of the original baseline.
    #[must_use]
    pub fn baseline_len(&self) -> usize {
        self.baseline_len
    }

    /// Feature dimensionality.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Appends a freshly labelled subset.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the subset's width or label count
    /// doesn't line up.
    pub fn append(&mut self, features: &Matrix<f32>, labels: &[usize]) -> Result<()> {
        if features.n_cols() != self.n_features {
            return Err(AdquirirError::shape_mismatch(
                "feature width",
                self.n_features,
                features.n_cols(),
            ));
        }
        if features.n_rows() != labels.len() {
            return Err(AdquirirError::shape_mismatch(
                "subset rows",
                labels.len(),
                features.n_rows(),
            ));
        }
        self.features.extend_from_slice(features.as_slice());
        self.labels.extend_from_slice(labels);
        Ok(())
    }

    /// Rolls back to the baseline, discarding every acquired subset.
    pub fn reset(&mut self) {
        self.features.truncate(self.baseline_len * self.n_features);
        self.labels.truncate(self.baseline_len);
    }

    /// Features of the point at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[must_use]
    pub fn features_of(&self, idx: usize) -> &[f32] {
        let start = idx * self.n_features;
        &self.features[start..start + self.n_features]
    }

    /// Label of the point at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[must_use]
    pub fn label_of(&self, idx: usize) -> usize {
        self.labels[idx]
    }

    /// All labels.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// The full collection as a feature matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f32> {
        Matrix::from_vec(self.len(), self.n_features, self.features.clone())
            .expect("stored rows are rectangular")
    }

    /// Materializes the rows at `indices` as a batch.
    #[must_use]
    pub(crate) fn gather(&self, indices: &[usize]) -> (Matrix<f32>, Vec<usize>) {
        let mut data = Vec::with_capacity(indices.len() * self.n_features);
        let mut labels = Vec::with_capacity(indices.len());
        for &idx in indices {
            data.extend_from_slice(self.features_of(idx));
            labels.push(self.label_of(idx));
        }
        let x = Matrix::from_vec(indices.len(), self.n_features, data)
            .expect("gathered rows are rectangular");
        (x, labels)
    }
}
