//! Backing dataset abstractions.
//!
//! A [`Dataset`] is an immutable, indexable collection of samples. The
//! pool machinery never mutates it; concrete loading and transform
//! pipelines live outside this crate behind this seam.

use crate::error::{AdquirirError, Result};
use crate::primitives::{Matrix, Vector};
use std::sync::Arc;

/// One item drawn from a dataset: features plus an optional class label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Feature vector.
    pub features: Vector<f32>,
    /// Class label, when the dataset carries one.
    pub label: Option<usize>,
}

/// An immutable, indexable collection of samples.
pub trait Dataset {
    /// Number of samples.
    fn len(&self) -> usize;

    /// Returns true if the dataset has no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feature dimensionality of every sample.
    fn n_features(&self) -> usize;

    /// Returns the sample at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    fn sample(&self, idx: usize) -> Sample;
}

/// In-memory dataset backed by a feature matrix and optional labels.
///
/// # Examples
///
/// ```
/// use adquirir::data::{Dataset, InMemoryDataset};
/// use adquirir::primitives::Matrix;
///
/// let x = Matrix::from_vec(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// let ds = InMemoryDataset::with_labels(x, vec![0, 1, 0]).unwrap();
/// assert_eq!(ds.len(), 3);
/// assert_eq!(ds.sample(1).label, Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    features: Matrix<f32>,
    labels: Option<Vec<usize>>,
}

impl InMemoryDataset {
    /// Creates an unlabelled dataset from a feature matrix.
    #[must_use]
    pub fn new(features: Matrix<f32>) -> Self {
        Self {
            features,
            labels: None,
        }
    }

    /// Creates a labelled dataset.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the label count doesn't match the row count.
    pub fn with_labels(features: Matrix<f32>, labels: Vec<usize>) -> Result<Self> {
        if labels.len() != features.n_rows() {
            return Err(AdquirirError::config(format!(
                "{} labels for {} samples",
                labels.len(),
                features.n_rows()
            )));
        }
        Ok(Self {
            features,
            labels: Some(labels),
        })
    }

    /// Returns true if every sample carries a label.
    #[must_use]
    pub fn is_labelled(&self) -> bool {
        self.labels.is_some()
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.features.n_rows()
    }

    fn n_features(&self) -> usize {
        self.features.n_cols()
    }

    fn sample(&self, idx: usize) -> Sample {
        Sample {
            features: self.features.row(idx),
            label: self.labels.as_ref().map(|y| y[idx]),
        }
    }
}

type Stage = Arc<dyn Fn(&Vector<f32>) -> Vector<f32>>;

/// Dataset wrapper applying a transform and an optional augmentation stage.
///
/// Indexing yields `transform(augmentation(x))`. For acquisition scoring,
/// [`TransformedDataset::scoring_variant`] rebuilds the pipeline with the
/// augmentation stage omitted instead of patching shared state, so the
/// original dataset is untouched.
///
/// # Examples
///
/// ```
/// use adquirir::data::{Dataset, InMemoryDataset, TransformedDataset};
/// use adquirir::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
/// let base = InMemoryDataset::with_labels(x, vec![0, 1]).unwrap();
/// let ds = TransformedDataset::new(base)
///     .with_transform(|v| Vector::from_vec(v.iter().map(|a| a * 10.0).collect()))
///     .with_augmentation(|v| Vector::from_vec(v.iter().map(|a| a + 1.0).collect()));
///
/// assert_eq!(ds.sample(0).features.as_slice(), &[20.0]);
/// // Scoring variant drops the augmentation but keeps the transform.
/// assert_eq!(ds.scoring_variant().sample(0).features.as_slice(), &[10.0]);
/// ```
#[derive(Clone)]
pub struct TransformedDataset<D: Dataset> {
    base: D,
    transform: Option<Stage>,
    augmentation: Option<Stage>,
}

impl<D: Dataset> TransformedDataset<D> {
    /// Wraps a base dataset with an identity pipeline.
    #[must_use]
    pub fn new(base: D) -> Self {
        Self {
            base,
            transform: None,
            augmentation: None,
        }
    }

    /// Sets the transform stage (applied last).
    #[must_use]
    pub fn with_transform(mut self, f: impl Fn(&Vector<f32>) -> Vector<f32> + 'static) -> Self {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Sets the augmentation stage (applied first).
    #[must_use]
    pub fn with_augmentation(mut self, f: impl Fn(&Vector<f32>) -> Vector<f32> + 'static) -> Self {
        self.augmentation = Some(Arc::new(f));
        self
    }

    /// Rebuilds the pipeline without the augmentation stage.
    ///
    /// Scoring should see un-augmented data; this constructs a fresh
    /// variant over the same base rather than mutating shared state.
    #[must_use]
    pub fn scoring_variant(&self) -> Self
    where
        D: Clone,
    {
        Self {
            base: self.base.clone(),
            transform: self.transform.clone(),
            augmentation: None,
        }
    }
}

impl<D: Dataset> Dataset for TransformedDataset<D> {
    fn len(&self) -> usize {
        self.base.len()
    }

    fn n_features(&self) -> usize {
        self.base.n_features()
    }

    fn sample(&self, idx: usize) -> Sample {
        let mut sample = self.base.sample(idx);
        if let Some(aug) = &self.augmentation {
            sample.features = aug(&sample.features);
        }
        if let Some(tf) = &self.transform {
            sample.features = tf(&sample.features);
        }
        sample
    }
}

impl<D: Dataset + std::fmt::Debug> std::fmt::Debug for TransformedDataset<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformedDataset")
            .field("base", &self.base)
            .field("has_transform", &self.transform.is_some())
            .field("has_augmentation", &self.augmentation.is_some())
            .finish()
    }
}
