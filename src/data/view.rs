//! Indexable projection over the unlabelled pool.

use super::batch::PoolBatches;
use super::dataset::{Dataset, Sample};
use super::pool::PoolIndex;
use crate::error::{AdquirirError, Result};
use crate::primitives::{Matrix, Vector};
use std::cell::Cell;

/// Maps an absolute pool index and its features to a class label.
///
/// Stands in for a human annotator or oracle when the pool isn't
/// self-labelled.
pub type LabelFn = Box<dyn Fn(usize, &Vector<f32>) -> usize>;

/// A logically-shrinking view over an immutable unlabelled pool.
///
/// Labelling points removes them from this view without touching the
/// backing dataset. When the pool is self-labelled (constructed with
/// [`UnlabelledView::new`] over a labelled dataset), indexing hides the
/// labels unless a [`LabelScope`] is active; when an external labelling
/// function is supplied, indexing never yields labels.
///
/// # Examples
///
/// ```
/// use adquirir::data::{InMemoryDataset, UnlabelledView};
/// use adquirir::primitives::Matrix;
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
/// let ds = InMemoryDataset::with_labels(x, vec![0, 1, 1, 0]).unwrap();
/// let mut pool = UnlabelledView::new(ds).unwrap();
///
/// let (subset, labels) = pool.label(&[1, 2]).unwrap();
/// assert_eq!(subset.n_rows(), 2);
/// assert_eq!(labels, vec![1, 1]);
/// assert_eq!(pool.len(), 2);
/// assert_eq!(pool.labelled_indices(), vec![1, 2]);
/// ```
pub struct UnlabelledView<D: Dataset> {
    dataset: D,
    index: PoolIndex,
    label_fn: Option<LabelFn>,
    expose_labels: Cell<bool>,
    // (absolute index, class) observed at label() time
    observed: Vec<(usize, usize)>,
}

impl<D: Dataset> UnlabelledView<D> {
    /// Creates a view over a self-labelled pool (benchmarking mode).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the dataset carries no labels; a
    /// self-labelled pool must be able to answer `label()` on its own.
    pub fn new(dataset: D) -> Result<Self> {
        if dataset.len() > 0 && dataset.sample(0).label.is_none() {
            return Err(AdquirirError::config(
                "self-labelled pool requires a labelled dataset; use with_label_fn instead",
            ));
        }
        let n = dataset.len();
        Ok(Self {
            dataset,
            index: PoolIndex::new(n),
            label_fn: None,
            expose_labels: Cell::new(false),
            observed: Vec::new(),
        })
    }

    /// Creates a view over a genuinely unlabelled pool; `label_fn` is
    /// consulted for every acquired point.
    #[must_use]
    pub fn with_label_fn(dataset: D, label_fn: LabelFn) -> Self {
        let n = dataset.len();
        Self {
            dataset,
            index: PoolIndex::new(n),
            label_fn: Some(label_fn),
            expose_labels: Cell::new(false),
            observed: Vec::new(),
        }
    }

    /// Current pool size.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the pool has been exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Size N of the backing collection.
    #[must_use]
    pub fn total(&self) -> usize {
        self.index.total()
    }

    /// Feature dimensionality.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.dataset.n_features()
    }

    /// Returns the backing dataset.
    #[must_use]
    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Returns the bookkeeping index.
    #[must_use]
    pub fn index(&self) -> &PoolIndex {
        &self.index
    }

    /// Returns the item at logical index `i`.
    ///
    /// The label is populated only for a self-labelled pool while a
    /// [`LabelScope`] is active; otherwise callers see features alone.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[must_use]
    pub fn get(&self, i: usize) -> Sample {
        let absolute = self.to_absolute_one(i);
        let mut sample = self.dataset.sample(absolute);
        if self.label_fn.is_some() || !self.expose_labels.get() {
            sample.label = None;
        }
        sample
    }

    fn to_absolute_one(&self, i: usize) -> usize {
        assert!(i < self.len(), "logical index {i} out of pool bounds");
        self.index
            .to_absolute(std::slice::from_ref(&i))
            .expect("bounds checked above")[0]
    }

    /// Exposes labels while the returned guard lives.
    ///
    /// The guard records the flag value it found and restores exactly that
    /// value on drop, so scopes nest correctly.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when an external labelling function is
    /// configured, since such a pool has no true labels to expose.
    pub fn expose_labels(&self) -> Result<LabelScope<'_>> {
        if self.label_fn.is_some() {
            return Err(AdquirirError::config(
                "cannot expose labels on an externally-labelled pool",
            ));
        }
        Ok(LabelScope::new(&self.expose_labels))
    }

    /// Translates logical indices to absolute indices.
    ///
    /// Call before [`UnlabelledView::label`]: labelling invalidates the
    /// mapping for the requested positions.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyLabelled` for stale indices.
    pub fn convert_index(&self, idxs: &[usize]) -> Result<Vec<usize>> {
        self.index.to_absolute(idxs)
    }

    /// Labels the points at the given logical indices and removes them
    /// from the pool.
    ///
    /// Returns the freshly labelled subset as a feature matrix plus its
    /// labels. All-or-nothing: a failed request leaves the pool unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyLabelled` for stale or duplicated indices, and
    /// `Config` if a self-labelled pool item unexpectedly lacks a label.
    pub fn label(&mut self, idxs: &[usize]) -> Result<(Matrix<f32>, Vec<usize>)> {
        if idxs.is_empty() {
            let empty = Matrix::from_vec(0, self.n_features(), Vec::new())
                .map_err(AdquirirError::from)?;
            return Ok((empty, Vec::new()));
        }
        let absolute = self.index.to_absolute(idxs)?;

        // materialize the subset before any mutation
        let mut rows = Vec::with_capacity(absolute.len());
        let mut labels = Vec::with_capacity(absolute.len());
        for &abs in &absolute {
            let sample = self.dataset.sample(abs);
            let class = match &self.label_fn {
                Some(f) => f(abs, &sample.features),
                None => sample.label.ok_or_else(|| {
                    AdquirirError::config(format!("pool item {abs} carries no label"))
                })?,
            };
            rows.push(sample.features);
            labels.push(class);
        }

        // deactivate validates duplicates/staleness and only then mutates
        self.index.deactivate(&absolute)?;
        self.observed
            .extend(absolute.iter().copied().zip(labels.iter().copied()));

        let subset = Matrix::from_rows(&rows).map_err(AdquirirError::from)?;
        Ok((subset, labels))
    }

    /// Absolute positions labelled so far, ascending.
    #[must_use]
    pub fn labelled_indices(&self) -> Vec<usize> {
        self.index.labelled_indices()
    }

    /// The class observed for each labelled index, in ascending absolute
    /// order.
    ///
    /// Meaningful for self-labelled pools; with an external labelling
    /// function this returns the classes the function produced, and a
    /// usage warning is emitted because those are not ground truth.
    #[must_use]
    pub fn labelled_classes(&self) -> Vec<usize> {
        if self.label_fn.is_some() {
            eprintln!(
                "warning: labelled_classes() called on an externally-labelled pool; \
                 returning the labelling function's outputs, not ground truth"
            );
        }
        let mut pairs = self.observed.clone();
        pairs.sort_unstable_by_key(|&(abs, _)| abs);
        pairs.into_iter().map(|(_, class)| class).collect()
    }

    /// Restores the all-unlabelled initial state, discarding every prior
    /// labelling. A total rollback, not a partial undo.
    pub fn reset(&mut self) {
        self.index.reset();
        self.observed.clear();
        self.expose_labels.set(false);
    }

    /// Stacks the features of every current pool item in logical order.
    ///
    /// # Errors
    ///
    /// Returns an error if row stacking fails (ragged transform output).
    pub fn features(&self) -> Result<Matrix<f32>> {
        if self.is_empty() {
            return Matrix::from_vec(0, self.n_features(), Vec::new())
                .map_err(AdquirirError::from);
        }
        let rows: Vec<Vector<f32>> = (0..self.len()).map(|i| self.get(i).features).collect();
        Matrix::from_rows(&rows).map_err(AdquirirError::from)
    }

    /// Fixed-order feature batches over the current pool.
    #[must_use]
    pub fn batches(&self, batch_size: usize) -> PoolBatches<'_, D> {
        PoolBatches::new(self, batch_size)
    }

    /// Builds a scoring-time view over a different backing dataset (for
    /// example, one with augmentation stripped) that shares this view's
    /// bookkeeping state.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the replacement dataset's size differs
    /// from the original pool's.
    pub fn scoring_view(&self, dataset: D) -> Result<UnlabelledView<D>> {
        if dataset.len() != self.total() {
            return Err(AdquirirError::config(format!(
                "scoring dataset has {} items, pool expects {}",
                dataset.len(),
                self.total()
            )));
        }
        Ok(UnlabelledView {
            dataset,
            index: self.index.clone(),
            label_fn: None,
            expose_labels: Cell::new(false),
            observed: Vec::new(),
        })
    }
}

impl<D: Dataset + std::fmt::Debug> std::fmt::Debug for UnlabelledView<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnlabelledView")
            .field("dataset", &self.dataset)
            .field("len", &self.len())
            .field("total", &self.total())
            .field("external_label_fn", &self.label_fn.is_some())
            .finish_non_exhaustive()
    }
}

/// RAII guard that exposes pool labels for its lifetime.
///
/// Restores the prior flag value on drop, so nested scopes unwind
/// correctly instead of clobbering the outer scope's state.
pub struct LabelScope<'a> {
    flag: &'a Cell<bool>,
    prev: bool,
}

impl<'a> LabelScope<'a> {
    fn new(flag: &'a Cell<bool>) -> Self {
        let prev = flag.get();
        flag.set(true);
        Self { flag, prev }
    }
}

impl Drop for LabelScope<'_> {
    fn drop(&mut self) {
        self.flag.set(self.prev);
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
