//! Stateful orchestration of repeated acquisitions.

use super::dataset::Dataset;
use super::labelled::LabelledSet;
use super::view::UnlabelledView;
use crate::acquisition::AcquisitionFunction;
use crate::error::{AdquirirError, Result};
use crate::primitives::Matrix;

/// Outcome of one acquisition round.
#[derive(Debug, Clone)]
pub struct Acquisition {
    /// Absolute indices (into the original pool) of the acquired points.
    pub indices: Vec<usize>,
    /// Features of the freshly labelled subset.
    pub features: Matrix<f32>,
    /// Labels of the freshly labelled subset.
    pub labels: Vec<usize>,
}

/// Grows the labelled collection by repeatedly querying an acquisition
/// function over the unlabelled pool.
///
/// Owns the pool view and the labelled set; it is the single writer of
/// pool state. Independent trials must use independent managers or call
/// [`DataManager::reset`] between them.
///
/// # Examples
///
/// ```
/// use adquirir::acquisition::RandomAcquisition;
/// use adquirir::data::{DataManager, InMemoryDataset, LabelledSet, UnlabelledView};
/// use adquirir::models::SoftmaxRegression;
/// use adquirir::primitives::Matrix;
///
/// let x = Matrix::from_vec(20, 1, (0..20).map(|i| i as f32).collect()).unwrap();
/// let ds = InMemoryDataset::with_labels(x, vec![0; 20]).unwrap();
/// let pool = UnlabelledView::new(ds).unwrap();
///
/// let mut manager = DataManager::new(
///     LabelledSet::empty(1),
///     pool,
///     RandomAcquisition::with_seed(42),
/// ).unwrap();
///
/// let mut model = SoftmaxRegression::new(1, 2);
/// let round = manager.acquire(&mut model, 5).unwrap();
/// assert_eq!(round.indices.len(), 5);
/// assert_eq!(manager.n_labelled(), 5);
/// assert_eq!(manager.n_unlabelled(), 15);
/// ```
#[derive(Debug)]
pub struct DataManager<D: Dataset, A> {
    labelled: LabelledSet,
    pool: UnlabelledView<D>,
    acquisition: A,
}

impl<D: Dataset, A> DataManager<D, A> {
    /// Creates a manager over a baseline labelled set and a pool.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the two sides disagree on feature
    /// dimensionality.
    pub fn new(labelled: LabelledSet, pool: UnlabelledView<D>, acquisition: A) -> Result<Self> {
        if labelled.n_features() != pool.n_features() {
            return Err(AdquirirError::config(format!(
                "labelled set has {} features, pool has {}",
                labelled.n_features(),
                pool.n_features()
            )));
        }
        Ok(Self {
            labelled,
            pool,
            acquisition,
        })
    }

    /// Acquires `b` points from the pool and appends them to the labelled
    /// collection.
    ///
    /// # Errors
    ///
    /// - `PoolExhausted` if `b` exceeds the remaining pool size.
    /// - `ShapeMismatch` if the acquisition function violates its
    ///   contract (wrong count, out-of-range or duplicate indices).
    /// - Any error surfaced by scoring or labelling.
    pub fn acquire<M>(&mut self, model: &mut M, b: usize) -> Result<Acquisition>
    where
        A: AcquisitionFunction<M>,
    {
        self.check_pool(b)?;
        let idxs = self.acquisition.select(model, &self.pool, b)?;
        self.finish(idxs, b)
    }

    /// Like [`DataManager::acquire`], but scores a transformed variant of
    /// the pool (e.g. with augmentation stripped). The transform sees the
    /// backing dataset and returns the dataset to score; bookkeeping state
    /// is shared, so returned indices line up with the real pool.
    ///
    /// # Errors
    ///
    /// As [`DataManager::acquire`], plus a `Config` error if the transform
    /// changes the dataset's size.
    pub fn acquire_with<M, F>(&mut self, model: &mut M, b: usize, transform: F) -> Result<Acquisition>
    where
        A: AcquisitionFunction<M>,
        F: Fn(&D) -> D,
    {
        self.check_pool(b)?;
        let scoring = self.pool.scoring_view(transform(self.pool.dataset()))?;
        let idxs = self.acquisition.select(model, &scoring, b)?;
        self.finish(idxs, b)
    }

    fn check_pool(&self, b: usize) -> Result<()> {
        if b > self.pool.len() {
            return Err(AdquirirError::PoolExhausted {
                requested: b,
                remaining: self.pool.len(),
            });
        }
        Ok(())
    }

    fn finish(&mut self, idxs: Vec<usize>, b: usize) -> Result<Acquisition> {
        if idxs.len() != b {
            return Err(AdquirirError::shape_mismatch("indices", b, idxs.len()));
        }
        let mut seen = vec![false; self.pool.len()];
        for &i in &idxs {
            if i >= self.pool.len() || seen[i] {
                return Err(AdquirirError::ShapeMismatch {
                    expected: format!("{b} distinct indices below {}", self.pool.len()),
                    actual: format!("index {i}"),
                });
            }
            seen[i] = true;
        }

        // absolute indices must be resolved before label() invalidates the
        // translation for these positions
        let absolute = self.pool.convert_index(&idxs)?;
        let (features, labels) = self.pool.label(&idxs)?;
        self.labelled.append(&features, &labels)?;
        Ok(Acquisition {
            indices: absolute,
            features,
            labels,
        })
    }

    /// Current number of labelled points.
    #[must_use]
    pub fn n_labelled(&self) -> usize {
        self.labelled.len()
    }

    /// Current number of unlabelled pool points.
    #[must_use]
    pub fn n_unlabelled(&self) -> usize {
        self.pool.len()
    }

    /// The current labelled collection.
    #[must_use]
    pub fn labelled(&self) -> &LabelledSet {
        &self.labelled
    }

    /// The current unlabelled pool view.
    #[must_use]
    pub fn unlabelled(&self) -> &UnlabelledView<D> {
        &self.pool
    }

    /// The configured acquisition function (e.g. to read
    /// [`AcquisitionFunction::recent_scores`]).
    #[must_use]
    pub fn acquisition(&self) -> &A {
        &self.acquisition
    }

    /// Full session restart: the pool returns to all-unlabelled and the
    /// labelled collection rolls back to the baseline. Used between
    /// independent repeats to avoid state bleed.
    pub fn reset(&mut self) {
        self.pool.reset();
        self.labelled.reset();
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
