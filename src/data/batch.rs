//! Batch iterators for labelled data and the pool view.
//!
//! Three independently-paced traversals feed the trainer: finite epochs
//! over the labelled set ([`Batches`]), an infinite wraparound stream over
//! the labelled set ([`CyclicBatches`]), and fixed-order feature batches
//! over the pool ([`PoolBatches`]). Their advancement rules are
//! deliberately independent; "epoch" never means the same thing across
//! two sources.

use super::dataset::Dataset;
use super::labelled::LabelledSet;
use super::view::UnlabelledView;
use crate::error::{AdquirirError, Result};
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Finite batch iterator over a [`LabelledSet`], in a fixed or shuffled
/// row order. The final batch may be short.
pub struct Batches<'a> {
    set: &'a LabelledSet,
    order: Vec<usize>,
    batch_size: usize,
    pos: usize,
}

impl<'a> Batches<'a> {
    pub(crate) fn new(set: &'a LabelledSet, batch_size: usize, rng: Option<&mut StdRng>) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        let mut order: Vec<usize> = (0..set.len()).collect();
        if let Some(rng) = rng {
            order.shuffle(rng);
        }
        Self {
            set,
            order,
            batch_size,
            pos: 0,
        }
    }
}

impl Iterator for Batches<'_> {
    type Item = (Matrix<f32>, Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.order.len() {
            return None;
        }
        let end = (self.pos + self.batch_size).min(self.order.len());
        let batch = self.set.gather(&self.order[self.pos..end]);
        self.pos = end;
        Some(batch)
    }
}

impl LabelledSet {
    /// Fixed-order batches.
    #[must_use]
    pub fn batches(&self, batch_size: usize) -> Batches<'_> {
        Batches::new(self, batch_size, None)
    }

    /// Shuffled batches (one fresh permutation per call).
    #[must_use]
    pub fn shuffled_batches(&self, batch_size: usize, rng: &mut StdRng) -> Batches<'_> {
        Batches::new(self, batch_size, Some(rng))
    }
}

/// Infinite wraparound batch stream over a [`LabelledSet`].
///
/// Pulls batches in row order; on exhaustion it restarts from the
/// beginning. Restartable by construction, decoupled from any epoch
/// boundary of the pool it runs alongside.
///
/// # Examples
///
/// ```
/// use adquirir::data::{CyclicBatches, LabelledSet};
/// use adquirir::primitives::Matrix;
///
/// let x = Matrix::from_vec(3, 1, vec![0.0, 1.0, 2.0]).unwrap();
/// let set = LabelledSet::from_parts(x, vec![0, 1, 0]).unwrap();
/// let mut cyclic = CyclicBatches::new(&set, 2).unwrap();
///
/// assert_eq!(cyclic.next_batch().1, vec![0, 1]);
/// assert_eq!(cyclic.next_batch().1, vec![0]);
/// // wrapped around
/// assert_eq!(cyclic.next_batch().1, vec![0, 1]);
/// ```
pub struct CyclicBatches<'a> {
    set: &'a LabelledSet,
    batch_size: usize,
    pos: usize,
}

impl<'a> CyclicBatches<'a> {
    /// Creates the stream.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for an empty set: an infinite stream over
    /// nothing would spin forever.
    pub fn new(set: &'a LabelledSet, batch_size: usize) -> Result<Self> {
        if set.is_empty() {
            return Err(AdquirirError::config(
                "cannot build a cyclic stream over an empty labelled set",
            ));
        }
        if batch_size == 0 {
            return Err(AdquirirError::config("batch_size must be positive"));
        }
        Ok(Self {
            set,
            batch_size,
            pos: 0,
        })
    }

    /// Pulls the next batch; never exhausts.
    #[must_use]
    pub fn next_batch(&mut self) -> (Matrix<f32>, Vec<usize>) {
        if self.pos >= self.set.len() {
            self.pos = 0;
        }
        let end = (self.pos + self.batch_size).min(self.set.len());
        let indices: Vec<usize> = (self.pos..end).collect();
        self.pos = end;
        self.set.gather(&indices)
    }
}

impl Iterator for CyclicBatches<'_> {
    type Item = (Matrix<f32>, Vec<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_batch())
    }
}

/// Fixed-order feature batches over an [`UnlabelledView`].
///
/// Logical indices `pos..pos+batch` correspond 1:1 to the rows of each
/// yielded matrix, which is what lets acquisition scores map back to
/// pool-view positions.
pub struct PoolBatches<'a, D: Dataset> {
    view: &'a UnlabelledView<D>,
    batch_size: usize,
    pos: usize,
}

impl<'a, D: Dataset> PoolBatches<'a, D> {
    pub(crate) fn new(view: &'a UnlabelledView<D>, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            view,
            batch_size,
            pos: 0,
        }
    }
}

impl<D: Dataset> Iterator for PoolBatches<'_, D> {
    type Item = Matrix<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.view.len() {
            return None;
        }
        let end = (self.pos + self.batch_size).min(self.view.len());
        let rows: Vec<_> = (self.pos..end).map(|i| self.view.get(i).features).collect();
        self.pos = end;
        Some(Matrix::from_rows(&rows).expect("pool rows are rectangular"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryDataset;
    use rand::SeedableRng;

    fn set(n: usize) -> LabelledSet {
        let x = Matrix::from_vec(n, 1, (0..n).map(|i| i as f32).collect()).unwrap();
        LabelledSet::from_parts(x, (0..n).map(|i| i % 2).collect()).unwrap()
    }

    #[test]
    fn test_batches_cover_all_rows() {
        let s = set(7);
        let sizes: Vec<usize> = s.batches(3).map(|(x, _)| x.n_rows()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn test_shuffled_batches_are_permutation() {
        let s = set(10);
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen: Vec<f32> = s
            .shuffled_batches(4, &mut rng)
            .flat_map(|(x, _)| x.as_slice().to_vec())
            .collect();
        seen.sort_by(f32::total_cmp);
        let expected: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_cyclic_wraps_around() {
        let s = set(3);
        let mut cyclic = CyclicBatches::new(&s, 2).unwrap();
        let mut rows = 0;
        for _ in 0..4 {
            rows += cyclic.next_batch().0.n_rows();
        }
        // 2 + 1 + 2 + 1: two full passes, no exhaustion
        assert_eq!(rows, 6);
    }

    #[test]
    fn test_cyclic_rejects_empty_set() {
        let s = LabelledSet::empty(1);
        assert!(CyclicBatches::new(&s, 2).is_err());
    }

    #[test]
    fn test_pool_batches_fixed_order() {
        let x = Matrix::from_vec(5, 1, vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
        let ds = InMemoryDataset::with_labels(x, vec![0; 5]).unwrap();
        let mut pool = UnlabelledView::new(ds).unwrap();
        pool.label(&[1]).unwrap();

        let flat: Vec<f32> = pool
            .batches(2)
            .flat_map(|x| x.as_slice().to_vec())
            .collect();
        assert_eq!(flat, vec![0.0, 2.0, 3.0, 4.0]);
    }
}
