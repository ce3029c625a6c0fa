//! Mask and absolute-index bookkeeping over an immutable pool.

use crate::error::{AdquirirError, IndexSpace, Result};

/// Logical-deletion index over a pool of fixed size N.
///
/// Holds a boolean mask (`true` = still unlabelled) and a translation
/// table: the ascending absolute positions where the mask is true. A
/// logical index `i` into the pool view always resolves through
/// `translation[i]`, never directly into the backing collection.
///
/// Invariants, maintained by every mutation:
/// - `popcount(mask) == translation.len() == self.len()`
/// - `translation[i]` is the i-th true position of the mask in ascending
///   absolute order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolIndex {
    mask: Vec<bool>,
    translation: Vec<usize>,
}

impl PoolIndex {
    /// Creates an all-unlabelled index over `n` items.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            mask: vec![true; n],
            translation: (0..n).collect(),
        }
    }

    /// Current pool size (number of still-unlabelled items).
    #[must_use]
    pub fn len(&self) -> usize {
        self.translation.len()
    }

    /// Returns true if no items remain in the pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translation.is_empty()
    }

    /// Size N of the backing collection.
    #[must_use]
    pub fn total(&self) -> usize {
        self.mask.len()
    }

    /// Returns true if the absolute index is still in the pool.
    ///
    /// # Panics
    ///
    /// Panics if `absolute` is out of bounds.
    #[must_use]
    pub fn is_unlabelled(&self, absolute: usize) -> bool {
        self.mask[absolute]
    }

    /// Translates logical pool-view indices to absolute indices.
    ///
    /// Pure lookup; call this *before* [`PoolIndex::deactivate`], which
    /// invalidates the mapping for the requested positions.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyLabelled` for any logical index outside the current
    /// pool (necessarily stale).
    pub fn to_absolute(&self, idxs: &[usize]) -> Result<Vec<usize>> {
        idxs.iter()
            .map(|&i| {
                self.translation
                    .get(i)
                    .copied()
                    .ok_or(AdquirirError::AlreadyLabelled {
                        index: i,
                        space: IndexSpace::Logical,
                    })
            })
            .collect()
    }

    /// Removes the given absolute indices from the pool.
    ///
    /// All-or-nothing: the request is validated in full before any bit is
    /// flipped, so a failed call leaves the index unchanged. The
    /// translation table is recomputed afterwards (O(N) scan; acquisitions
    /// are infrequent relative to N).
    ///
    /// # Errors
    ///
    /// Returns `AlreadyLabelled` if any index is already masked out or is
    /// duplicated within the request.
    pub fn deactivate(&mut self, absolute: &[usize]) -> Result<()> {
        let mut seen = vec![false; self.mask.len()];
        for &abs in absolute {
            if abs >= self.mask.len() || !self.mask[abs] || seen[abs] {
                return Err(AdquirirError::AlreadyLabelled {
                    index: abs,
                    space: IndexSpace::Absolute,
                });
            }
            seen[abs] = true;
        }
        for &abs in absolute {
            self.mask[abs] = false;
        }
        self.translation = (0..self.mask.len()).filter(|&i| self.mask[i]).collect();
        Ok(())
    }

    /// Absolute positions labelled so far, ascending.
    #[must_use]
    pub fn labelled_indices(&self) -> Vec<usize> {
        (0..self.mask.len()).filter(|&i| !self.mask[i]).collect()
    }

    /// Restores the all-unlabelled initial state.
    pub fn reset(&mut self) {
        self.mask.fill(true);
        self.translation = (0..self.mask.len()).collect();
    }
}
