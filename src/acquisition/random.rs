//! Uniform random acquisition baseline.

use super::{top_b_descending, AcquisitionFunction};
use crate::data::{Dataset, UnlabelledView};
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Selects pool points uniformly at random.
///
/// The control every informed acquisition strategy is measured against.
/// Scores are fresh uniform draws per call, so `recent_scores` stays a
/// meaningful diagnostics channel and selection is an unbiased `b`-subset.
#[derive(Debug)]
pub struct RandomAcquisition {
    rng: StdRng,
    scores: Vec<f32>,
}

impl RandomAcquisition {
    /// Creates a baseline seeded from entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            scores: Vec::new(),
        }
    }

    /// Creates a baseline with a fixed seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            scores: Vec::new(),
        }
    }
}

impl Default for RandomAcquisition {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> AcquisitionFunction<M> for RandomAcquisition {
    fn select<D: Dataset>(
        &mut self,
        _model: &mut M,
        pool: &UnlabelledView<D>,
        b: usize,
    ) -> Result<Vec<usize>> {
        self.scores = (0..pool.len()).map(|_| self.rng.gen::<f32>()).collect();
        top_b_descending(&self.scores, b)
    }

    fn recent_scores(&self) -> &[f32] {
        &self.scores
    }
}
