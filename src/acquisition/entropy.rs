//! Max-entropy acquisition.

use super::{entropy, top_b_descending, AcquisitionFunction};
use crate::data::{Dataset, UnlabelledView};
use crate::error::Result;
use crate::traits::PredictiveModel;

/// Scores each pool item by the entropy of its predictive distribution.
///
/// Cheaper than [`super::Bald`] (one deterministic pass per item) but
/// conflates parameter uncertainty with inherent class ambiguity.
pub struct MaxEntropy {
    batch_size: usize,
    scores: Vec<f32>,
}

impl MaxEntropy {
    /// Creates a max-entropy scorer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            batch_size: 512,
            scores: Vec::new(),
        }
    }

    /// Sets the scoring batch size (default 512).
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        self.batch_size = batch_size;
        self
    }
}

impl Default for MaxEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: PredictiveModel> AcquisitionFunction<M> for MaxEntropy {
    fn select<D: Dataset>(
        &mut self,
        model: &mut M,
        pool: &UnlabelledView<D>,
        b: usize,
    ) -> Result<Vec<usize>> {
        let was_training = model.training();
        model.set_training(false);

        let mut scores = Vec::with_capacity(pool.len());
        for batch in pool.batches(self.batch_size) {
            let proba = model.predict_proba(&batch);
            for i in 0..proba.n_rows() {
                scores.push(entropy(proba.row_slice(i)));
            }
        }
        model.set_training(was_training);

        self.scores = scores;
        top_b_descending(&self.scores, b)
    }

    fn recent_scores(&self) -> &[f32] {
        &self.scores
    }
}
