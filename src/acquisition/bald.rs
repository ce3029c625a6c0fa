//! Information-gain (BALD) acquisition.

use super::{entropy, top_b_descending, AcquisitionFunction};
use crate::data::{Dataset, UnlabelledView};
use crate::error::{AdquirirError, Result};
use crate::primitives::Matrix;
use crate::traits::PredictiveModel;

/// Bayesian Active Learning by Disagreement.
///
/// Draws `n_passes` stochastic forward passes per pool item and scores
/// each item by the mutual information between model parameters and the
/// label:
///
/// ```text
/// score = H(mean predictive distribution) - mean(per-pass entropies)
/// ```
///
/// High scores mark items the passes disagree on. For a deterministic
/// model every pass is identical and the score is 0 for every item.
///
/// # Examples
///
/// ```
/// use adquirir::acquisition::{AcquisitionFunction, Bald};
/// use adquirir::data::{InMemoryDataset, UnlabelledView};
/// use adquirir::models::SoftmaxRegression;
/// use adquirir::primitives::Matrix;
///
/// let x = Matrix::from_vec(8, 2, (0..16).map(|i| i as f32 / 16.0).collect()).unwrap();
/// let ds = InMemoryDataset::with_labels(x, vec![0; 8]).unwrap();
/// let pool = UnlabelledView::new(ds).unwrap();
///
/// let mut model = SoftmaxRegression::new(2, 3).with_dropout(0.5).with_seed(7);
/// let mut bald = Bald::new(10);
/// let selected = bald.select(&mut model, &pool, 3).unwrap();
/// assert_eq!(selected.len(), 3);
/// assert_eq!(
///     AcquisitionFunction::<SoftmaxRegression>::recent_scores(&bald).len(),
///     8
/// );
/// ```
pub struct Bald {
    n_passes: usize,
    batch_size: usize,
    scores: Vec<f32>,
}

impl Bald {
    /// Creates a BALD scorer drawing `n_passes` stochastic passes per item.
    ///
    /// # Panics
    ///
    /// Panics if `n_passes` is zero.
    #[must_use]
    pub fn new(n_passes: usize) -> Self {
        assert!(n_passes > 0, "BALD needs at least one forward pass");
        Self {
            n_passes,
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

    fn score_batch<M: PredictiveModel>(&self, model: &mut M, batch: &Matrix<f32>) -> Result<Vec<f32>> {
        let n = batch.n_rows();
        let k = model.num_classes();
        let mut mean = Matrix::zeros(n, k);
        let mut pass_entropy = vec![0.0f32; n];

        for _ in 0..self.n_passes {
            let proba = model.stochastic_proba(batch);
            if proba.shape() != (n, k) {
                return Err(AdquirirError::ShapeMismatch {
                    expected: format!("({n}, {k}) predictive distribution"),
                    actual: format!("{:?}", proba.shape()),
                });
            }
            for i in 0..n {
                for c in 0..k {
                    mean.set(i, c, mean.get(i, c) + proba.get(i, c));
                }
                pass_entropy[i] += entropy(proba.row_slice(i));
            }
        }

        let e = self.n_passes as f32;
        let scores = (0..n)
            .map(|i| {
                let mean_row: Vec<f32> = (0..k).map(|c| mean.get(i, c) / e).collect();
                entropy(&mean_row) - pass_entropy[i] / e
            })
            .collect();
        Ok(scores)
    }
}

impl<M: PredictiveModel> AcquisitionFunction<M> for Bald {
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
            scores.extend(self.score_batch(model, &batch)?);
        }
        model.set_training(was_training);

        self.scores = scores;
        top_b_descending(&self.scores, b)
    }

    fn recent_scores(&self) -> &[f32] {
        &self.scores
    }
}
