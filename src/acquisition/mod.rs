//! Acquisition functions: scoring and selecting pool points.
//!
//! An acquisition function ranks every item of an [`UnlabelledView`] by
//! informativeness and returns the top `b` logical indices. Scorers
//! iterate the pool in fixed, non-shuffled order so returned indices map
//! 1:1 to pool-view positions, evaluate the model in inference mode, and
//! fail loudly on any non-finite score.
//!
//! # Variants
//!
//! - [`Bald`]: expected mutual information between model parameters and
//!   the label, estimated from repeated stochastic forward passes.
//! - [`MaxEntropy`]: predictive-distribution entropy.
//! - [`RandomAcquisition`]: uniform random baseline (control).
//!
//! # Reference
//!
//! - Houlsby, N., et al. (2011). Bayesian active learning for
//!   classification and preference learning.
//! - Gal, Y., Islam, R., & Ghahramani, Z. (2017). Deep Bayesian active
//!   learning with image data. ICML.

mod bald;
mod entropy;
mod random;

pub use bald::Bald;
pub use entropy::MaxEntropy;
pub use random::RandomAcquisition;

use crate::data::{Dataset, UnlabelledView};
use crate::error::{AdquirirError, Result};

/// Scores an unlabelled pool view and selects the `b` most informative
/// points.
///
/// The returned logical indices are distinct, each in
/// `[0, pool.len())`, ordered by descending score. Implementations keep
/// the full score vector of the most recent call as a diagnostics side
/// channel.
pub trait AcquisitionFunction<M> {
    /// Selects `b` pool-view indices, best first.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteScore` if any computed score is NaN or infinite,
    /// or `ShapeMismatch` if `b` exceeds the pool size.
    fn select<D: Dataset>(
        &mut self,
        model: &mut M,
        pool: &UnlabelledView<D>,
        b: usize,
    ) -> Result<Vec<usize>>;

    /// Score of every pool item evaluated in the most recent
    /// [`AcquisitionFunction::select`] call, in pool-view order.
    fn recent_scores(&self) -> &[f32];
}

/// Shannon entropy of a discrete distribution, in nats.
pub(crate) fn entropy(p: &[f32]) -> f32 {
    p.iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| -v * v.ln())
        .sum()
}

/// Indices of the top `b` scores, descending. Ties break toward the lower
/// index (stable).
pub(crate) fn top_b_descending(scores: &[f32], b: usize) -> Result<Vec<usize>> {
    if b > scores.len() {
        return Err(AdquirirError::shape_mismatch(
            "pool size",
            b,
            scores.len(),
        ));
    }
    if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
        return Err(AdquirirError::NonFiniteScore {
            index: i,
            value: scores[i],
        });
    }
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order.truncate(b);
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_uniform_is_maximal() {
        let uniform = entropy(&[0.25; 4]);
        let peaked = entropy(&[0.97, 0.01, 0.01, 0.01]);
        assert!(uniform > peaked);
        assert!((uniform - (4.0f32).ln()).abs() < 1e-6);
    }

    #[test]
    fn test_entropy_degenerate_is_zero() {
        assert_eq!(entropy(&[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_top_b_orders_descending() {
        let idxs = top_b_descending(&[0.1, 0.9, 0.5, 0.7], 3).unwrap();
        assert_eq!(idxs, vec![1, 3, 2]);
    }

    #[test]
    fn test_top_b_ties_are_stable() {
        let idxs = top_b_descending(&[0.5, 0.5, 0.5], 2).unwrap();
        assert_eq!(idxs, vec![0, 1]);
    }

    #[test]
    fn test_top_b_rejects_non_finite() {
        let err = top_b_descending(&[0.1, f32::NAN, 0.2], 2).unwrap_err();
        assert!(err.to_string().contains("pool item 1"));
    }

    #[test]
    fn test_top_b_rejects_oversized_request() {
        assert!(top_b_descending(&[0.1, 0.2], 3).is_err());
    }
}
