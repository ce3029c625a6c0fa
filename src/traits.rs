//! Capability traits for the external model and optimizer collaborators.
//!
//! The active learning core never owns a concrete architecture. Prediction
//! models, their parameter state, and optimizers are consumed through the
//! narrow seams defined here; `crate::models` ships a small reference
//! implementation for tests and linear problems.

use crate::error::Result;
use crate::primitives::Matrix;

/// A classifier that maps feature batches to distributions over classes.
///
/// Rows of the returned matrix are probability distributions (non-negative,
/// summing to 1). `predict_proba` is the deterministic inference path;
/// `stochastic_proba` draws one stochastic forward pass with an independent
/// dropout mask per call, which is what the information-gain scorer needs.
pub trait PredictiveModel {
    /// Deterministic forward pass: one distribution per input row.
    fn predict_proba(&self, x: &Matrix<f32>) -> Matrix<f32>;

    /// One stochastic forward pass (independent mask per call).
    ///
    /// A deterministic model may simply delegate to [`Self::predict_proba`];
    /// the information-gain score then collapses to zero for every item.
    fn stochastic_proba(&mut self, x: &Matrix<f32>) -> Matrix<f32>;

    /// Number of output classes.
    fn num_classes(&self) -> usize;

    /// Switches between training and inference mode.
    fn set_training(&mut self, training: bool);

    /// Returns true if the model is in training mode.
    fn training(&self) -> bool;
}

/// Parameter snapshot and reload capability.
///
/// Snapshots are flat `Vec<f32>` so early stopping and weight resets
/// between repeated trials stay model-agnostic. No serialization format
/// is prescribed; callers persist the vector however they like.
pub trait ParameterizedModel {
    /// Captures all parameters as a flat vector.
    fn parameters(&self) -> Vec<f32>;

    /// Restores parameters from a flat vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector length doesn't match the model's
    /// parameter count.
    fn load_parameters(&mut self, params: &[f32]) -> Result<()>;
}

/// A model the semi-supervised trainer can optimize.
///
/// Gradients accumulate across [`Self::backward`] calls until
/// [`Self::zero_grad`], so the supervised and unsupervised loss terms of
/// one step share a single optimizer update.
pub trait TrainableModel: PredictiveModel + ParameterizedModel {
    /// Clears accumulated gradients.
    fn zero_grad(&mut self);

    /// Forward pass plus gradient accumulation against soft targets.
    ///
    /// `targets` has one distribution per row (one-hot for hard labels).
    /// Gradients are scaled by `weight` before accumulation; the returned
    /// loss is the unscaled mean soft cross-entropy.
    fn backward(&mut self, x: &Matrix<f32>, targets: &Matrix<f32>, weight: f32) -> f32;

    /// Returns accumulated gradients as a flat vector, aligned with
    /// [`ParameterizedModel::parameters`].
    fn gradients(&self) -> Vec<f32>;
}

/// Common trait for all optimizers.
///
/// Optimizers are stateful: momentum buffers and the like persist across
/// calls, including across the warm-up to semi-supervised stage transition
/// (the second stage is a continuation, not a fresh run).
pub trait Optimizer {
    /// Performs a single optimization step in place.
    ///
    /// # Panics
    ///
    /// Panics if `params` and `grads` have different lengths.
    fn step(&mut self, params: &mut [f32], grads: &[f32]);

    /// Get current learning rate.
    fn lr(&self) -> f32;

    /// Set learning rate (for schedulers).
    fn set_lr(&mut self, lr: f32);
}
