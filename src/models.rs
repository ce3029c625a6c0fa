//! Reference prediction model.
//!
//! The training and acquisition machinery only sees the capability traits
//! in [`crate::traits`]; this module ships one concrete implementation for
//! tests, benchmarks, and small linear problems.

use crate::error::{AdquirirError, Result};
use crate::primitives::Matrix;
use crate::traits::{ParameterizedModel, PredictiveModel, TrainableModel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Multinomial logistic regression with optional input dropout.
///
/// Parameters are a `k x d` weight matrix and a `k` bias vector, stored
/// flat. The analytic softmax cross-entropy gradient means no autograd is
/// needed. With `with_dropout`, stochastic forward passes mask input
/// features with an independent inverted-dropout mask per call, which is
/// enough structure for the information-gain scorer to disagree over.
///
/// # Examples
///
/// ```
/// use adquirir::models::SoftmaxRegression;
/// use adquirir::traits::PredictiveModel;
/// use adquirir::primitives::Matrix;
///
/// let model = SoftmaxRegression::new(2, 3);
/// let x = Matrix::from_vec(1, 2, vec![0.5, -0.5]).unwrap();
/// let proba = model.predict_proba(&x);
/// // untrained model is uniform
/// assert!((proba.get(0, 0) - 1.0 / 3.0).abs() < 1e-6);
/// ```
pub struct SoftmaxRegression {
    n_features: usize,
    n_classes: usize,
    weights: Vec<f32>, // k * d, row per class
    bias: Vec<f32>,    // k
    grad_weights: Vec<f32>,
    grad_bias: Vec<f32>,
    dropout_p: f32,
    training: bool,
    rng: StdRng,
}

impl SoftmaxRegression {
    /// Creates a zero-initialized model (uniform predictions).
    #[must_use]
    pub fn new(n_features: usize, n_classes: usize) -> Self {
        assert!(n_classes >= 2, "need at least two classes");
        Self {
            n_features,
            n_classes,
            weights: vec![0.0; n_classes * n_features],
            bias: vec![0.0; n_classes],
            grad_weights: vec![0.0; n_classes * n_features],
            grad_bias: vec![0.0; n_classes],
            dropout_p: 0.0,
            training: true,
            rng: StdRng::from_entropy(),
        }
    }

    /// Enables input dropout for stochastic forward passes.
    ///
    /// # Panics
    ///
    /// Panics if `p` is not in [0, 1).
    #[must_use]
    pub fn with_dropout(mut self, p: f32) -> Self {
        assert!(
            (0.0..1.0).contains(&p),
            "dropout probability must be in [0, 1), got {p}",
        );
        self.dropout_p = p;
        self
    }

    /// Seeds the dropout RNG for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Feature dimensionality this model expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn softmax_row(&self, features: &[f32]) -> Vec<f32> {
        debug_assert_eq!(features.len(), self.n_features);
        let mut logits = vec![0.0f32; self.n_classes];
        for (c, logit) in logits.iter_mut().enumerate() {
            let row = &self.weights[c * self.n_features..(c + 1) * self.n_features];
            *logit = self.bias[c]
                + row
                    .iter()
                    .zip(features.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f32>();
        }
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0;
        for logit in &mut logits {
            *logit = (*logit - max).exp();
            sum += *logit;
        }
        for logit in &mut logits {
            *logit /= sum;
        }
        logits
    }

    fn forward(&self, x: &Matrix<f32>) -> Matrix<f32> {
        let n = x.n_rows();
        let mut out = Matrix::zeros(n, self.n_classes);
        for i in 0..n {
            let proba = self.softmax_row(x.row_slice(i));
            for (c, &p) in proba.iter().enumerate() {
                out.set(i, c, p);
            }
        }
        out
    }
}

impl PredictiveModel for SoftmaxRegression {
    fn predict_proba(&self, x: &Matrix<f32>) -> Matrix<f32> {
        self.forward(x)
    }

    fn stochastic_proba(&mut self, x: &Matrix<f32>) -> Matrix<f32> {
        if self.dropout_p == 0.0 {
            return self.forward(x);
        }
        let scale = 1.0 / (1.0 - self.dropout_p);
        let n = x.n_rows();
        let mut out = Matrix::zeros(n, self.n_classes);
        let mut masked = vec![0.0f32; self.n_features];
        for i in 0..n {
            for (j, &v) in x.row_slice(i).iter().enumerate() {
                masked[j] = if self.rng.gen::<f32>() < self.dropout_p {
                    0.0
                } else {
                    v * scale
                };
            }
            let proba = self.softmax_row(&masked);
            for (c, &p) in proba.iter().enumerate() {
                out.set(i, c, p);
            }
        }
        out
    }

    fn num_classes(&self) -> usize {
        self.n_classes
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn training(&self) -> bool {
        self.training
    }
}

impl ParameterizedModel for SoftmaxRegression {
    fn parameters(&self) -> Vec<f32> {
        let mut params = self.weights.clone();
        params.extend_from_slice(&self.bias);
        params
    }

    fn load_parameters(&mut self, params: &[f32]) -> Result<()> {
        let expected = self.weights.len() + self.bias.len();
        if params.len() != expected {
            return Err(AdquirirError::shape_mismatch(
                "parameter count",
                expected,
                params.len(),
            ));
        }
        let (w, b) = params.split_at(self.weights.len());
        self.weights.copy_from_slice(w);
        self.bias.copy_from_slice(b);
        Ok(())
    }
}

impl TrainableModel for SoftmaxRegression {
    fn zero_grad(&mut self) {
        self.grad_weights.fill(0.0);
        self.grad_bias.fill(0.0);
    }

    fn backward(&mut self, x: &Matrix<f32>, targets: &Matrix<f32>, weight: f32) -> f32 {
        assert_eq!(x.n_rows(), targets.n_rows(), "batch/target row mismatch");
        assert_eq!(
            targets.n_cols(),
            self.n_classes,
            "target width must equal class count"
        );
        let n = x.n_rows();
        if n == 0 {
            return 0.0;
        }
        let inv_n = 1.0 / n as f32;
        let mut loss = 0.0f32;
        for i in 0..n {
            let features = x.row_slice(i);
            let proba = self.softmax_row(features);
            for c in 0..self.n_classes {
                let t = targets.get(i, c);
                if t > 0.0 {
                    loss -= t * proba[c].max(1e-12).ln();
                }
                // d(soft CE)/d(logit_c) = p_c - t_c
                let dz = (proba[c] - t) * inv_n * weight;
                let row = &mut self.grad_weights[c * self.n_features..(c + 1) * self.n_features];
                for (g, &xj) in row.iter_mut().zip(features.iter()) {
                    *g += dz * xj;
                }
                self.grad_bias[c] += dz;
            }
        }
        loss * inv_n
    }

    fn gradients(&self) -> Vec<f32> {
        let mut grads = self.grad_weights.clone();
        grads.extend_from_slice(&self.grad_bias);
        grads
    }
}

impl std::fmt::Debug for SoftmaxRegression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftmaxRegression")
            .field("n_features", &self.n_features)
            .field("n_classes", &self.n_classes)
            .field("dropout_p", &self.dropout_p)
            .field("training", &self.training)
            .finish_non_exhaustive()
    }
}
