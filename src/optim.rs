//! First-order optimizers over flat parameter vectors.

use crate::traits::Optimizer;

/// Stochastic gradient descent with optional momentum and weight decay.
///
/// Velocity is allocated lazily on the first step so the optimizer can be
/// constructed before the model's parameter count is known. Semi-supervised
/// training relies on this state surviving across stages.
///
/// # Examples
///
/// ```
/// use adquirir::optim::Sgd;
/// use adquirir::traits::Optimizer;
///
/// let mut opt = Sgd::new(0.1).with_momentum(0.9);
/// let mut params = vec![1.0f32, -1.0];
/// opt.step(&mut params, &[0.5, -0.5]);
/// assert!(params[0] < 1.0);
/// ```
pub struct Sgd {
    lr: f32,
    momentum: f32,
    weight_decay: f32,
    velocity: Vec<f32>,
}

impl Sgd {
    /// Creates plain SGD with the given learning rate.
    ///
    /// # Panics
    ///
    /// Panics if `lr` is not positive.
    #[must_use]
    pub fn new(lr: f32) -> Self {
        assert!(lr > 0.0, "learning rate must be positive, got {lr}");
        Self {
            lr,
            momentum: 0.0,
            weight_decay: 0.0,
            velocity: Vec::new(),
        }
    }

    /// Sets the momentum coefficient.
    ///
    /// # Panics
    ///
    /// Panics if `momentum` is not in [0, 1).
    #[must_use]
    pub fn with_momentum(mut self, momentum: f32) -> Self {
        assert!(
            (0.0..1.0).contains(&momentum),
            "momentum must be in [0, 1), got {momentum}",
        );
        self.momentum = momentum;
        self
    }

    /// Sets the L2 weight decay coefficient.
    ///
    /// # Panics
    ///
    /// Panics if `weight_decay` is negative.
    #[must_use]
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        assert!(weight_decay >= 0.0, "weight decay must be non-negative");
        self.weight_decay = weight_decay;
        self
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [f32], grads: &[f32]) {
        assert_eq!(
            params.len(),
            grads.len(),
            "parameter/gradient length mismatch"
        );
        if self.velocity.len() != params.len() {
            self.velocity = vec![0.0; params.len()];
        }
        for ((p, &g), v) in params
            .iter_mut()
            .zip(grads.iter())
            .zip(self.velocity.iter_mut())
        {
            let g = g + self.weight_decay * *p;
            *v = self.momentum * *v + g;
            *p -= self.lr * *v;
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        assert!(lr > 0.0, "learning rate must be positive, got {lr}");
        self.lr = lr;
    }
}
