//! Patience-based early stopping with parameter snapshots.

use crate::error::{AdquirirError, Result};
use crate::traits::ParameterizedModel;

/// Whether a monitored quantity should go down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Lower is better (losses).
    Minimize,
    /// Higher is better (accuracies).
    Maximize,
}

/// Stops training after `patience` consecutive epochs without improvement,
/// keeping a snapshot of the best parameters seen.
///
/// Equal values do not count as improvement.
pub struct EarlyStopper {
    direction: Direction,
    patience: usize,
    best_value: Option<f32>,
    best_params: Option<Vec<f32>>,
    stale: usize,
}

impl EarlyStopper {
    /// Creates a stopper.
    ///
    /// # Panics
    ///
    /// Panics if `patience` is zero.
    #[must_use]
    pub fn new(direction: Direction, patience: usize) -> Self {
        assert!(patience > 0, "patience must be positive");
        Self {
            direction,
            patience,
            best_value: None,
            best_params: None,
            stale: 0,
        }
    }

    /// Records an epoch's monitored value; snapshots the model on
    /// improvement. Returns `true` once patience is exhausted.
    pub fn observe<M: ParameterizedModel>(&mut self, value: f32, model: &M) -> bool {
        let improved = match self.best_value {
            None => true,
            Some(best) => match self.direction {
                Direction::Minimize => value < best,
                Direction::Maximize => value > best,
            },
        };
        if improved {
            self.best_value = Some(value);
            self.best_params = Some(model.parameters());
            self.stale = 0;
        } else {
            self.stale += 1;
        }
        self.stale >= self.patience
    }

    /// Restores the best snapshot into `model`. Returns `false` if no
    /// snapshot was ever taken.
    ///
    /// # Errors
    ///
    /// Returns a `ShapeMismatch` error if the snapshot does not fit the
    /// model.
    pub fn reload_best<M: ParameterizedModel>(&self, model: &mut M) -> Result<bool> {
        match &self.best_params {
            Some(params) => {
                model.load_parameters(params)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Best monitored value so far.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error before the first observation.
    pub fn best_value(&self) -> Result<f32> {
        self.best_value
            .ok_or_else(|| AdquirirError::config("no value observed yet"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoftmaxRegression;

    #[test]
    fn test_stops_after_patience_stale_epochs() {
        let model = SoftmaxRegression::new(1, 2);
        let mut stopper = EarlyStopper::new(Direction::Minimize, 2);
        assert!(!stopper.observe(1.0, &model));
        assert!(!stopper.observe(0.5, &model));
        assert!(!stopper.observe(0.6, &model)); // stale 1
        assert!(stopper.observe(0.5, &model)); // equal is not better, stale 2
        assert_eq!(stopper.best_value().unwrap(), 0.5);
    }

    #[test]
    fn test_improvement_resets_patience() {
        let model = SoftmaxRegression::new(1, 2);
        let mut stopper = EarlyStopper::new(Direction::Maximize, 2);
        stopper.observe(0.1, &model);
        stopper.observe(0.1, &model); // stale 1
        assert!(!stopper.observe(0.2, &model)); // improvement, reset
        assert!(!stopper.observe(0.2, &model)); // stale 1
        assert!(stopper.observe(0.1, &model)); // stale 2
    }

    #[test]
    fn test_reload_best_restores_snapshot() {
        let mut model = SoftmaxRegression::new(2, 2);
        let mut stopper = EarlyStopper::new(Direction::Maximize, 1);

        stopper.observe(0.9, &model);
        let best = model.parameters();

        // degrade the model, then report a worse epoch
        let worse = vec![5.0; best.len()];
        model.load_parameters(&worse).unwrap();
        stopper.observe(0.1, &model);

        assert!(stopper.reload_best(&mut model).unwrap());
        assert_eq!(model.parameters(), best);
    }

    #[test]
    fn test_reload_without_observation_is_noop() {
        let mut model = SoftmaxRegression::new(2, 2);
        let stopper = EarlyStopper::new(Direction::Minimize, 1);
        assert!(!stopper.reload_best(&mut model).unwrap());
        assert!(stopper.best_value().is_err());
    }
}
