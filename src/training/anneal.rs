//! Annealed weighting of the unsupervised loss term.

use crate::error::{AdquirirError, Result};
use serde::{Deserialize, Serialize};

/// Piecewise-linear ramp schedule for the unsupervised loss weight.
///
/// The weight is 0 before `t1`, ramps linearly to `alpha` between `t1`
/// and `t2`, and stays at `alpha` afterwards. Defaults follow the
/// pseudo-label schedule of Lee (2013): `t1 = 0`, `t2 = 700`,
/// `alpha = 3.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealSchedule {
    /// Step at which the ramp starts.
    pub t1: u64,
    /// Step at which the ramp reaches `alpha`.
    pub t2: u64,
    /// Final unsupervised loss weight.
    pub alpha: f32,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            t1: 0,
            t2: 700,
            alpha: 3.0,
        }
    }
}

/// Steps through an [`AnnealSchedule`], exposing the current weight.
///
/// The annealer counts its own steps; callers decide the cadence (the
/// trainer advances it every fixed number of optimizer steps, so schedule
/// units are anneal steps, not optimizer steps).
///
/// # Examples
///
/// ```
/// use adquirir::training::{AnnealSchedule, Annealer};
///
/// let mut annealer = Annealer::new(AnnealSchedule::default()).unwrap();
/// assert_eq!(annealer.weight(), 0.0);
/// for _ in 0..350 {
///     annealer.step();
/// }
/// assert!((annealer.weight() - 1.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Annealer {
    schedule: AnnealSchedule,
    t: u64,
}

impl Annealer {
    /// Creates an annealer at step 0.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `t1 > t2` or `alpha` is not a finite
    /// non-negative value.
    pub fn new(schedule: AnnealSchedule) -> Result<Self> {
        if schedule.t1 > schedule.t2 {
            return Err(AdquirirError::config(format!(
                "anneal schedule has t1 = {} after t2 = {}",
                schedule.t1, schedule.t2
            )));
        }
        if !schedule.alpha.is_finite() || schedule.alpha < 0.0 {
            return Err(AdquirirError::config(format!(
                "anneal alpha must be finite and non-negative, got {}",
                schedule.alpha
            )));
        }
        Ok(Self { schedule, t: 0 })
    }

    /// Current unsupervised loss weight.
    #[must_use]
    pub fn weight(&self) -> f32 {
        let AnnealSchedule { t1, t2, alpha } = self.schedule;
        if self.t < t1 {
            0.0
        } else if self.t >= t2 {
            alpha
        } else {
            // t1 < t2 here, so the ramp is well-defined
            alpha * (self.t - t1) as f32 / (t2 - t1) as f32
        }
    }

    /// Advances the schedule by one step.
    pub fn step(&mut self) {
        self.t += 1;
    }

    /// Steps taken so far.
    #[must_use]
    pub fn t(&self) -> u64 {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_waypoints() {
        let mut annealer = Annealer::new(AnnealSchedule::default()).unwrap();
        assert_eq!(annealer.weight(), 0.0);
        for _ in 0..350 {
            annealer.step();
        }
        assert!((annealer.weight() - 1.5).abs() < 1e-6);
        for _ in 0..350 {
            annealer.step();
        }
        assert_eq!(annealer.weight(), 3.0);
        for _ in 0..300 {
            annealer.step();
        }
        assert_eq!(annealer.weight(), 3.0);
    }

    #[test]
    fn test_weight_is_monotone() {
        let mut annealer = Annealer::new(AnnealSchedule {
            t1: 10,
            t2: 40,
            alpha: 2.0,
        })
        .unwrap();
        let mut prev = annealer.weight();
        for _ in 0..60 {
            annealer.step();
            let w = annealer.weight();
            assert!(w >= prev);
            prev = w;
        }
        assert_eq!(prev, 2.0);
    }

    #[test]
    fn test_degenerate_ramp_jumps_to_alpha() {
        let mut annealer = Annealer::new(AnnealSchedule {
            t1: 5,
            t2: 5,
            alpha: 1.0,
        })
        .unwrap();
        for _ in 0..4 {
            annealer.step();
        }
        assert_eq!(annealer.weight(), 0.0);
        annealer.step();
        assert_eq!(annealer.weight(), 1.0);
    }

    #[test]
    fn test_rejects_bad_schedules() {
        assert!(Annealer::new(AnnealSchedule {
            t1: 10,
            t2: 5,
            alpha: 1.0
        })
        .is_err());
        assert!(Annealer::new(AnnealSchedule {
            t1: 0,
            t2: 5,
            alpha: -1.0
        })
        .is_err());
        assert!(Annealer::new(AnnealSchedule {
            t1: 0,
            t2: 5,
            alpha: f32::NAN
        })
        .is_err());
    }
}
