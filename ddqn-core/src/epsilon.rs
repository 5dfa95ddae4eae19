//! Exploration schedule.
use crate::error::DdqnError;
use serde::{Deserialize, Serialize};

/// Exponentially decaying exploration rate.
///
/// `epsilon(frame) = eps_final + (eps_start - eps_final) * exp(-frame / eps_decay)`
///
/// The value is recomputed from the frame index every time, so it never drifts
/// from the formula however long the run is.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonSchedule {
    /// Exploration rate at frame 0.
    pub eps_start: f64,

    /// Exploration rate approached as the frame index grows.
    pub eps_final: f64,

    /// Time constant of the decay in frames.
    pub eps_decay: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            eps_start: 1.0,
            eps_final: 0.01,
            eps_decay: 30000.0,
        }
    }
}

impl EpsilonSchedule {
    /// Set the exploration rate at frame 0.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the final exploration rate.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the time constant of the decay.
    pub fn eps_decay(mut self, v: f64) -> Self {
        self.eps_decay = v;
        self
    }

    /// Fails unless `eps_decay` is positive and finite.
    pub fn check(&self) -> Result<(), DdqnError> {
        if !(self.eps_decay.is_finite() && self.eps_decay > 0.0) {
            return Err(DdqnError::InvalidConfig(format!(
                "eps_decay must be positive, got {}",
                self.eps_decay
            )));
        }
        Ok(())
    }

    /// Exploration rate at the given frame.
    pub fn epsilon(&self, frame: usize) -> f64 {
        self.eps_final + (self.eps_start - self.eps_final) * (-(frame as f64) / self.eps_decay).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::{DdqnError, EpsilonSchedule};

    #[test]
    fn test_epsilon_endpoints() {
        let schedule = EpsilonSchedule::default();
        assert_eq!(schedule.epsilon(0), 1.0);

        let expected = 0.01 + 0.99 / std::f64::consts::E;
        assert!((schedule.epsilon(30000) - expected).abs() < 1e-12);
        assert!((schedule.epsilon(30000) - 0.374).abs() < 1e-3);

        assert!((schedule.epsilon(10_000_000) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_epsilon_non_increasing() {
        let schedule = EpsilonSchedule::default().eps_decay(500.0);
        let mut prev = schedule.epsilon(0);
        for frame in 1..5000 {
            let eps = schedule.epsilon(frame);
            assert!(eps <= prev);
            assert!(eps >= schedule.eps_final);
            prev = eps;
        }
    }

    #[test]
    fn test_non_positive_decay_is_rejected() {
        assert!(EpsilonSchedule::default().check().is_ok());
        for decay in [0.0, -1.0, f64::NAN] {
            let schedule = EpsilonSchedule::default().eps_decay(decay);
            assert!(matches!(
                schedule.check(),
                Err(DdqnError::InvalidConfig(_))
            ));
        }
    }
}
