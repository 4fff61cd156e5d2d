use serde::{Deserialize, Serialize};

use super::errors::ReplayError;

pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Settings for a [`PrioritizedReplayBuffer`](super::PrioritizedReplayBuffer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub capacity: usize,
    /// Priority exponent; 0 samples uniformly.
    pub alpha: f64,
    /// Importance-sampling exponent; 0 disables the correction.
    pub beta: f64,
    /// Added to every raw weight so no slot has zero priority.
    pub epsilon: f64,
    /// Raw weight given to samples added without one, until a larger weight
    /// has been reported.
    pub first_max: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            alpha: 0.6,
            beta: 0.4,
            epsilon: DEFAULT_EPSILON,
            first_max: 1.0,
        }
    }
}

impl ReplayConfig {
    pub fn new(capacity: usize, alpha: f64, beta: f64) -> Self {
        Self {
            capacity,
            alpha,
            beta,
            ..Self::default()
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.capacity == 0 {
            return Err(ReplayError::invalid("capacity must be positive"));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(ReplayError::invalid(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(ReplayError::invalid(format!(
                "beta must be non-negative, got {}",
                self.beta
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ReplayError::invalid(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !(self.first_max.is_finite() && self.first_max >= 0.0) {
            return Err(ReplayError::invalid(format!(
                "first_max must be non-negative, got {}",
                self.first_max
            )));
        }
        Ok(())
    }
}
