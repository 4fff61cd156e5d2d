use thiserror::Error;

use crate::env::EnvError;
use crate::model::ModelError;

#[derive(Error, Debug)]
pub enum RolloutError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Batched env returned {got} results for {expected} environments")]
    BatchSize { expected: usize, got: usize },

    #[error("Environment {index} finished an episode without a reset observation")]
    MissingResetObservation { index: usize },

    #[error("Invalid rollout: {0}")]
    InvalidRollout(String),
}
