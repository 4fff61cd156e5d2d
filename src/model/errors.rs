use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model error: {0}")]
    ModelError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Model returned {got} outputs for a batch of {expected}")]
    BatchMismatch { expected: usize, got: usize },

    #[error("Model reports stateful = {stateful} but its start state disagrees")]
    StartState { stateful: bool },
}
