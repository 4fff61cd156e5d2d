use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Environment error: {0}")]
    EnvError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Action count {got} doesn't match environment count {expected}")]
    ActionCount { expected: usize, got: usize },

    #[error("Environment stepped before reset")]
    NotReset,
}
