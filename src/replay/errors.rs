use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid replay config: {0}")]
    Config(#[from] serde_json::Error),
}

impl ReplayError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ReplayError::InvalidArgument(msg.into())
    }
}

/// Raw weights must be finite and non-negative.
pub(crate) fn check_weight(weight: f64) -> Result<(), ReplayError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ReplayError::invalid(format!(
            "weight must be finite and non-negative, got {weight}"
        )))
    }
}
