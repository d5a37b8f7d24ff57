use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoasterError {
    /// Raised while building a track, car or train from bad input.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Raised when a sample or update receives a non-finite or out-of-range value.
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl CoasterError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CoasterError>;

/// Reject NaN and infinities with a `Domain` error naming the offending input.
pub fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoasterError::domain(format!("{name} must be finite, got {value}")))
    }
}
