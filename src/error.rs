use thiserror::Error;

/// Failures surfaced by the projection, goal, debt and rate functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid rate: {0}")]
    InvalidRate(String),
}

impl ProjectionError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_rate(msg: impl Into<String>) -> Self {
        Self::InvalidRate(msg.into())
    }
}

/// Failures while loading an engine configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T, E = ProjectionError> = std::result::Result<T, E>;
