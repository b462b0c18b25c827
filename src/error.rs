//! Error types for the catchment area search.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LociError>;

#[derive(Debug, Error)]
pub enum LociError {
    /// The input data cannot be searched (empty point set, missing columns).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A search or scoring parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for LociError {
    fn from(err: serde_json::Error) -> Self {
        LociError::Config(err.to_string())
    }
}
