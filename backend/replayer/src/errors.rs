//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReplayerError>;
