use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the stores, persistence sync and configuration layers.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("No active session")]
    NotAuthenticated,
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, TrackerError>;

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}
