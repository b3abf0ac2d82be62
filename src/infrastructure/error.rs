use crate::domain::error::{InvalidRangeError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    InvalidRange(#[from] InvalidRangeError),
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}
