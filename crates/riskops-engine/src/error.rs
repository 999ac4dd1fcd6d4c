//! Engine error types.

use riskops_core::RiskError;
use riskops_storage::StorageError;
use thiserror::Error;

/// Engine result type.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Request cannot be served with the stored data
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Risk calculation rejected its inputs
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Storage error
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// CSV parsing error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// True when the caller supplied something unusable, as opposed to an
    /// infrastructure failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::NotFound(_) | EngineError::InvalidInput(_) | EngineError::Risk(_)
        )
    }
}
