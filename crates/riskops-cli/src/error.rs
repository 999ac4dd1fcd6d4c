//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Invalid `SYMBOL=WEIGHT` position.
    #[error("Invalid position: {0}. Use SYMBOL=WEIGHT.")]
    InvalidPosition(String),

    /// No symbols given.
    #[error("No symbols given: {0}")]
    NoSymbols(String),

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
