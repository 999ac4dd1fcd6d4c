//! Error types for risk calculations.

use thiserror::Error;

/// Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur while aligning returns or estimating risk.
///
/// Every variant carries a human-readable reason. Callers decide how to present
/// them (a bad request, a failed batch job, ...).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Parameter outside its valid domain (alpha, lookback, horizon, method).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An aligned return column has no matching weight.
    #[error("missing weight for symbol '{symbol}'")]
    MissingWeight {
        /// Symbol without a weight.
        symbol: String,
    },

    /// A weighted symbol has no return observations at all.
    #[error("no return observations for symbol '{symbol}'")]
    UnknownSymbol {
        /// Symbol without returns.
        symbol: String,
    },

    /// Negative, non-finite or zero-sum weights.
    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    /// Not enough observations to align or estimate.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

impl RiskError {
    /// Stable, presentation-agnostic code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            RiskError::InvalidParameter(_) => "INVALID_PARAMETER",
            RiskError::MissingWeight { .. } => "MISSING_WEIGHT",
            RiskError::UnknownSymbol { .. } => "UNKNOWN_SYMBOL",
            RiskError::InvalidWeight(_) => "INVALID_WEIGHT",
            RiskError::InsufficientData(_) => "INSUFFICIENT_DATA",
        }
    }

    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        RiskError::InvalidParameter(msg.into())
    }

    pub(crate) fn insufficient_data(msg: impl Into<String>) -> Self {
        RiskError::InsufficientData(msg.into())
    }
}
