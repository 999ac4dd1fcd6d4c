//! # riskops-core
//!
//! Historical Value-at-Risk and Conditional VaR for portfolios.
//!
//! The crate is a pure computation pipeline with no I/O:
//!
//! - **Alignment**: per-symbol return observations and portfolio weights are
//!   inner-joined on date and collapsed into one portfolio return series
//! - **Estimation**: VaR and CVaR from the left tail of that series, using a
//!   linearly interpolated empirical quantile
//! - **Returns**: simple returns derived from close prices
//!
//! ## Example
//!
//! ```rust
//! use riskops_core::prelude::*;
//!
//! let returns = [0.01, -0.02, 0.015, -0.03, 0.005, -0.01, 0.02];
//! let metrics = historical_var_cvar(&returns, 0.99).unwrap();
//! assert!(metrics.cvar >= metrics.var);
//! ```
//!
//! Every function is deterministic and free of shared state, so it can be
//! called concurrently from any number of threads.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod align;
pub mod calculator;
pub mod historical;
pub mod returns;
pub mod types;
mod error;

pub use align::{align, AlignedReturnMatrix, PortfolioReturnSeries};
pub use calculator::{compute_portfolio_risk, PortfolioRisk, RiskParams};
pub use error::{RiskError, RiskResult};
pub use historical::{empirical_quantile, historical_var_cvar, MIN_OBSERVATIONS};
pub use returns::simple_returns;
pub use types::{
    PriceObservation, ReturnObservation, RiskMethod, RiskMetrics, Symbol, WeightVector,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::align::{align, AlignedReturnMatrix, PortfolioReturnSeries};
    pub use crate::calculator::{compute_portfolio_risk, PortfolioRisk, RiskParams};
    pub use crate::historical::{historical_var_cvar, MIN_OBSERVATIONS};
    pub use crate::returns::simple_returns;
    pub use crate::types::*;
    pub use crate::{RiskError, RiskResult};
}
