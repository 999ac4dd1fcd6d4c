//! # RiskOps Engine
//!
//! The service layer between storage and the risk core.
//!
//! This crate provides:
//! - [`RiskEngine`]: portfolio management, return processing and risk
//!   calculation over any [`StorageAdapter`](riskops_storage::StorageAdapter)
//! - [`ingest`]: synthetic and CSV price sources
//!
//! ## Pipeline
//!
//! ```text
//! prices ─> ingest_prices ─> raw prices
//!                                │
//!                          process_returns
//!                                │
//!                                v
//! portfolio ─> calculate ─> processed returns ─> align ─> VaR/CVaR ─> risk results
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use riskops_core::Symbol;
//! use riskops_engine::{ingest, RiskEngine, RiskRequest};
//! use riskops_storage::{InMemoryStorage, PortfolioRecord, Position};
//!
//! let engine = RiskEngine::new(Arc::new(InMemoryStorage::new()));
//! let symbols = Symbol::parse_list("AAPL,MSFT");
//!
//! engine.create_portfolio(PortfolioRecord::new("demo", vec![
//!     Position::new(symbols[0].clone(), 0.6),
//!     Position::new(symbols[1].clone(), 0.4),
//! ])).unwrap();
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//! let prices = ingest::synthetic_prices(&symbols, start, end, 42).unwrap();
//! engine.ingest_prices(&prices).unwrap();
//! engine.process_returns(&symbols).unwrap();
//!
//! let report = engine.calculate(&RiskRequest::new("demo")).unwrap();
//! assert!(report.risk.metrics.cvar >= report.risk.metrics.var);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod ingest;

pub use engine::{RiskEngine, RiskReport, RiskRequest, DEFAULT_MODEL_VERSION, DEFAULT_PORTFOLIO};
pub use error::{EngineError, EngineResult};
