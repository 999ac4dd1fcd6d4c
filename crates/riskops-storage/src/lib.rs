//! RiskOps Storage Layer
//!
//! Storage adapters and persistence for portfolios, market data and risk
//! results. The risk core never touches storage; the engine reads inputs
//! through a [`StorageAdapter`] and writes results back through it.
//!
//! # Features
//!
//! - **Portfolios**: named weight sets
//! - **Raw prices** and **processed returns**: upserted by `(symbol, date)`
//! - **Risk results**: append-only VaR/CVaR history per portfolio
//! - **Multiple Backends**: redb (default) and in-memory adapters
//!
//! # Storage Backends
//!
//! ## RedbStorage (Default)
//!
//! Uses [redb](https://crates.io/crates/redb), a pure-Rust embedded database
//! with ACID transactions. Suitable for single-process applications.
//!
//! ## InMemoryStorage
//!
//! A simple in-memory implementation for testing and development.
//! Data is not persisted across restarts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod adapter;
mod error;
mod memory;
mod redb;
mod types;

pub use adapter::{StorageAdapter, StorageStats};
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStorage;
pub use crate::redb::RedbStorage;
pub use types::{PortfolioRecord, Position, PriceRecord, RiskResultRecord};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::{StorageAdapter, StorageStats};
    pub use crate::error::{StorageError, StorageResult};
    pub use crate::memory::InMemoryStorage;
    pub use crate::redb::RedbStorage;
    pub use crate::types::{PortfolioRecord, Position, PriceRecord, RiskResultRecord};
}
