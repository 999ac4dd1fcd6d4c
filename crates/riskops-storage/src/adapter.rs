//! Storage adapter trait definition.
//!
//! This module defines the core `StorageAdapter` trait that all storage
//! backends must implement.

use riskops_core::{ReturnObservation, Symbol};

use crate::error::StorageResult;
use crate::types::{PortfolioRecord, PriceRecord, RiskResultRecord};

/// Core storage adapter trait.
///
/// All storage backends (redb, in-memory) implement this trait. Methods are
/// synchronous; the trait is object safe so callers can hold an
/// `Arc<dyn StorageAdapter>`.
///
/// # Example
///
/// ```rust
/// use riskops_storage::{InMemoryStorage, StorageAdapter};
///
/// let storage = InMemoryStorage::new();
/// assert!(storage.is_healthy());
/// assert!(storage.list_portfolios().unwrap().is_empty());
/// ```
pub trait StorageAdapter: Send + Sync {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Checks if the storage is healthy and accessible.
    fn is_healthy(&self) -> bool;

    // =========================================================================
    // PORTFOLIOS
    // =========================================================================

    /// Stores a portfolio, replacing any portfolio with the same name.
    fn store_portfolio(&self, portfolio: &PortfolioRecord) -> StorageResult<()>;

    /// Retrieves a portfolio by name.
    fn get_portfolio(&self, name: &str) -> StorageResult<Option<PortfolioRecord>>;

    /// Lists all portfolios ordered by name.
    fn list_portfolios(&self) -> StorageResult<Vec<PortfolioRecord>>;

    // =========================================================================
    // MARKET DATA
    // =========================================================================

    /// Inserts or replaces prices keyed by `(symbol, date)`. Returns the number written.
    fn upsert_prices(&self, prices: &[PriceRecord]) -> StorageResult<usize>;

    /// Prices for the given symbols, ordered by symbol then date.
    fn get_prices(&self, symbols: &[Symbol]) -> StorageResult<Vec<PriceRecord>>;

    /// Inserts or replaces returns keyed by `(symbol, date)`. Returns the number written.
    fn upsert_returns(&self, returns: &[ReturnObservation]) -> StorageResult<usize>;

    /// Returns for the given symbols, ordered by symbol then date.
    fn get_returns(&self, symbols: &[Symbol]) -> StorageResult<Vec<ReturnObservation>>;

    // =========================================================================
    // RISK RESULTS
    // =========================================================================

    /// Appends a risk result.
    fn append_risk_result(&self, record: &RiskResultRecord) -> StorageResult<()>;

    /// Most recent risk results for a portfolio, newest first.
    fn list_risk_results(
        &self,
        portfolio: &str,
        limit: usize,
    ) -> StorageResult<Vec<RiskResultRecord>>;

    // =========================================================================
    // MAINTENANCE
    // =========================================================================

    /// Gets storage statistics.
    fn stats(&self) -> StorageResult<StorageStats>;
}

/// Storage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of portfolios stored.
    pub portfolio_count: usize,
    /// Number of price records stored.
    pub price_count: usize,
    /// Number of return records stored.
    pub return_count: usize,
    /// Number of risk results stored.
    pub risk_result_count: usize,
}

/// Composite `(symbol, date)` key used by both backends.
pub(crate) fn series_key(symbol: &Symbol, date: chrono::NaiveDate) -> String {
    format!("{}:{}", symbol, date.format("%Y-%m-%d"))
}

/// Orders risk results newest first and applies `limit`.
pub(crate) fn newest_first(mut records: Vec<RiskResultRecord>, limit: usize) -> Vec<RiskResultRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.truncate(limit);
    records
}
