//! In-memory storage adapter.
//!
//! Provides a simple in-memory implementation of the StorageAdapter trait.
//! Useful for testing and development. Data is not persisted across restarts.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::NaiveDate;
use riskops_core::{ReturnObservation, Symbol};

use crate::adapter::{newest_first, StorageAdapter, StorageStats};
use crate::error::{StorageError, StorageResult};
use crate::types::{PortfolioRecord, PriceRecord, RiskResultRecord};

type SeriesKey = (Symbol, NaiveDate);

/// In-memory storage adapter.
///
/// This adapter stores all data in memory using standard collections.
/// It's thread-safe through the use of RwLock.
///
/// # Example
///
/// ```rust
/// use riskops_storage::{InMemoryStorage, StorageAdapter};
///
/// let storage = InMemoryStorage::new();
/// assert_eq!(storage.backend_name(), "memory");
/// ```
pub struct InMemoryStorage {
    portfolios: RwLock<BTreeMap<String, PortfolioRecord>>,
    prices: RwLock<BTreeMap<SeriesKey, PriceRecord>>,
    returns: RwLock<BTreeMap<SeriesKey, ReturnObservation>>,
    risk_results: RwLock<HashMap<String, Vec<RiskResultRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    pub fn new() -> Self {
        Self {
            portfolios: RwLock::new(BTreeMap::new()),
            prices: RwLock::new(BTreeMap::new()),
            returns: RwLock::new(BTreeMap::new()),
            risk_results: RwLock::new(HashMap::new()),
        }
    }

    /// Clears all data from storage.
    pub fn clear(&self) -> StorageResult<()> {
        self.portfolios.write().map_err(StorageError::lock)?.clear();
        self.prices.write().map_err(StorageError::lock)?.clear();
        self.returns.write().map_err(StorageError::lock)?.clear();
        self.risk_results.write().map_err(StorageError::lock)?.clear();
        Ok(())
    }
}

impl StorageAdapter for InMemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn store_portfolio(&self, portfolio: &PortfolioRecord) -> StorageResult<()> {
        self.portfolios
            .write()
            .map_err(StorageError::lock)?
            .insert(portfolio.name.clone(), portfolio.clone());
        Ok(())
    }

    fn get_portfolio(&self, name: &str) -> StorageResult<Option<PortfolioRecord>> {
        Ok(self
            .portfolios
            .read()
            .map_err(StorageError::lock)?
            .get(name)
            .cloned())
    }

    fn list_portfolios(&self) -> StorageResult<Vec<PortfolioRecord>> {
        Ok(self
            .portfolios
            .read()
            .map_err(StorageError::lock)?
            .values()
            .cloned()
            .collect())
    }

    fn upsert_prices(&self, prices: &[PriceRecord]) -> StorageResult<usize> {
        let mut table = self.prices.write().map_err(StorageError::lock)?;
        for price in prices {
            table.insert((price.symbol.clone(), price.date), price.clone());
        }
        Ok(prices.len())
    }

    fn get_prices(&self, symbols: &[Symbol]) -> StorageResult<Vec<PriceRecord>> {
        let table = self.prices.read().map_err(StorageError::lock)?;
        Ok(table
            .iter()
            .filter(|((symbol, _), _)| symbols.contains(symbol))
            .map(|(_, p)| p.clone())
            .collect())
    }

    fn upsert_returns(&self, returns: &[ReturnObservation]) -> StorageResult<usize> {
        let mut table = self.returns.write().map_err(StorageError::lock)?;
        for ret in returns {
            table.insert((ret.symbol.clone(), ret.date), ret.clone());
        }
        Ok(returns.len())
    }

    fn get_returns(&self, symbols: &[Symbol]) -> StorageResult<Vec<ReturnObservation>> {
        let table = self.returns.read().map_err(StorageError::lock)?;
        Ok(table
            .iter()
            .filter(|((symbol, _), _)| symbols.contains(symbol))
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn append_risk_result(&self, record: &RiskResultRecord) -> StorageResult<()> {
        self.risk_results
            .write()
            .map_err(StorageError::lock)?
            .entry(record.portfolio.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn list_risk_results(
        &self,
        portfolio: &str,
        limit: usize,
    ) -> StorageResult<Vec<RiskResultRecord>> {
        let records = self
            .risk_results
            .read()
            .map_err(StorageError::lock)?
            .get(portfolio)
            .cloned()
            .unwrap_or_default();
        Ok(newest_first(records, limit))
    }

    fn stats(&self) -> StorageResult<StorageStats> {
        Ok(StorageStats {
            portfolio_count: self.portfolios.read().map_err(StorageError::lock)?.len(),
            price_count: self.prices.read().map_err(StorageError::lock)?.len(),
            return_count: self.returns.read().map_err(StorageError::lock)?.len(),
            risk_result_count: self
                .risk_results
                .read()
                .map_err(StorageError::lock)?
                .values()
                .map(Vec::len)
                .sum(),
        })
    }
}
