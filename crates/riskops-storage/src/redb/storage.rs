//! RedbStorage implementation.
//!
//! Implements the StorageAdapter trait using redb as the underlying database.
//! Values are JSON-encoded records.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use riskops_core::{ReturnObservation, Symbol};

use crate::adapter::{newest_first, series_key, StorageAdapter, StorageStats};
use crate::error::StorageResult;
use crate::types::{PortfolioRecord, PriceRecord, RiskResultRecord};

/// String-keyed table holding JSON-encoded records.
type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

// Table definitions
const PORTFOLIOS_TABLE: JsonTable = TableDefinition::new("portfolios");
const PRICES_TABLE: JsonTable = TableDefinition::new("raw_prices");
const RETURNS_TABLE: JsonTable = TableDefinition::new("processed_returns");
const RISK_RESULTS_TABLE: JsonTable = TableDefinition::new("risk_results");

/// Redb-based storage adapter.
///
/// This adapter uses redb, a pure-Rust embedded database, for persistent storage.
/// It provides ACID transactions and is suitable for single-process applications.
///
/// # Example
///
/// ```rust,ignore
/// use riskops_storage::{RedbStorage, StorageAdapter};
///
/// let storage = RedbStorage::open("./riskops.redb")?;
/// assert!(storage.is_healthy());
/// ```
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Opens or creates a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.initialize_tables()?;
        Ok(storage)
    }

    /// Initializes all required tables.
    fn initialize_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(PORTFOLIOS_TABLE)?;
            let _ = write_txn.open_table(PRICES_TABLE)?;
            let _ = write_txn.open_table(RETURNS_TABLE)?;
            let _ = write_txn.open_table(RISK_RESULTS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Creates a composite key for risk results.
    fn risk_result_key(record: &RiskResultRecord) -> String {
        format!("{}:{}", record.portfolio, record.id)
    }

    /// Reads every value of a table whose decoded record passes `keep`.
    fn scan<T, F>(&self, def: JsonTable, keep: F) -> StorageResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;
        let mut out = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let record: T = serde_json::from_slice(value.value())?;
            if keep(&record) {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// Writes `(key, record)` pairs in a single transaction.
    fn write_all<T: serde::Serialize>(
        &self,
        def: JsonTable,
        records: impl Iterator<Item = (String, T)>,
    ) -> StorageResult<usize> {
        let write_txn = self.db.begin_write()?;
        let mut written = 0;
        {
            let mut table = write_txn.open_table(def)?;
            for (key, record) in records {
                let data = serde_json::to_vec(&record)?;
                table.insert(key.as_str(), data.as_slice())?;
                written += 1;
            }
        }
        write_txn.commit()?;
        Ok(written)
    }

    fn table_len(&self, def: JsonTable) -> StorageResult<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;
        Ok(table.len()? as usize)
    }
}

impl StorageAdapter for RedbStorage {
    fn backend_name(&self) -> &'static str {
        "redb"
    }

    fn is_healthy(&self) -> bool {
        // Try a simple read transaction to verify database is accessible
        self.db.begin_read().is_ok()
    }

    fn store_portfolio(&self, portfolio: &PortfolioRecord) -> StorageResult<()> {
        self.write_all(
            PORTFOLIOS_TABLE,
            std::iter::once((portfolio.name.clone(), portfolio)),
        )?;
        Ok(())
    }

    fn get_portfolio(&self, name: &str) -> StorageResult<Option<PortfolioRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PORTFOLIOS_TABLE)?;
        match table.get(name)? {
            Some(data) => {
                let portfolio: PortfolioRecord = serde_json::from_slice(data.value())?;
                Ok(Some(portfolio))
            }
            None => Ok(None),
        }
    }

    fn list_portfolios(&self) -> StorageResult<Vec<PortfolioRecord>> {
        // Keys are portfolio names, so iteration order is name order.
        self.scan(PORTFOLIOS_TABLE, |_: &PortfolioRecord| true)
    }

    fn upsert_prices(&self, prices: &[PriceRecord]) -> StorageResult<usize> {
        self.write_all(
            PRICES_TABLE,
            prices.iter().map(|p| (series_key(&p.symbol, p.date), p)),
        )
    }

    fn get_prices(&self, symbols: &[Symbol]) -> StorageResult<Vec<PriceRecord>> {
        let mut prices = self.scan(PRICES_TABLE, |p: &PriceRecord| {
            symbols.contains(&p.symbol)
        })?;
        prices.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.date.cmp(&b.date)));
        Ok(prices)
    }

    fn upsert_returns(&self, returns: &[ReturnObservation]) -> StorageResult<usize> {
        self.write_all(
            RETURNS_TABLE,
            returns.iter().map(|r| (series_key(&r.symbol, r.date), r)),
        )
    }

    fn get_returns(&self, symbols: &[Symbol]) -> StorageResult<Vec<ReturnObservation>> {
        let mut returns = self.scan(RETURNS_TABLE, |r: &ReturnObservation| {
            symbols.contains(&r.symbol)
        })?;
        returns.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.date.cmp(&b.date)));
        Ok(returns)
    }

    fn append_risk_result(&self, record: &RiskResultRecord) -> StorageResult<()> {
        self.write_all(
            RISK_RESULTS_TABLE,
            std::iter::once((Self::risk_result_key(record), record)),
        )?;
        Ok(())
    }

    fn list_risk_results(
        &self,
        portfolio: &str,
        limit: usize,
    ) -> StorageResult<Vec<RiskResultRecord>> {
        let records = self.scan(RISK_RESULTS_TABLE, |r: &RiskResultRecord| {
            r.portfolio == portfolio
        })?;
        Ok(newest_first(records, limit))
    }

    fn stats(&self) -> StorageResult<StorageStats> {
        Ok(StorageStats {
            portfolio_count: self.table_len(PORTFOLIOS_TABLE)?,
            price_count: self.table_len(PRICES_TABLE)?,
            return_count: self.table_len(RETURNS_TABLE)?,
            risk_result_count: self.table_len(RISK_RESULTS_TABLE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{backend_contract, sample_portfolio};

    #[test]
    fn test_redb_backend_contract() {
        let dir = tempfile::tempdir().unwrap();
        let storage = RedbStorage::open(dir.path().join("riskops.redb")).unwrap();
        backend_contract(&storage);
    }

    #[test]
    fn test_redb_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("riskops.redb");
        {
            let storage = RedbStorage::open(&path).unwrap();
            storage.store_portfolio(&sample_portfolio()).unwrap();
        }
        let storage = RedbStorage::open(&path).unwrap();
        let portfolio = storage.get_portfolio("demo").unwrap().unwrap();
        assert_eq!(portfolio, sample_portfolio());
        assert_eq!(storage.stats().unwrap().portfolio_count, 1);
    }
}
