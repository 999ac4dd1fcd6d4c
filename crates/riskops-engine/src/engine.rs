//! The risk engine: resolves portfolios, reads processed returns, runs the
//! core calculation and records the result.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use riskops_core::{compute_portfolio_risk, simple_returns, PortfolioRisk, RiskParams, Symbol};
use riskops_storage::{PortfolioRecord, PriceRecord, RiskResultRecord, StorageAdapter};

use crate::error::{EngineError, EngineResult};
use crate::ingest::validate_price;

/// Model version tag attached to results when the caller gives none.
pub const DEFAULT_MODEL_VERSION: &str = "baseline-historical-v1";

/// Portfolio used when the caller gives none.
pub const DEFAULT_PORTFOLIO: &str = "demo";

/// A request to compute portfolio risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRequest {
    /// Portfolio name.
    pub portfolio: String,
    /// Calculation parameters.
    pub params: RiskParams,
    /// Whether to store the result.
    pub persist: bool,
    /// Model version tag stored with the result.
    pub model_version: String,
}

impl Default for RiskRequest {
    fn default() -> Self {
        Self {
            portfolio: DEFAULT_PORTFOLIO.to_string(),
            params: RiskParams::default(),
            persist: true,
            model_version: DEFAULT_MODEL_VERSION.to_string(),
        }
    }
}

impl RiskRequest {
    /// Request for `portfolio` with default parameters.
    pub fn new(portfolio: impl Into<String>) -> Self {
        Self {
            portfolio: portfolio.into(),
            ..Self::default()
        }
    }

    /// Sets the calculation parameters.
    pub fn with_params(mut self, params: RiskParams) -> Self {
        self.params = params;
        self
    }

    /// Sets whether the result is stored.
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Sets the model version tag.
    pub fn with_model_version(mut self, model_version: impl Into<String>) -> Self {
        self.model_version = model_version.into();
        self
    }
}

/// Outcome of [`RiskEngine::calculate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Portfolio name.
    pub portfolio: String,
    /// Parameters the calculation ran with.
    pub params: RiskParams,
    /// Model version tag.
    pub model_version: String,
    /// Computed risk.
    pub risk: PortfolioRisk,
    /// The stored record, when the request asked for persistence.
    pub record: Option<RiskResultRecord>,
}

/// Orchestrates storage and the risk core.
///
/// Cheap to clone; all clones share the same storage adapter.
#[derive(Clone)]
pub struct RiskEngine {
    storage: Arc<dyn StorageAdapter>,
}

impl std::fmt::Debug for RiskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskEngine")
            .field("storage", &self.storage.backend_name())
            .finish()
    }
}

impl RiskEngine {
    /// Creates an engine over a storage adapter.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// The underlying storage adapter.
    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    // =========================================================================
    // PORTFOLIOS
    // =========================================================================

    /// Looks up a portfolio by name.
    pub fn portfolio(&self, name: &str) -> EngineResult<PortfolioRecord> {
        self.storage
            .get_portfolio(name)?
            .ok_or_else(|| EngineError::NotFound(format!("portfolio '{}'", name)))
    }

    /// All portfolios, by name.
    pub fn list_portfolios(&self) -> EngineResult<Vec<PortfolioRecord>> {
        Ok(self.storage.list_portfolios()?)
    }

    /// Validates and stores a portfolio, replacing any portfolio of the same name.
    pub fn create_portfolio(&self, portfolio: PortfolioRecord) -> EngineResult<PortfolioRecord> {
        if portfolio.name.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "portfolio name must not be empty".to_string(),
            ));
        }
        portfolio.weights()?;

        self.storage.store_portfolio(&portfolio)?;
        tracing::info!(
            portfolio = %portfolio.name,
            positions = portfolio.positions.len(),
            "stored portfolio"
        );
        Ok(portfolio)
    }

    // =========================================================================
    // MARKET DATA
    // =========================================================================

    /// Upserts raw prices. Returns the number of records written.
    ///
    /// Nothing is written unless every close is finite and positive.
    pub fn ingest_prices(&self, prices: &[PriceRecord]) -> EngineResult<usize> {
        prices.iter().try_for_each(validate_price)?;
        let written = self.storage.upsert_prices(prices)?;
        tracing::info!(rows = written, "ingested prices");
        Ok(written)
    }

    /// Derives simple returns from the stored prices of `symbols` and upserts
    /// them. Returns the number of return observations written.
    pub fn process_returns(&self, symbols: &[Symbol]) -> EngineResult<usize> {
        let prices: Vec<_> = self
            .storage
            .get_prices(symbols)?
            .iter()
            .map(PriceRecord::observation)
            .collect();
        if prices.is_empty() {
            return Err(EngineError::InvalidInput(
                "no raw prices for the requested symbols; ingest first".to_string(),
            ));
        }

        let returns = simple_returns(&prices);
        let written = self.storage.upsert_returns(&returns)?;
        tracing::info!(
            symbols = symbols.len(),
            prices = prices.len(),
            returns = written,
            "processed returns"
        );
        Ok(written)
    }

    // =========================================================================
    // RISK
    // =========================================================================

    /// Computes historical VaR/CVaR for the requested portfolio.
    ///
    /// # Errors
    ///
    /// * `NotFound` - the portfolio does not exist
    /// * `InvalidInput` - the portfolio has no positions, or none of its
    ///   symbols has processed returns
    /// * `Risk(UnknownSymbol)` - some, but not all, symbols have returns
    /// * `Risk(..)` - any other alignment or estimation failure (bad alpha,
    ///   unsupported method, fewer than five aligned returns, ...)
    /// * `Storage` - reading inputs or writing the result failed
    pub fn calculate(&self, request: &RiskRequest) -> EngineResult<RiskReport> {
        let portfolio = self.portfolio(&request.portfolio)?;
        if portfolio.positions.is_empty() {
            return Err(EngineError::InvalidInput(
                "portfolio has no positions".to_string(),
            ));
        }

        let weights = portfolio.weights()?;
        let returns = self.storage.get_returns(&portfolio.symbols())?;
        if returns.is_empty() {
            return Err(EngineError::InvalidInput(
                "no processed returns; run processing first".to_string(),
            ));
        }

        let risk = compute_portfolio_risk(&returns, &weights, &request.params)?;
        tracing::info!(
            portfolio = %portfolio.name,
            alpha = request.params.alpha,
            observations = risk.observations,
            as_of = %risk.as_of_date,
            var = risk.metrics.var,
            cvar = risk.metrics.cvar,
            "computed risk"
        );

        let record = if request.persist {
            let record = RiskResultRecord::new(
                portfolio.name.as_str(),
                risk.as_of_date,
                request.params.horizon_days,
                request.params.alpha,
                request.params.method,
                request.model_version.as_str(),
                risk.metrics,
            );
            self.storage.append_risk_result(&record)?;
            tracing::debug!(id = %record.id, "stored risk result");
            Some(record)
        } else {
            None
        };

        Ok(RiskReport {
            portfolio: portfolio.name,
            params: request.params,
            model_version: request.model_version.clone(),
            risk,
            record,
        })
    }

    /// Most recently stored result for a portfolio, if any.
    pub fn latest(&self, portfolio: &str) -> EngineResult<Option<RiskResultRecord>> {
        self.portfolio(portfolio)?;
        Ok(self
            .storage
            .list_risk_results(portfolio, 1)?
            .into_iter()
            .next())
    }

    /// Stored results for a portfolio, newest first.
    pub fn history(&self, portfolio: &str, limit: usize) -> EngineResult<Vec<RiskResultRecord>> {
        self.portfolio(portfolio)?;
        Ok(self.storage.list_risk_results(portfolio, limit)?)
    }
}
