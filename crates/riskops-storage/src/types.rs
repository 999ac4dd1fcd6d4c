//! Core storage types.
//!
//! This module defines the data structures stored in the persistence layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use riskops_core::{
    PriceObservation, RiskMethod, RiskMetrics, RiskResult, Symbol, WeightVector,
};

// =============================================================================
// PORTFOLIOS
// =============================================================================

/// A weighted holding in a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Asset symbol.
    pub symbol: Symbol,
    /// Relative weight (need not sum to one across positions).
    pub weight: f64,
}

impl Position {
    /// Creates a position.
    pub fn new(symbol: Symbol, weight: f64) -> Self {
        Self { symbol, weight }
    }
}

/// A named portfolio and its positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    /// Unique portfolio name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Positions, ordered by symbol.
    pub positions: Vec<Position>,
}

impl PortfolioRecord {
    /// Creates a portfolio stamped with the current time.
    pub fn new(name: impl Into<String>, mut positions: Vec<Position>) -> Self {
        positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Self {
            name: name.into(),
            description: None,
            created_at: Utc::now(),
            positions,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Symbols held, ordered.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.positions.iter().map(|p| p.symbol.clone()).collect()
    }

    /// Validated weight vector for the positions.
    pub fn weights(&self) -> RiskResult<WeightVector> {
        WeightVector::new(
            self.positions
                .iter()
                .map(|p| (p.symbol.clone(), p.weight)),
        )
    }
}

// =============================================================================
// MARKET DATA
// =============================================================================

/// A stored close price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Asset symbol.
    pub symbol: Symbol,
    /// Trading date.
    pub date: NaiveDate,
    /// Close price.
    pub close: f64,
    /// Quote currency, if known.
    pub currency: Option<String>,
    /// Where the price came from (`synthetic`, `csv`, ...).
    pub source: String,
}

impl PriceRecord {
    /// Price observation view of the record.
    pub fn observation(&self) -> PriceObservation {
        PriceObservation::new(self.symbol.clone(), self.date, self.close)
    }
}

// =============================================================================
// RISK RESULTS
// =============================================================================

/// A persisted VaR/CVaR calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResultRecord {
    /// Unique record id.
    pub id: Uuid,
    /// Portfolio name.
    pub portfolio: String,
    /// Last date of the return series used.
    pub as_of_date: NaiveDate,
    /// Horizon in days.
    pub horizon_days: u32,
    /// Confidence level.
    pub alpha: f64,
    /// Estimation method.
    pub method: RiskMethod,
    /// Model version tag.
    pub model_version: String,
    /// Value at Risk.
    pub var: f64,
    /// Conditional VaR.
    pub cvar: f64,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

impl RiskResultRecord {
    /// Creates a record for freshly computed metrics.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        portfolio: impl Into<String>,
        as_of_date: NaiveDate,
        horizon_days: u32,
        alpha: f64,
        method: RiskMethod,
        model_version: impl Into<String>,
        metrics: RiskMetrics,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            portfolio: portfolio.into(),
            as_of_date,
            horizon_days,
            alpha,
            method,
            model_version: model_version.into(),
            var: metrics.var,
            cvar: metrics.cvar,
            created_at: Utc::now(),
        }
    }

    /// VaR and CVaR of the record.
    pub fn metrics(&self) -> RiskMetrics {
        RiskMetrics {
            var: self.var,
            cvar: self.cvar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s).unwrap()
    }

    #[test]
    fn test_portfolio_positions_sorted() {
        let p = PortfolioRecord::new(
            "demo",
            vec![Position::new(sym("MSFT"), 0.4), Position::new(sym("AAPL"), 0.6)],
        )
        .with_description("two stocks");

        assert_eq!(p.symbols(), vec![sym("AAPL"), sym("MSFT")]);
        assert_eq!(p.description.as_deref(), Some("two stocks"));
        assert_eq!(p.weights().unwrap().len(), 2);
    }

    #[test]
    fn test_portfolio_invalid_weight() {
        let p = PortfolioRecord::new("bad", vec![Position::new(sym("AAPL"), -1.0)]);
        assert!(p.weights().is_err());
    }

    #[test]
    fn test_risk_record_roundtrips_metrics() {
        let metrics = RiskMetrics {
            var: 0.021,
            cvar: 0.027,
        };
        let record = RiskResultRecord::new(
            "demo",
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            1,
            0.99,
            RiskMethod::Historical,
            "baseline-historical-v1",
            metrics,
        );
        assert_eq!(record.metrics(), metrics);

        let json = serde_json::to_string(&record).unwrap();
        let back: RiskResultRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
