//! Data Transfer Objects for API requests and responses.

use chrono::{DateTime, NaiveDate, Utc};
use riskops_core::{RiskMethod, RiskParams, Symbol};
use riskops_engine::{RiskReport, RiskRequest, DEFAULT_PORTFOLIO};
use riskops_storage::{PortfolioRecord, Position, RiskResultRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiResult;

// =============================================================================
// HEALTH
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when storage answers, `degraded` otherwise.
    pub status: String,
    pub storage: String,
    pub storage_ok: bool,
    pub version: String,
    pub time_utc: DateTime<Utc>,
}

// =============================================================================
// PORTFOLIOS
// =============================================================================

/// A position in a request or response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionDto {
    pub symbol: String,
    pub weight: f64,
}

/// Portfolio response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PortfolioResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub positions: Vec<PositionDto>,
}

impl From<PortfolioRecord> for PortfolioResponse {
    fn from(record: PortfolioRecord) -> Self {
        Self {
            name: record.name,
            description: record.description,
            created_at: record.created_at,
            positions: record
                .positions
                .into_iter()
                .map(|p| PositionDto {
                    symbol: p.symbol.to_string(),
                    weight: p.weight,
                })
                .collect(),
        }
    }
}

/// Portfolio list response.
#[derive(Debug, Serialize, Deserialize)]
pub struct PortfolioListResponse {
    pub portfolios: Vec<PortfolioResponse>,
    pub count: usize,
}

/// Request to create or replace a portfolio.
#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub positions: Vec<PositionDto>,
}

impl CreatePortfolioRequest {
    /// Convert to a storage record. Symbols are normalised here.
    pub fn into_record(self) -> ApiResult<PortfolioRecord> {
        let positions = self
            .positions
            .into_iter()
            .map(|p| -> ApiResult<Position> {
                Ok(Position::new(Symbol::new(&p.symbol)?, p.weight))
            })
            .collect::<ApiResult<Vec<_>>>()?;

        let record = PortfolioRecord::new(self.name.trim(), positions);
        Ok(match self.description {
            Some(description) => record.with_description(description),
            None => record,
        })
    }
}

// =============================================================================
// RISK
// =============================================================================

fn default_portfolio() -> String {
    DEFAULT_PORTFOLIO.to_string()
}

fn default_alpha() -> f64 {
    riskops_core::calculator::DEFAULT_ALPHA
}

fn default_horizon_days() -> u32 {
    riskops_core::calculator::DEFAULT_HORIZON_DAYS
}

fn default_method() -> String {
    RiskMethod::Historical.as_str().to_string()
}

fn default_lookback_days() -> usize {
    riskops_core::calculator::DEFAULT_LOOKBACK_DAYS
}

fn default_true() -> bool {
    true
}

/// Risk calculation request. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskCalcRequest {
    #[serde(default = "default_portfolio")]
    pub portfolio: String,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,
    #[serde(default = "default_true")]
    pub persist: bool,
    #[serde(default)]
    pub model_version: Option<String>,
}

impl Default for RiskCalcRequest {
    fn default() -> Self {
        Self {
            portfolio: default_portfolio(),
            alpha: default_alpha(),
            horizon_days: default_horizon_days(),
            method: default_method(),
            lookback_days: default_lookback_days(),
            persist: true,
            model_version: None,
        }
    }
}

impl RiskCalcRequest {
    /// Convert to an engine request, falling back to `default_model_version`.
    pub fn into_engine_request(self, default_model_version: &str) -> ApiResult<RiskRequest> {
        let method: RiskMethod = self.method.parse()?;
        let params = RiskParams {
            alpha: self.alpha,
            horizon_days: self.horizon_days,
            lookback_days: self.lookback_days,
            method,
        };

        Ok(RiskRequest::new(self.portfolio)
            .with_params(params)
            .with_persist(self.persist)
            .with_model_version(
                self.model_version
                    .unwrap_or_else(|| default_model_version.to_string()),
            ))
    }
}

/// Risk calculation response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RiskCalcResponse {
    pub portfolio: String,
    pub as_of_date: NaiveDate,
    pub alpha: f64,
    pub horizon_days: u32,
    pub method: RiskMethod,
    pub model_version: String,
    pub var: f64,
    pub cvar: f64,
    pub observations: usize,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_id: Option<Uuid>,
}

impl From<RiskReport> for RiskCalcResponse {
    fn from(report: RiskReport) -> Self {
        Self {
            portfolio: report.portfolio,
            as_of_date: report.risk.as_of_date,
            alpha: report.params.alpha,
            horizon_days: report.params.horizon_days,
            method: report.params.method,
            model_version: report.model_version,
            var: report.risk.metrics.var,
            cvar: report.risk.metrics.cvar,
            observations: report.risk.observations,
            persisted: report.record.is_some(),
            result_id: report.record.map(|r| r.id),
        }
    }
}

/// Query for the latest stored result.
#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    #[serde(default = "default_portfolio")]
    pub portfolio: String,
}

/// Latest stored result. All result fields are null when nothing is stored yet.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RiskLatestResponse {
    pub portfolio: String,
    pub as_of_date: Option<NaiveDate>,
    pub alpha: Option<f64>,
    pub horizon_days: Option<u32>,
    pub method: Option<RiskMethod>,
    pub model_version: Option<String>,
    pub var: Option<f64>,
    pub cvar: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl RiskLatestResponse {
    /// Build the response from an optional stored record.
    pub fn new(portfolio: impl Into<String>, record: Option<RiskResultRecord>) -> Self {
        let portfolio = portfolio.into();
        match record {
            Some(r) => Self {
                portfolio,
                as_of_date: Some(r.as_of_date),
                alpha: Some(r.alpha),
                horizon_days: Some(r.horizon_days),
                method: Some(r.method),
                model_version: Some(r.model_version),
                var: Some(r.var),
                cvar: Some(r.cvar),
                created_at: Some(r.created_at),
            },
            None => Self {
                portfolio,
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_request_defaults() {
        let req: RiskCalcRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.portfolio, "demo");
        assert_eq!(req.alpha, 0.99);
        assert_eq!(req.horizon_days, 1);
        assert_eq!(req.method, "historical");
        assert_eq!(req.lookback_days, 252);
        assert!(req.persist);

        let engine_req = req.into_engine_request("baseline-historical-v1").unwrap();
        assert_eq!(engine_req, RiskRequest::default());
    }

    #[test]
    fn test_calc_request_unknown_method() {
        let req = RiskCalcRequest {
            method: "garch".to_string(),
            ..RiskCalcRequest::default()
        };
        assert!(req.into_engine_request("v1").is_err());
    }

    #[test]
    fn test_create_portfolio_normalises_symbols() {
        let req: CreatePortfolioRequest = serde_json::from_str(
            r#"{"name": "growth", "positions": [{"symbol": "msft", "weight": 1.0}, {"symbol": " aapl ", "weight": 2.0}]}"#,
        )
        .unwrap();
        let record = req.into_record().unwrap();
        assert_eq!(record.symbols(), Symbol::parse_list("AAPL,MSFT"));
        assert!(record.description.is_none());
    }

    #[test]
    fn test_latest_response_empty() {
        let resp = RiskLatestResponse::new("demo", None);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["portfolio"], "demo");
        assert!(json["var"].is_null());
        assert!(json["as_of_date"].is_null());
    }
}
