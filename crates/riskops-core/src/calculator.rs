//! End-to-end portfolio risk calculation.
//!
//! [`compute_portfolio_risk`] is the one entry point both the request-serving
//! layer and the batch pipeline call: validate parameters, align returns,
//! estimate tail risk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::align::align;
use crate::error::{RiskError, RiskResult};
use crate::historical::historical_var_cvar;
use crate::types::{ReturnObservation, RiskMethod, RiskMetrics, WeightVector};

/// Default confidence level.
pub const DEFAULT_ALPHA: f64 = 0.99;

/// Default horizon in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 1;

/// Default lookback window (one trading year).
pub const DEFAULT_LOOKBACK_DAYS: usize = 252;

/// Parameters of a risk calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    /// Confidence level in (0, 1).
    pub alpha: f64,
    /// Horizon in days. Recorded with results; returns are not rescaled.
    pub horizon_days: u32,
    /// Maximum number of most recent observations used.
    pub lookback_days: usize,
    /// Estimation method.
    pub method: RiskMethod,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            horizon_days: DEFAULT_HORIZON_DAYS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            method: RiskMethod::Historical,
        }
    }
}

impl RiskParams {
    /// Sets the confidence level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the lookback window.
    pub fn with_lookback_days(mut self, lookback_days: usize) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    /// Sets the horizon.
    pub fn with_horizon_days(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    /// Sets the method.
    pub fn with_method(mut self, method: RiskMethod) -> Self {
        self.method = method;
        self
    }

    /// Checks every parameter against its domain.
    pub fn validate(&self) -> RiskResult<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(RiskError::InvalidParameter(format!(
                "alpha must be between 0 and 1, got {}",
                self.alpha
            )));
        }
        if self.horizon_days == 0 {
            return Err(RiskError::invalid_parameter("horizon_days must be > 0"));
        }
        if self.lookback_days == 0 {
            return Err(RiskError::invalid_parameter("lookback_days must be > 0"));
        }
        self.method.ensure_supported()
    }
}

/// Result of a portfolio risk calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRisk {
    /// VaR and CVaR.
    pub metrics: RiskMetrics,
    /// Last date of the aligned series used.
    pub as_of_date: NaiveDate,
    /// Number of portfolio returns the estimate was based on.
    pub observations: usize,
}

/// Aligns `observations` under `weights` and estimates historical VaR/CVaR.
pub fn compute_portfolio_risk(
    observations: &[ReturnObservation],
    weights: &WeightVector,
    params: &RiskParams,
) -> RiskResult<PortfolioRisk> {
    params.validate()?;

    let series = align(observations, weights, params.lookback_days)?;
    let as_of_date = series
        .as_of_date()
        .ok_or_else(|| RiskError::insufficient_data("no aligned returns"))?;

    let metrics = match params.method {
        RiskMethod::Historical => historical_var_cvar(series.values(), params.alpha)?,
        RiskMethod::Parametric | RiskMethod::MonteCarlo => {
            return Err(RiskError::InvalidParameter(format!(
                "unsupported method '{}'",
                params.method
            )))
        }
    };

    Ok(PortfolioRisk {
        metrics,
        as_of_date,
        observations: series.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;
    use approx::assert_relative_eq;

    fn observations(symbol: &str, rets: &[f64]) -> Vec<ReturnObservation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        rets.iter()
            .enumerate()
            .map(|(i, r)| {
                ReturnObservation::new(
                    Symbol::new(symbol).unwrap(),
                    start + chrono::Duration::days(i as i64),
                    *r,
                )
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        let p = RiskParams::default();
        assert_relative_eq!(p.alpha, 0.99);
        assert_eq!(p.horizon_days, 1);
        assert_eq!(p.lookback_days, 252);
        assert_eq!(p.method, RiskMethod::Historical);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let base = RiskParams::default();
        for params in [
            base.with_alpha(0.0),
            base.with_alpha(1.0),
            base.with_horizon_days(0),
            base.with_lookback_days(0),
            base.with_method(RiskMethod::Parametric),
            base.with_method(RiskMethod::MonteCarlo),
        ] {
            assert!(matches!(
                params.validate(),
                Err(RiskError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_single_asset_matches_estimator() {
        let rets = [0.01, -0.02, 0.015, -0.03, 0.005, -0.01, 0.02];
        let obs = observations("SPY", &rets);
        let weights = WeightVector::from_pairs(&[("SPY", 3.0)]).unwrap();

        let risk = compute_portfolio_risk(&obs, &weights, &RiskParams::default()).unwrap();
        let direct = historical_var_cvar(&rets, 0.99).unwrap();

        assert_eq!(risk.metrics, direct);
        assert_eq!(risk.observations, 7);
        assert_eq!(risk.as_of_date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
    }

    #[test]
    fn test_lookback_limits_sample() {
        let rets: Vec<f64> = (0..20).map(|i| (i as f64 - 10.0) / 1000.0).collect();
        let obs = observations("SPY", &rets);
        let weights = WeightVector::from_pairs(&[("SPY", 1.0)]).unwrap();
        let params = RiskParams::default().with_lookback_days(5).with_alpha(0.9);

        let risk = compute_portfolio_risk(&obs, &weights, &params).unwrap();
        assert_eq!(risk.observations, 5);
        let direct = historical_var_cvar(&rets[15..], 0.9).unwrap();
        assert_eq!(risk.metrics, direct);
    }

    #[test]
    fn test_lookback_below_floor_is_insufficient() {
        let rets = [0.01, -0.02, 0.015, -0.03, 0.005, -0.01, 0.02];
        let obs = observations("SPY", &rets);
        let weights = WeightVector::from_pairs(&[("SPY", 1.0)]).unwrap();
        let params = RiskParams::default().with_lookback_days(4);

        assert!(matches!(
            compute_portfolio_risk(&obs, &weights, &params),
            Err(RiskError::InsufficientData(_))
        ));
    }
}
