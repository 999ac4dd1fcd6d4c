//! Risk command implementation.
//!
//! Computes historical VaR/CVaR for a portfolio and stores the result.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use riskops_core::{RiskMethod, RiskParams};
use riskops_engine::{RiskEngine, RiskReport, RiskRequest, DEFAULT_MODEL_VERSION};
use riskops_storage::RiskResultRecord;

use crate::cli::OutputFormat;
use crate::output::{print_header, print_single, KeyValue};

/// Arguments for the risk command.
#[derive(Args, Debug)]
pub struct RiskArgs {
    /// Portfolio name
    #[arg(short, long, default_value = "demo")]
    pub portfolio: String,

    /// Confidence level, e.g. 0.99
    #[arg(short, long, default_value = "0.99")]
    pub alpha: f64,

    /// Horizon in days (stored as metadata)
    #[arg(long, default_value = "1")]
    pub horizon_days: u32,

    /// Estimation method: historical, parametric or mc (only historical is available)
    #[arg(short, long, default_value = "historical")]
    pub method: String,

    /// Maximum number of return observations to use
    #[arg(short, long, default_value = "252")]
    pub lookback_days: usize,

    /// Model version tag stored with the result
    #[arg(long, default_value = DEFAULT_MODEL_VERSION)]
    pub model_version: String,

    /// Compute without storing the result
    #[arg(long)]
    pub no_persist: bool,
}

/// Flat view of a computed or stored result.
#[derive(Debug, Serialize)]
pub(crate) struct RiskSummary {
    pub portfolio: String,
    pub as_of_date: NaiveDate,
    pub alpha: f64,
    pub horizon_days: u32,
    pub method: RiskMethod,
    pub model_version: String,
    pub var: f64,
    pub cvar: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
}

impl RiskSummary {
    pub(crate) fn rows(&self) -> Vec<KeyValue> {
        let mut rows = vec![
            KeyValue::new("Portfolio", &self.portfolio),
            KeyValue::new("As of", self.as_of_date),
            KeyValue::new("Alpha", self.alpha),
            KeyValue::new("Horizon (days)", self.horizon_days),
            KeyValue::new("Method", self.method),
            KeyValue::new("Model version", &self.model_version),
            KeyValue::from_percent("VaR", self.var),
            KeyValue::from_percent("CVaR", self.cvar),
        ];
        if let Some(n) = self.observations {
            rows.push(KeyValue::new("Observations", n));
        }
        if let Some(id) = &self.result_id {
            rows.push(KeyValue::new("Result id", id));
        }
        rows
    }
}

impl From<RiskReport> for RiskSummary {
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
            observations: Some(report.risk.observations),
            result_id: report.record.map(|r| r.id.to_string()),
        }
    }
}

impl From<RiskResultRecord> for RiskSummary {
    fn from(record: RiskResultRecord) -> Self {
        Self {
            portfolio: record.portfolio,
            as_of_date: record.as_of_date,
            alpha: record.alpha,
            horizon_days: record.horizon_days,
            method: record.method,
            model_version: record.model_version,
            var: record.var,
            cvar: record.cvar,
            observations: None,
            result_id: Some(record.id.to_string()),
        }
    }
}

/// Execute the risk command.
pub fn execute(args: RiskArgs, engine: &RiskEngine, format: OutputFormat) -> Result<()> {
    let method: RiskMethod = args.method.parse()?;
    let params = RiskParams {
        alpha: args.alpha,
        horizon_days: args.horizon_days,
        lookback_days: args.lookback_days,
        method,
    };
    let request = RiskRequest::new(args.portfolio)
        .with_params(params)
        .with_persist(!args.no_persist)
        .with_model_version(args.model_version);

    let summary = RiskSummary::from(engine.calculate(&request)?);

    print_header(&format!("Risk: {}", summary.portfolio), format);
    print_single(&summary, summary.rows(), format)?;

    Ok(())
}
