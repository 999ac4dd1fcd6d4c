//! Ingest command implementation.
//!
//! Loads raw close prices into storage.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use riskops_engine::{ingest, RiskEngine};

use crate::cli::OutputFormat;
use crate::commands::{parse_date, parse_symbols};
use crate::error::CliError;
use crate::output::{print_single, print_success};

/// Where prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Seeded random walk on business days
    Synthetic,
    /// CSV file with symbol,date,close columns
    Csv,
}

/// Arguments for the ingest command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Comma-separated symbols
    #[arg(short, long, default_value = "AAPL,MSFT")]
    pub symbols: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    pub start: String,

    /// End date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-12-31")]
    pub end: String,

    /// Data source
    #[arg(long, value_enum, default_value = "synthetic")]
    pub source: PriceSource,

    /// CSV path when --source csv
    #[arg(long)]
    pub csv_path: Option<PathBuf>,

    /// Random seed for synthetic prices
    #[arg(long, default_value = "7")]
    pub seed: u64,
}

#[derive(Debug, Serialize)]
struct IngestSummary {
    source: PriceSource,
    symbols: Vec<String>,
    rows: usize,
}

/// Execute the ingest command.
pub fn execute(args: IngestArgs, engine: &RiskEngine, format: OutputFormat) -> Result<()> {
    let symbols = parse_symbols(&args.symbols)?;

    let prices = match args.source {
        PriceSource::Synthetic => {
            let start = parse_date(&args.start)?;
            let end = parse_date(&args.end)?;
            ingest::synthetic_prices(&symbols, start, end, args.seed)?
        }
        PriceSource::Csv => {
            let path = args
                .csv_path
                .ok_or_else(|| CliError::MissingArgument("--csv-path".to_string()))?;
            ingest::load_price_csv(&path, &symbols)?
        }
    };

    let rows = engine.ingest_prices(&prices)?;

    let summary = IngestSummary {
        source: args.source,
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        rows,
    };
    match format {
        OutputFormat::Json => print_single(&summary, Vec::new(), format)?,
        OutputFormat::Table => print_success(
            &format!(
                "Ingested {} price rows for {}",
                summary.rows,
                summary.symbols.join(",")
            ),
            format,
        ),
    }

    Ok(())
}
