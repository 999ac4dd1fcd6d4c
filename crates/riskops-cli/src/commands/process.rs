//! Process command implementation.
//!
//! Derives simple returns from stored prices.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use riskops_engine::RiskEngine;

use crate::cli::OutputFormat;
use crate::commands::parse_symbols;
use crate::output::{print_single, print_success};

/// Arguments for the process command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Comma-separated symbols
    #[arg(short, long, default_value = "AAPL,MSFT")]
    pub symbols: String,
}

#[derive(Debug, Serialize)]
struct ProcessSummary {
    symbols: Vec<String>,
    returns: usize,
}

/// Execute the process command.
pub fn execute(args: ProcessArgs, engine: &RiskEngine, format: OutputFormat) -> Result<()> {
    let symbols = parse_symbols(&args.symbols)?;
    let returns = engine.process_returns(&symbols)?;

    let summary = ProcessSummary {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        returns,
    };
    match format {
        OutputFormat::Json => print_single(&summary, Vec::new(), format)?,
        OutputFormat::Table => print_success(
            &format!("Wrote {} processed returns", summary.returns),
            format,
        ),
    }

    Ok(())
}
