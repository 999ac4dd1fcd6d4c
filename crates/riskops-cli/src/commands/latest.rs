//! Latest command implementation.

use anyhow::Result;
use clap::Args;

use riskops_engine::RiskEngine;

use crate::cli::OutputFormat;
use crate::commands::risk::RiskSummary;
use crate::output::{print_header, print_info, print_single};

/// Arguments for the latest command.
#[derive(Args, Debug)]
pub struct LatestArgs {
    /// Portfolio name
    #[arg(short, long, default_value = "demo")]
    pub portfolio: String,
}

/// Execute the latest command.
pub fn execute(args: LatestArgs, engine: &RiskEngine, format: OutputFormat) -> Result<()> {
    match engine.latest(&args.portfolio)? {
        Some(record) => {
            let summary = RiskSummary::from(record);
            print_header(&format!("Latest risk: {}", summary.portfolio), format);
            print_single(&summary, summary.rows(), format)?;
        }
        None => match format {
            OutputFormat::Json => print_single(&None::<RiskSummary>, Vec::new(), format)?,
            OutputFormat::Table => print_info(
                &format!("No stored risk results for '{}'", args.portfolio),
                format,
            ),
        },
    }

    Ok(())
}
