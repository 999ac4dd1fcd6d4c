//! RiskOps CLI - batch pipeline for portfolio VaR/CVaR.
//!
//! # Usage
//!
//! ```bash
//! # Define a portfolio
//! riskops portfolio create demo --positions AAPL=0.6,MSFT=0.4
//!
//! # Load prices and derive returns
//! riskops ingest --symbols AAPL,MSFT --start 2024-01-01 --end 2024-12-31
//! riskops process --symbols AAPL,MSFT
//!
//! # Compute and store VaR/CVaR
//! riskops risk --portfolio demo --alpha 0.99
//!
//! # Show the latest stored result
//! riskops --format json latest --portfolio demo
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use riskops_engine::RiskEngine;
use riskops_storage::RedbStorage;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let storage = RedbStorage::open(&cli.db)?;
    tracing::debug!(db = %cli.db.display(), "opened storage");
    let engine = RiskEngine::new(Arc::new(storage));

    let format = cli.format;

    match cli.command {
        Commands::Portfolio(args) => commands::portfolio::execute(args, &engine, format)?,
        Commands::Ingest(args) => commands::ingest::execute(args, &engine, format)?,
        Commands::Process(args) => commands::process::execute(args, &engine, format)?,
        Commands::Risk(args) => commands::risk::execute(args, &engine, format)?,
        Commands::Latest(args) => commands::latest::execute(args, &engine, format)?,
    }

    Ok(())
}
