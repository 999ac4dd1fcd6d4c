//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::commands::{IngestArgs, LatestArgs, PortfolioArgs, ProcessArgs, RiskArgs};

/// RiskOps - historical VaR/CVaR pipeline
#[derive(Parser)]
#[command(name = "riskops")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// redb database file
    #[arg(long, env = "RISKOPS_DB", default_value = "./data/riskops.redb", global = true)]
    pub db: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter: `--verbose` forces debug, otherwise `RUST_LOG`, otherwise warn.
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            return EnvFilter::new("debug");
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create, show and list portfolios
    Portfolio(PortfolioArgs),

    /// Load raw close prices (synthetic random walk or CSV)
    Ingest(IngestArgs),

    /// Derive simple returns from stored prices
    Process(ProcessArgs),

    /// Compute historical VaR/CVaR for a portfolio
    Risk(RiskArgs),

    /// Show the latest stored risk result
    Latest(LatestArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}
