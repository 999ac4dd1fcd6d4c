//! Portfolio command implementation.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use riskops_engine::RiskEngine;
use riskops_storage::PortfolioRecord;

use crate::cli::OutputFormat;
use crate::commands::parse_positions;
use crate::output::{print_header, print_output, print_single, print_success};

/// Arguments for the portfolio command.
#[derive(Args, Debug)]
pub struct PortfolioArgs {
    #[command(subcommand)]
    pub command: PortfolioCommand,
}

/// Portfolio subcommands.
#[derive(Subcommand, Debug)]
pub enum PortfolioCommand {
    /// Create or replace a portfolio
    Create {
        /// Portfolio name
        name: String,

        /// Positions as SYMBOL=WEIGHT pairs, e.g. AAPL=0.6,MSFT=0.4
        #[arg(short, long)]
        positions: String,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show a portfolio and its positions
    Show {
        /// Portfolio name
        name: String,
    },

    /// List all portfolios
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct PortfolioRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Positions")]
    positions: usize,
    #[tabled(rename = "Symbols")]
    symbols: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&PortfolioRecord> for PortfolioRow {
    fn from(p: &PortfolioRecord) -> Self {
        Self {
            name: p.name.clone(),
            positions: p.positions.len(),
            symbols: p
                .symbols()
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(","),
            created_at: p.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct PositionRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Weight")]
    weight: f64,
}

/// Execute the portfolio command.
pub fn execute(args: PortfolioArgs, engine: &RiskEngine, format: OutputFormat) -> Result<()> {
    match args.command {
        PortfolioCommand::Create {
            name,
            positions,
            description,
        } => {
            let positions = parse_positions(&positions)?;
            let mut record = PortfolioRecord::new(name.trim(), positions);
            if let Some(description) = description {
                record = record.with_description(description);
            }

            let stored = engine.create_portfolio(record)?;
            match format {
                OutputFormat::Json => print_single(&stored, Vec::new(), format)?,
                OutputFormat::Table => print_success(
                    &format!(
                        "Stored portfolio '{}' with {} positions",
                        stored.name,
                        stored.positions.len()
                    ),
                    format,
                ),
            }
        }
        PortfolioCommand::Show { name } => {
            let portfolio = engine.portfolio(&name)?;
            match format {
                OutputFormat::Json => print_single(&portfolio, Vec::new(), format)?,
                OutputFormat::Table => {
                    print_header(&format!("Portfolio: {}", portfolio.name), format);
                    if let Some(description) = &portfolio.description {
                        println!("{}", description);
                    }
                    let rows: Vec<PositionRow> = portfolio
                        .positions
                        .iter()
                        .map(|p| PositionRow {
                            symbol: p.symbol.to_string(),
                            weight: p.weight,
                        })
                        .collect();
                    print_output(&rows, format)?;
                }
            }
        }
        PortfolioCommand::List => {
            let portfolios = engine.list_portfolios()?;
            match format {
                OutputFormat::Json => print_single(&portfolios, Vec::new(), format)?,
                OutputFormat::Table => {
                    let rows: Vec<PortfolioRow> = portfolios.iter().map(PortfolioRow::from).collect();
                    print_output(&rows, format)?;
                }
            }
        }
    }

    Ok(())
}
