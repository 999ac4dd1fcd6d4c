//! CLI command implementations.

pub mod ingest;
pub mod latest;
pub mod portfolio;
pub mod process;
pub mod risk;

// Re-export submodules for convenience
pub use ingest::IngestArgs;
pub use latest::LatestArgs;
pub use portfolio::PortfolioArgs;
pub use process::ProcessArgs;
pub use risk::RiskArgs;

use chrono::NaiveDate;
use riskops_core::Symbol;
use riskops_storage::Position;

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Parses a comma-separated symbol list, e.g. `AAPL,MSFT`.
pub fn parse_symbols(s: &str) -> CliResult<Vec<Symbol>> {
    let symbols = Symbol::parse_list(s);
    if symbols.is_empty() {
        return Err(CliError::NoSymbols(s.to_string()));
    }
    Ok(symbols)
}

/// Parses `SYMBOL=WEIGHT` pairs separated by commas, e.g. `AAPL=0.6,MSFT=0.4`.
pub fn parse_positions(s: &str) -> CliResult<Vec<Position>> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| -> CliResult<Position> {
            let (symbol, weight) = part
                .split_once('=')
                .ok_or_else(|| CliError::InvalidPosition(part.to_string()))?;
            let symbol =
                Symbol::new(symbol).map_err(|_| CliError::InvalidPosition(part.to_string()))?;
            let weight: f64 = weight
                .trim()
                .parse()
                .map_err(|_| CliError::InvalidPosition(part.to_string()))?;
            Ok(Position::new(symbol, weight))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(parse_date("15/03/2024").is_err());
    }

    #[test]
    fn test_parse_symbols() {
        let symbols = parse_symbols("aapl, msft").unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[1].as_str(), "MSFT");
        assert!(parse_symbols(" , ").is_err());
    }

    #[test]
    fn test_parse_positions() {
        let positions = parse_positions("aapl=0.6, MSFT=0.4").unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].symbol.as_str(), "AAPL");
        assert_eq!(positions[1].weight, 0.4);

        assert!(matches!(
            parse_positions("AAPL"),
            Err(CliError::InvalidPosition(_))
        ));
        assert!(matches!(
            parse_positions("AAPL=lots"),
            Err(CliError::InvalidPosition(_))
        ));
    }
}
