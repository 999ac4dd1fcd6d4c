//! Price ingestion: synthetic random walks and CSV files.

use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use riskops_core::Symbol;
use riskops_storage::PriceRecord;

use crate::error::{EngineError, EngineResult};

/// Daily log-return drift of the synthetic walk.
pub const SYNTHETIC_DRIFT: f64 = 0.0002;

/// Daily log-return volatility of the synthetic walk.
pub const SYNTHETIC_VOLATILITY: f64 = 0.02;

/// Weekdays between `start` and `end`, inclusive.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Generates one geometric random walk of close prices per symbol.
///
/// Log returns are normal with [`SYNTHETIC_DRIFT`] and [`SYNTHETIC_VOLATILITY`];
/// each walk starts from a price drawn uniformly in `[80, 200)`. The output is
/// fully determined by `seed`.
///
/// # Errors
///
/// `InvalidInput` if the range contains no business day.
pub fn synthetic_prices(
    symbols: &[Symbol],
    start: NaiveDate,
    end: NaiveDate,
    seed: u64,
) -> EngineResult<Vec<PriceRecord>> {
    let days = business_days(start, end);
    if days.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "no business days between {} and {}",
            start, end
        )));
    }

    let normal = Normal::new(SYNTHETIC_DRIFT, SYNTHETIC_VOLATILITY)
        .map_err(|e| EngineError::InvalidInput(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut out = Vec::with_capacity(symbols.len() * days.len());
    for symbol in symbols {
        let log_returns: Vec<f64> = (0..days.len()).map(|_| normal.sample(&mut rng)).collect();
        let start_price: f64 = rng.gen_range(80.0..200.0);

        let mut cumulative = 0.0;
        for (date, lr) in days.iter().zip(log_returns) {
            cumulative += lr;
            out.push(PriceRecord {
                symbol: symbol.clone(),
                date: *date,
                close: start_price * cumulative.exp(),
                currency: Some("USD".to_string()),
                source: "synthetic".to_string(),
            });
        }
    }

    tracing::debug!(
        symbols = symbols.len(),
        days = days.len(),
        seed,
        "generated synthetic prices"
    );
    Ok(out)
}

/// Rejects a close that is not a finite, strictly positive number.
pub fn validate_price(price: &PriceRecord) -> EngineResult<()> {
    if price.close.is_finite() && price.close > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "close for {} on {} must be a finite positive number, got {}",
            price.symbol, price.date, price.close
        )))
    }
}

#[derive(Debug, Deserialize)]
struct CsvPriceRow {
    symbol: String,
    date: NaiveDate,
    close: f64,
}

/// Reads `symbol,date,close` rows, keeping only the requested symbols.
///
/// Symbols are upper-cased; dates are `YYYY-MM-DD`. A kept row with a
/// non-finite or non-positive close fails the whole read.
pub fn read_price_csv<R: Read>(reader: R, symbols: &[Symbol]) -> EngineResult<Vec<PriceRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut out = Vec::new();
    for row in csv_reader.deserialize() {
        let row: CsvPriceRow = row?;
        let symbol = Symbol::new(&row.symbol)?;
        if !symbols.contains(&symbol) {
            continue;
        }
        let price = PriceRecord {
            symbol,
            date: row.date,
            close: row.close,
            currency: None,
            source: "csv".to_string(),
        };
        validate_price(&price)?;
        out.push(price);
    }
    Ok(out)
}

/// Loads prices from a CSV file. See [`read_price_csv`].
pub fn load_price_csv(path: impl AsRef<Path>, symbols: &[Symbol]) -> EngineResult<Vec<PriceRecord>> {
    let file = std::fs::File::open(path.as_ref())?;
    let prices = read_price_csv(file, symbols)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        rows = prices.len(),
        "loaded prices from csv"
    );
    Ok(prices)
}
