//! Return alignment.
//!
//! Turns per-symbol return observations into a single portfolio return
//! series. Dates are inner-joined across every weighted symbol: one symbol
//! missing one day drops that day for the whole portfolio.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::types::{ReturnObservation, Symbol, WeightVector};

/// Dense date-by-symbol return table.
///
/// Rows are dates in ascending order, columns are symbols in ascending order.
/// Every cell is populated.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedReturnMatrix {
    dates: Vec<NaiveDate>,
    symbols: Vec<Symbol>,
    rows: Vec<Vec<f64>>,
}

impl AlignedReturnMatrix {
    /// Builds the matrix for `symbols` from raw observations.
    ///
    /// Observations for other symbols are ignored. NaN returns count as
    /// missing cells.
    ///
    /// # Errors
    ///
    /// * `InvalidParameter` - no symbols requested, or the same `(symbol, date)` appears twice
    /// * `UnknownSymbol` - a requested symbol has no observations
    /// * `InsufficientData` - no date is shared by every symbol
    pub fn build<'a, I>(observations: I, symbols: &[Symbol]) -> RiskResult<Self>
    where
        I: IntoIterator<Item = &'a ReturnObservation>,
    {
        if symbols.is_empty() {
            return Err(RiskError::invalid_parameter(
                "at least one symbol is required",
            ));
        }

        let requested: BTreeSet<&Symbol> = symbols.iter().collect();
        let mut by_symbol: BTreeMap<&Symbol, BTreeMap<NaiveDate, f64>> =
            requested.iter().map(|s| (*s, BTreeMap::new())).collect();

        for obs in observations {
            let Some(series) = by_symbol.get_mut(&obs.symbol) else {
                continue;
            };
            if series.insert(obs.date, obs.ret).is_some() {
                return Err(RiskError::InvalidParameter(format!(
                    "duplicate return observation for {} on {}",
                    obs.symbol, obs.date
                )));
            }
        }

        for (symbol, series) in &by_symbol {
            if series.is_empty() {
                return Err(RiskError::UnknownSymbol {
                    symbol: symbol.to_string(),
                });
            }
        }

        let columns: Vec<Symbol> = by_symbol.keys().map(|s| (*s).clone()).collect();
        let mut series_iter = by_symbol.values();
        let first = series_iter
            .next()
            .ok_or_else(|| RiskError::invalid_parameter("at least one symbol is required"))?;

        let mut dates = Vec::new();
        let mut rows = Vec::new();
        'dates: for date in first.keys() {
            let mut row = Vec::with_capacity(columns.len());
            for series in by_symbol.values() {
                match series.get(date) {
                    Some(ret) if !ret.is_nan() => row.push(*ret),
                    _ => continue 'dates,
                }
            }
            dates.push(*date);
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(RiskError::insufficient_data(
                "not enough aligned returns across symbols",
            ));
        }

        let total_dates: BTreeSet<&NaiveDate> =
            by_symbol.values().flat_map(|s| s.keys()).collect();
        let dropped = total_dates.len() - dates.len();
        if dropped > 0 {
            log::debug!(
                "dropped {} of {} dates missing at least one of {} symbols",
                dropped,
                total_dates.len(),
                columns.len()
            );
        }

        Ok(Self {
            dates,
            symbols: columns,
            rows,
        })
    }

    /// Retained dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column symbols, ascending.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Row of returns for the `i`-th retained date, in column order.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    /// Number of retained dates.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no date is retained. Never the case for a built matrix.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Weighted sum across columns for every row.
    ///
    /// Weights are matched to columns by symbol and normalised to sum to one.
    ///
    /// # Errors
    ///
    /// * `MissingWeight` - a column has no weight
    /// * `InvalidWeight` - weights sum to zero or less
    pub fn portfolio_returns(&self, weights: &WeightVector) -> RiskResult<PortfolioReturnSeries> {
        let normalized = weights.normalized()?;
        let column_weights = self
            .symbols
            .iter()
            .map(|s| {
                normalized.get(s).ok_or_else(|| RiskError::MissingWeight {
                    symbol: s.to_string(),
                })
            })
            .collect::<RiskResult<Vec<f64>>>()?;

        let returns = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&column_weights)
                    .fold(0.0, |acc, (r, w)| acc + r * w)
            })
            .collect();

        Ok(PortfolioReturnSeries {
            dates: self.dates.clone(),
            returns,
        })
    }
}

/// Portfolio returns in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

impl PortfolioReturnSeries {
    /// Creates a series from parallel date and return vectors.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the lengths differ or dates are not strictly ascending.
    pub fn new(dates: Vec<NaiveDate>, returns: Vec<f64>) -> RiskResult<Self> {
        if dates.len() != returns.len() {
            return Err(RiskError::invalid_parameter(
                "dates and returns must have the same length",
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RiskError::invalid_parameter(
                "dates must be strictly ascending",
            ));
        }
        Ok(Self { dates, returns })
    }

    /// Portfolio returns, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.returns
    }

    /// Dates matching [`values`](Self::values).
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Most recent date in the series.
    pub fn as_of_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// True when the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Keeps only the most recent `lookback_days` observations.
    pub fn truncate_to_lookback(mut self, lookback_days: usize) -> Self {
        if self.returns.len() > lookback_days {
            let start = self.returns.len() - lookback_days;
            self.returns.drain(..start);
            self.dates.drain(..start);
        }
        self
    }
}

/// Aligns observations and collapses them into one portfolio return series.
///
/// Only the symbols in `weights` are used. The result keeps at most
/// `lookback_days` of the most recent dates.
///
/// # Errors
///
/// * `InvalidParameter` - `lookback_days` is zero, or duplicate observations
/// * `UnknownSymbol` - a weighted symbol has no observations
/// * `InsufficientData` - no date is shared by every weighted symbol
/// * `InvalidWeight` - weights sum to zero or less
pub fn align(
    observations: &[ReturnObservation],
    weights: &WeightVector,
    lookback_days: usize,
) -> RiskResult<PortfolioReturnSeries> {
    if lookback_days == 0 {
        return Err(RiskError::invalid_parameter("lookback_days must be > 0"));
    }
    if weights.is_empty() {
        return Err(RiskError::InvalidWeight(
            "portfolio has no weights".to_string(),
        ));
    }

    let symbols: Vec<Symbol> = weights.symbols().cloned().collect();
    let matrix = AlignedReturnMatrix::build(observations, &symbols)?;
    let series = matrix.portfolio_returns(weights)?;
    Ok(series.truncate_to_lookback(lookback_days))
}
