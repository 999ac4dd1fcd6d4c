//! Simple returns from close prices.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{PriceObservation, ReturnObservation, Symbol};

/// Derives per-symbol simple returns `close_t / close_{t-1} - 1`.
///
/// Prices are grouped by symbol and sorted by date. The first price of each
/// symbol yields no return; neither does a step whose previous close is zero
/// or non-finite. Output is ordered by symbol, then date.
pub fn simple_returns(prices: &[PriceObservation]) -> Vec<ReturnObservation> {
    let mut by_symbol: BTreeMap<&Symbol, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for p in prices {
        by_symbol
            .entry(&p.symbol)
            .or_default()
            .push((p.date, p.close));
    }

    let mut out = Vec::with_capacity(prices.len().saturating_sub(by_symbol.len()));
    for (symbol, mut series) in by_symbol {
        series.sort_by_key(|(date, _)| *date);
        for pair in series.windows(2) {
            let (_, prev) = pair[0];
            let (date, close) = pair[1];
            let ret = close / prev - 1.0;
            if prev == 0.0 || !ret.is_finite() {
                log::warn!(
                    "skipping return for {} on {}: previous close {}",
                    symbol,
                    date,
                    prev
                );
                continue;
            }
            out.push(ReturnObservation::new(symbol.clone(), date, ret));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn px(s: &str, day: u32, close: f64) -> PriceObservation {
        PriceObservation::new(
            Symbol::new(s).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            close,
        )
    }

    #[test]
    fn test_percentage_change_per_symbol() {
        let prices = vec![
            px("MSFT", 2, 110.0),
            px("AAPL", 1, 100.0),
            px("MSFT", 1, 100.0),
            px("AAPL", 2, 102.0),
            px("AAPL", 3, 99.96),
        ];

        let returns = simple_returns(&prices);

        assert_eq!(returns.len(), 3);
        assert_eq!(returns[0].symbol.as_str(), "AAPL");
        assert_eq!(returns[0].date.to_string(), "2024-03-02");
        assert_relative_eq!(returns[0].ret, 0.02, epsilon = 1e-12);
        assert_relative_eq!(returns[1].ret, -0.02, epsilon = 1e-12);
        assert_eq!(returns[2].symbol.as_str(), "MSFT");
        assert_relative_eq!(returns[2].ret, 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_single_price_yields_nothing() {
        assert!(simple_returns(&[px("AAPL", 1, 100.0)]).is_empty());
        assert!(simple_returns(&[]).is_empty());
    }

    #[test]
    fn test_zero_previous_close_skipped() {
        let prices = vec![px("X", 1, 0.0), px("X", 2, 5.0), px("X", 3, 6.0)];
        let returns = simple_returns(&prices);
        assert_eq!(returns.len(), 1);
        assert_relative_eq!(returns[0].ret, 0.2, epsilon = 1e-12);
    }
}
