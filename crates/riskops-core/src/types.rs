//! Domain types shared by the aligner, the estimator and their callers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

// =============================================================================
// SYMBOL
// =============================================================================

/// Ticker symbol, trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol, normalising case and surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> RiskResult<Self> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(RiskError::invalid_parameter("symbol must not be empty"));
        }
        Ok(Self(s.to_uppercase()))
    }

    /// Parses a comma-separated symbol list, skipping empty entries.
    ///
    /// `"aapl, MSFT,,"` yields `[AAPL, MSFT]`.
    pub fn parse_list(raw: &str) -> Vec<Symbol> {
        raw.split(',').filter_map(|s| Symbol::new(s).ok()).collect()
    }

    /// Returns the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::new(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = RiskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// OBSERVATIONS
// =============================================================================

/// One symbol's simple return on one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnObservation {
    /// Asset symbol.
    pub symbol: Symbol,
    /// Trading date.
    pub date: NaiveDate,
    /// Simple return as a decimal (-0.01 for -1%).
    pub ret: f64,
}

impl ReturnObservation {
    /// Creates a return observation.
    pub fn new(symbol: Symbol, date: NaiveDate, ret: f64) -> Self {
        Self { symbol, date, ret }
    }
}

/// One symbol's closing price on one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Asset symbol.
    pub symbol: Symbol,
    /// Trading date.
    pub date: NaiveDate,
    /// Close price.
    pub close: f64,
}

impl PriceObservation {
    /// Creates a price observation.
    pub fn new(symbol: Symbol, date: NaiveDate, close: f64) -> Self {
        Self {
            symbol,
            date,
            close,
        }
    }
}

// =============================================================================
// WEIGHTS
// =============================================================================

/// Portfolio weights keyed by symbol.
///
/// Weights are non-negative and need not sum to one; the aligner normalises
/// them. Iteration is in symbol order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightVector {
    weights: BTreeMap<Symbol, f64>,
}

impl WeightVector {
    /// Builds a weight vector from `(symbol, weight)` pairs.
    ///
    /// # Errors
    ///
    /// `InvalidWeight` for a negative or non-finite weight, or a symbol listed twice.
    pub fn new<I>(pairs: I) -> RiskResult<Self>
    where
        I: IntoIterator<Item = (Symbol, f64)>,
    {
        let mut weights = BTreeMap::new();
        for (symbol, weight) in pairs {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RiskError::InvalidWeight(format!(
                    "weight for {} must be a finite non-negative number, got {}",
                    symbol, weight
                )));
            }
            if weights.insert(symbol.clone(), weight).is_some() {
                return Err(RiskError::InvalidWeight(format!(
                    "duplicate weight for {}",
                    symbol
                )));
            }
        }
        Ok(Self { weights })
    }

    /// Builds a weight vector from raw string symbols.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[(S, f64)]) -> RiskResult<Self> {
        let parsed = pairs
            .iter()
            .map(|(s, w)| Symbol::new(s).map(|sym| (sym, *w)))
            .collect::<RiskResult<Vec<_>>>()?;
        Self::new(parsed)
    }

    /// Weight for a symbol, if present.
    pub fn get(&self, symbol: &Symbol) -> Option<f64> {
        self.weights.get(symbol).copied()
    }

    /// Symbols in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.weights.keys()
    }

    /// `(symbol, weight)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.weights.iter().map(|(s, w)| (s, *w))
    }

    /// Number of weighted symbols.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when no symbol carries a weight.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Returns a copy scaled so the weights sum to one.
    ///
    /// # Errors
    ///
    /// `InvalidWeight` if the weights sum to zero or less.
    pub fn normalized(&self) -> RiskResult<Self> {
        let total = self.total();
        if total <= 0.0 {
            return Err(RiskError::InvalidWeight(
                "sum of weights must be > 0".to_string(),
            ));
        }
        Ok(Self {
            weights: self
                .weights
                .iter()
                .map(|(s, w)| (s.clone(), w / total))
                .collect(),
        })
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Historical tail risk of a return series, as positive loss magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Value at Risk: the negated left-tail quantile.
    pub var: f64,
    /// Conditional VaR: the negated mean of returns at or below the quantile.
    pub cvar: f64,
}

impl fmt::Display for RiskMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VaR={:.6}, CVaR={:.6}", self.var, self.cvar)
    }
}

/// Risk estimation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskMethod {
    /// Historical simulation over the observed return series.
    #[default]
    Historical,
    /// Variance-covariance. Not implemented.
    Parametric,
    /// Monte Carlo simulation. Not implemented.
    #[serde(rename = "mc", alias = "monte_carlo")]
    MonteCarlo,
}

impl RiskMethod {
    /// Label persisted alongside results.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskMethod::Historical => "historical",
            RiskMethod::Parametric => "parametric",
            RiskMethod::MonteCarlo => "mc",
        }
    }

    /// Fails unless the method has an estimator.
    pub fn ensure_supported(&self) -> RiskResult<()> {
        match self {
            RiskMethod::Historical => Ok(()),
            other => Err(RiskError::InvalidParameter(format!(
                "unsupported method '{}': only 'historical' is available",
                other.as_str()
            ))),
        }
    }
}

impl fmt::Display for RiskMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskMethod {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "historical" => Ok(RiskMethod::Historical),
            "parametric" => Ok(RiskMethod::Parametric),
            "mc" | "monte_carlo" | "monte-carlo" => Ok(RiskMethod::MonteCarlo),
            other => Err(RiskError::InvalidParameter(format!(
                "unknown method '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_symbol_normalisation() {
        assert_eq!(Symbol::new(" aapl ").unwrap().as_str(), "AAPL");
        assert!(Symbol::new("   ").is_err());

        let list = Symbol::parse_list("aapl, MSFT,,");
        assert_eq!(
            list,
            vec![Symbol::new("AAPL").unwrap(), Symbol::new("MSFT").unwrap()]
        );
    }

    #[test]
    fn test_symbol_serde_normalises() {
        let sym: Symbol = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(sym.as_str(), "MSFT");
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }

    #[test]
    fn test_weight_vector_rejects_negative() {
        let err = WeightVector::from_pairs(&[("A", 1.0), ("B", -0.5)]).unwrap_err();
        assert!(matches!(err, RiskError::InvalidWeight(_)));
    }

    #[test]
    fn test_weight_vector_rejects_duplicates() {
        let err = WeightVector::from_pairs(&[("A", 1.0), ("a", 2.0)]).unwrap_err();
        assert!(matches!(err, RiskError::InvalidWeight(_)));
    }

    #[test]
    fn test_weight_vector_normalized() {
        let w = WeightVector::from_pairs(&[("A", 2.0), ("B", 6.0)]).unwrap();
        let n = w.normalized().unwrap();
        assert_relative_eq!(n.get(&Symbol::new("A").unwrap()).unwrap(), 0.25);
        assert_relative_eq!(n.get(&Symbol::new("B").unwrap()).unwrap(), 0.75);
        assert_relative_eq!(n.total(), 1.0);
    }

    #[test]
    fn test_zero_sum_weights() {
        let w = WeightVector::from_pairs(&[("A", 0.0), ("B", 0.0)]).unwrap();
        assert!(matches!(w.normalized(), Err(RiskError::InvalidWeight(_))));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("Historical".parse::<RiskMethod>().unwrap(), RiskMethod::Historical);
        assert_eq!("mc".parse::<RiskMethod>().unwrap(), RiskMethod::MonteCarlo);
        assert!("garch".parse::<RiskMethod>().is_err());

        assert!(RiskMethod::Historical.ensure_supported().is_ok());
        assert!(matches!(
            RiskMethod::Parametric.ensure_supported(),
            Err(RiskError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_method_serde_labels() {
        assert_eq!(
            serde_json::to_string(&RiskMethod::MonteCarlo).unwrap(),
            "\"mc\""
        );
        let m: RiskMethod = serde_json::from_str("\"historical\"").unwrap();
        assert_eq!(m, RiskMethod::Historical);
    }
}
