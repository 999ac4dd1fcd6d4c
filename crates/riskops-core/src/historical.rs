//! Historical VaR and CVaR.
//!
//! VaR is the negated left-tail quantile of the return series at probability
//! `1 - alpha`; CVaR is the negated mean of every return at or below that
//! quantile. Both are loss magnitudes.
//!
//! The quantile uses linear interpolation between order statistics at the
//! virtual rank `(n - 1) * p`. Persisted results must be reproducible, so the
//! interpolation is written out here instead of delegated to a library default.

use crate::error::{RiskError, RiskResult};
use crate::types::RiskMetrics;

/// Minimum sample size for a historical estimate.
pub const MIN_OBSERVATIONS: usize = 5;

/// Empirical quantile of an ascending-sorted sample.
///
/// Interpolates linearly between the two order statistics around rank
/// `(n - 1) * p`. Returns `None` for an empty sample or `p` outside `[0, 1]`.
///
/// The interpolation is evaluated from the nearer neighbour
/// (`lo + d*t` below the midpoint, `hi - d*(1-t)` at or above it), which keeps
/// results identical to the common numeric-library formulation.
pub fn empirical_quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }

    let rank = (n - 1) as f64 * p;
    let lo = (rank.floor() as usize).min(n - 1);
    let hi = (lo + 1).min(n - 1);
    let t = rank - lo as f64;

    let a = sorted[lo];
    let b = sorted[hi];
    let diff = b - a;
    Some(if t >= 0.5 { b - diff * (1.0 - t) } else { a + diff * t })
}

/// Computes historical VaR and CVaR of a return series.
///
/// # Arguments
///
/// * `returns` - Portfolio returns as decimals, in chronological order
/// * `alpha` - Confidence level, strictly between 0 and 1 (e.g. 0.99)
///
/// # Errors
///
/// * `InvalidParameter` - `alpha` outside (0, 1) or a non-finite return
/// * `InsufficientData` - fewer than [`MIN_OBSERVATIONS`] returns
pub fn historical_var_cvar(returns: &[f64], alpha: f64) -> RiskResult<RiskMetrics> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(RiskError::InvalidParameter(format!(
            "alpha must be between 0 and 1, got {}",
            alpha
        )));
    }
    if returns.len() < MIN_OBSERVATIONS {
        return Err(RiskError::InsufficientData(format!(
            "not enough returns to compute VaR/CVaR (need >= {}, got {})",
            MIN_OBSERVATIONS,
            returns.len()
        )));
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(RiskError::invalid_parameter("returns must be finite"));
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q = empirical_quantile(&sorted, 1.0 - alpha)
        .ok_or_else(|| RiskError::invalid_parameter("quantile probability out of range"))?;
    let var = -q;

    // Tail in original order keeps the summation order stable.
    let (sum, count) = returns
        .iter()
        .filter(|r| **r <= q)
        .fold((0.0, 0usize), |(s, c), r| (s + r, c + 1));

    let cvar = if count > 0 { -(sum / count as f64) } else { var };

    log::trace!(
        "historical estimate: n={}, alpha={}, q={}, tail={}",
        returns.len(),
        alpha,
        q,
        count
    );

    Ok(RiskMetrics { var, cvar })
}
