//! # Risk Metrics
//!
//! $$
//! \mathrm{VaR}_{0.95} = Q_{0.05}(r), \qquad \sigma_{\text{roll}} = \mathrm{std}(r_{T-w+1..T})
//! $$
//!
//! Per-asset tail risk and rolling volatility over a return matrix. VaR uses
//! the full return column; the rolling volatility uses only the last
//! `window` rows. The two lookbacks differ on purpose, matching the service
//! this engine backs.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::error::Result;
use crate::market::ReturnMatrix;

/// Risk figures for a single ticker.
#[derive(Clone, Copy, Debug)]
pub struct TickerRisk {
  /// Empirical 5th percentile of the full return column. Negative values
  /// mean losses; more negative is worse tail risk.
  pub var_95: f64,
  /// Sample standard deviation (ddof = 1) of the last `window` returns.
  pub rolling_volatility: f64,
}

/// Risk metrics per ticker, with the window actually used.
#[derive(Clone, Debug)]
pub struct RiskReport {
  /// Rolling window the volatilities were computed over.
  pub window: usize,
  /// Set when the engine substituted the full sample for a too-short
  /// history. Never set by [`RiskMetrics::compute`] itself.
  pub full_sample_fallback: bool,
  /// Per-ticker metrics, ordered by ticker.
  pub metrics: BTreeMap<String, TickerRisk>,
}

fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

fn sample_std(xs: &[f64]) -> f64 {
  if xs.len() < 2 {
    return 0.0;
  }

  let mean = sample_mean(xs);
  let mut acc = 0.0;
  for &x in xs {
    let d = x - mean;
    acc += d * d;
  }
  (acc / (xs.len() - 1) as f64).sqrt()
}

/// Linear-interpolated empirical quantile, the standard statistical-package
/// semantics: index `q (n-1)` into the order statistics, interpolating
/// between neighbors.
fn quantile(xs: &[f64], q: f64) -> f64 {
  debug_assert!(!xs.is_empty());
  let mut sorted = xs.to_vec();
  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

  let h = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
  let lo = h.floor() as usize;
  let hi = h.ceil() as usize;
  sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Value-at-Risk and rolling volatility over a return matrix.
pub struct RiskMetrics;

impl RiskMetrics {
  /// Compute per-ticker VaR 95 and rolling volatility.
  ///
  /// Fails with [`EngineError::InsufficientData`] when the matrix has fewer
  /// rows than `window`: the rolling statistic is undefined there. Callers
  /// that want a full-sample fallback must opt in explicitly and surface it
  /// (see the engine), never substitute silently.
  pub fn compute(returns: &ReturnMatrix, window: usize) -> Result<RiskReport> {
    if window == 0 {
      return Err(EngineError::InvalidInput("risk window must be > 0".into()));
    }
    if returns.n_periods() < 2 {
      return Err(EngineError::InsufficientData(format!(
        "{} return rows, need at least 2",
        returns.n_periods()
      )));
    }
    if returns.n_periods() < window {
      return Err(EngineError::InsufficientData(format!(
        "{} return rows, rolling window of {} undefined",
        returns.n_periods(),
        window
      )));
    }

    let mut metrics = BTreeMap::new();
    for (i, ticker) in returns.tickers().iter().enumerate() {
      let col = returns.column(i).to_vec();
      let tail = &col[col.len() - window..];

      metrics.insert(
        ticker.clone(),
        TickerRisk {
          var_95: quantile(&col, 0.05),
          rolling_volatility: sample_std(tail),
        },
      );
    }

    Ok(RiskReport {
      window,
      full_sample_fallback: false,
      metrics,
    })
  }
}
