//! # Engine Configuration
//!
//! $$
//! \mu_{\text{ann}} = P \cdot \bar r, \quad P = 252
//! $$
//!
//! Explicit runtime configuration threaded into every component. There is no
//! process-wide state; each request carries its own copy.

/// Runtime configuration for the analytics engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
  /// Rolling window for volatility (and descriptive rolling means).
  pub risk_window: usize,
  /// Trading periods per year used for annualization.
  pub periods_per_year: usize,
  /// Number of random portfolios drawn by the frontier sampler.
  pub frontier_samples: usize,
  /// Iteration budget for the max-Sharpe solver.
  pub max_iters: u64,
  /// Risk-free rate subtracted in Sharpe ratios.
  pub risk_free: f64,
  /// Minimum non-missing closes a ticker needs after forward-fill.
  pub min_observations: usize,
  /// Fall back to the full-sample volatility when the return history is
  /// shorter than `risk_window`. The fallback is reported, never silent.
  pub vol_fallback: bool,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      risk_window: 30,
      periods_per_year: 252,
      frontier_samples: 10_000,
      max_iters: 5000,
      risk_free: 0.0,
      min_observations: 30,
      vol_fallback: false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_matches_service_conventions() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.risk_window, 30);
    assert_eq!(cfg.periods_per_year, 252);
    assert_eq!(cfg.frontier_samples, 10_000);
    assert_eq!(cfg.risk_free, 0.0);
    assert!(!cfg.vol_fallback);
  }
}
