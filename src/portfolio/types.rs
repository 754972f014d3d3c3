//! # Portfolio Types
//!
//! $$
//! \mu_p = \mathbf{w}^\top \mu, \quad \sigma_p = \sqrt{\mathbf{w}^\top \Sigma \mathbf{w}}, \quad S = \frac{\mu_p - r_f}{\sigma_p}
//! $$
//!
//! Shared result container and the single evaluation path used by both the
//! optimizer and the frontier sampler.

use ndarray::Array1;
use serde::Serialize;

use crate::estimator::MeanVarianceEstimate;

/// Portfolio volatilities at or below this are degenerate: the Sharpe
/// ratio is undefined there and no caller may divide by it.
pub(crate) const VOL_EPS: f64 = 1e-12;

/// A single point in risk/return space.
///
/// Produced by the optimizer (exactly one, weights included) and by the
/// frontier sampler (a cloud, weights omitted to keep payloads small, plus
/// the best-of-sample with weights).
#[derive(Clone, Debug, Serialize)]
pub struct PortfolioPoint {
  /// Portfolio weights, one per ticker. `None` for sampled cloud points.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weights: Option<Vec<f64>>,
  /// Annualized expected portfolio return.
  pub expected_return: f64,
  /// Annualized portfolio volatility (standard deviation).
  pub volatility: f64,
  /// `(expected_return - risk_free) / volatility`.
  pub sharpe_ratio: f64,
}

impl PortfolioPoint {
  /// Evaluate a weight vector against annualized moments.
  ///
  /// Returns `None` when the portfolio volatility is (numerically) zero;
  /// each caller maps that to its own failure kind.
  pub fn evaluate(w: &Array1<f64>, est: &MeanVarianceEstimate, risk_free: f64) -> Option<Self> {
    let expected_return = w.dot(&est.mu);
    let variance = w.dot(&est.cov.dot(w));
    let volatility = variance.max(0.0).sqrt();

    if volatility <= VOL_EPS {
      return None;
    }

    Some(Self {
      weights: Some(w.to_vec()),
      expected_return,
      volatility,
      sharpe_ratio: (expected_return - risk_free) / volatility,
    })
  }

  /// Drop the weights, keeping only the risk/return triple.
  pub fn without_weights(mut self) -> Self {
    self.weights = None;
    self
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  fn estimate() -> MeanVarianceEstimate {
    MeanVarianceEstimate {
      tickers: vec!["A".into(), "B".into()],
      mu: array![0.10, 0.20],
      cov: array![[0.04, 0.0], [0.0, 0.09]],
    }
  }

  #[test]
  fn evaluate_matches_hand_computation() {
    let est = estimate();
    let w = array![0.5, 0.5];
    let point = PortfolioPoint::evaluate(&w, &est, 0.0).unwrap();

    assert_relative_eq!(point.expected_return, 0.15, epsilon = 1e-12);
    assert_relative_eq!(point.volatility, (0.25_f64 * 0.04 + 0.25 * 0.09).sqrt(), epsilon = 1e-12);
    assert_relative_eq!(
      point.sharpe_ratio,
      point.expected_return / point.volatility,
      epsilon = 1e-12
    );
  }

  #[test]
  fn zero_volatility_is_not_a_point() {
    let est = MeanVarianceEstimate {
      tickers: vec!["A".into(), "B".into()],
      mu: array![0.10, 0.20],
      cov: array![[0.0, 0.0], [0.0, 0.0]],
    };
    assert!(PortfolioPoint::evaluate(&array![0.5, 0.5], &est, 0.0).is_none());
  }

  #[test]
  fn risk_free_shifts_the_ratio() {
    let est = estimate();
    let w = array![0.5, 0.5];
    let raw = PortfolioPoint::evaluate(&w, &est, 0.0).unwrap();
    let excess = PortfolioPoint::evaluate(&w, &est, 0.05).unwrap();
    assert!(excess.sharpe_ratio < raw.sharpe_ratio);
  }
}
