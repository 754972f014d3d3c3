//! # Presentation Reports
//!
//! $$
//! w_i \mapsto \mathrm{round}(w_i, 4)
//! $$
//!
//! Serialization-ready shapes for the service edge. The engine's own types
//! stay exact; rounding and field naming happen only here.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::portfolio::FrontierSample;
use crate::portfolio::PortfolioPoint;
use crate::risk::RiskReport;

/// Round to 4 decimal places for presentation.
pub fn round4(x: f64) -> f64 {
  (x * 1e4).round() / 1e4
}

/// Ticker-to-weight allocation map, rounded for presentation.
pub fn allocation(tickers: &[String], weights: &[f64]) -> BTreeMap<String, f64> {
  tickers
    .iter()
    .cloned()
    .zip(weights.iter().map(|&w| round4(w)))
    .collect()
}

/// Risk metrics payload: `{"var_95": {...}, "rolling_volatility": {...}}`.
#[derive(Clone, Debug, Serialize)]
pub struct RiskPayload {
  pub var_95: BTreeMap<String, f64>,
  pub rolling_volatility: BTreeMap<String, f64>,
}

impl From<&RiskReport> for RiskPayload {
  fn from(report: &RiskReport) -> Self {
    let mut var_95 = BTreeMap::new();
    let mut rolling_volatility = BTreeMap::new();
    for (ticker, risk) in &report.metrics {
      var_95.insert(ticker.clone(), risk.var_95);
      rolling_volatility.insert(ticker.clone(), risk.rolling_volatility);
    }

    Self {
      var_95,
      rolling_volatility,
    }
  }
}

/// One frontier point as the chart consumes it. `expected_return`
/// serializes as `return` to match the existing scatter component.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FrontierPointPayload {
  pub volatility: f64,
  #[serde(rename = "return")]
  pub expected_return: f64,
  pub sharpe_ratio: f64,
}

impl From<&PortfolioPoint> for FrontierPointPayload {
  fn from(point: &PortfolioPoint) -> Self {
    Self {
      volatility: point.volatility,
      expected_return: point.expected_return,
      sharpe_ratio: point.sharpe_ratio,
    }
  }
}

/// Frontier payload: the random cloud plus the optimized portfolio marker.
#[derive(Clone, Debug, Serialize)]
pub struct FrontierPayload {
  pub random_portfolios: Vec<FrontierPointPayload>,
  pub optimized_portfolio: FrontierPointPayload,
}

impl FrontierPayload {
  /// Assemble the chart payload from a sampled cloud and the solver's
  /// optimum.
  pub fn new(sample: &FrontierSample, optimal: &PortfolioPoint) -> Self {
    Self {
      random_portfolios: sample.points.iter().map(FrontierPointPayload::from).collect(),
      optimized_portfolio: FrontierPointPayload::from(optimal),
    }
  }
}
