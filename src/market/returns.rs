//! # Return Matrix
//!
//! $$
//! R \in \mathbb{R}^{(T-1) \times N}, \quad R_{t,i} = \frac{p_{t,i} - p_{t-1,i}}{p_{t-1,i}}
//! $$
//!
//! Simple periodic returns built from a [`PriceTable`]: forward-fill, then
//! difference, then drop every row that still contains a missing value.
//! Every downstream statistic consumes this matrix.

use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;

use super::price_table::PriceTable;
use crate::error::EngineError;
use crate::error::Result;

/// Dense matrix of simple returns, rows = periods, columns = tickers.
/// Contains no missing values by construction.
#[derive(Clone, Debug)]
pub struct ReturnMatrix {
  tickers: Vec<String>,
  data: Array2<f64>,
}

impl ReturnMatrix {
  /// Wrap an already-clean return matrix. Column count must match the
  /// ticker list; all entries must be finite.
  pub fn new(tickers: Vec<String>, data: Array2<f64>) -> Result<Self> {
    if data.ncols() != tickers.len() {
      return Err(EngineError::InvalidInput(format!(
        "{} tickers but {} return columns",
        tickers.len(),
        data.ncols()
      )));
    }
    if data.iter().any(|r| !r.is_finite()) {
      return Err(EngineError::InvalidInput(
        "return matrix contains non-finite values".into(),
      ));
    }

    Ok(Self { tickers, data })
  }

  /// Build the return matrix from a price history.
  ///
  /// Forward-fills gaps, differences once (consuming the first row), and
  /// drops rows with any remaining missing value. Rows whose previous close
  /// is non-positive are dropped the same way: a simple return at price
  /// zero is undefined.
  pub fn from_prices(prices: &PriceTable, min_observations: usize) -> Result<Self> {
    let tickers = prices.tickers().to_vec();
    if tickers.len() < 2 {
      return Err(EngineError::InsufficientData(format!(
        "optimization needs at least 2 assets, got {}",
        tickers.len()
      )));
    }

    for (ticker, count) in tickers.iter().zip(prices.observation_counts()) {
      if count < min_observations {
        return Err(EngineError::InsufficientData(format!(
          "{} has {} observations after forward-fill, need {}",
          ticker, count, min_observations
        )));
      }
    }

    let filled = prices.forward_filled();
    let n_assets = tickers.len();
    let mut rows: Vec<f64> = Vec::new();
    let mut n_periods = 0;

    for t in 1..prices.len() {
      let mut row = Vec::with_capacity(n_assets);
      for col in &filled {
        match (col[t - 1], col[t]) {
          (Some(prev), Some(cur)) if prev > 0.0 => row.push((cur - prev) / prev),
          _ => break,
        }
      }
      if row.len() == n_assets {
        rows.extend(row);
        n_periods += 1;
      }
    }

    if n_periods < 2 {
      return Err(EngineError::InsufficientData(format!(
        "{} usable return rows after differencing, need at least 2",
        n_periods
      )));
    }

    let data = Array2::from_shape_vec((n_periods, n_assets), rows)
      .map_err(|e| EngineError::InvalidInput(e.to_string()))?;

    Self::new(tickers, data)
  }

  /// Ticker symbols, in column order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// The raw return matrix.
  pub fn data(&self) -> &Array2<f64> {
    &self.data
  }

  /// Number of return periods (rows).
  pub fn n_periods(&self) -> usize {
    self.data.nrows()
  }

  /// Number of assets (columns).
  pub fn n_assets(&self) -> usize {
    self.data.ncols()
  }

  /// Return column of a single asset.
  pub fn column(&self, asset: usize) -> ArrayView1<'_, f64> {
    self.data.index_axis(Axis(1), asset)
  }
}
