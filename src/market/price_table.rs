//! # Price Table
//!
//! $$
//! p_t = \begin{cases} p_t & p_t \ \text{observed} \\ p_{t-1} & \text{otherwise} \end{cases}
//! $$
//!
//! Immutable close-price history for a basket of tickers. Rows are trading
//! dates, columns are tickers; a missing close marks a non-trading day and
//! is carried forward before any statistic is computed.

use chrono::NaiveDate;

use crate::error::EngineError;
use crate::error::Result;

/// Trim, drop empties and de-duplicate a raw ticker list, preserving order.
///
/// An all-empty result is a client error: there is nothing to analyze.
pub fn sanitize_tickers<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>> {
  let mut out: Vec<String> = Vec::with_capacity(raw.len());
  for t in raw {
    let t = t.as_ref().trim();
    if t.is_empty() {
      continue;
    }
    if !out.iter().any(|seen| seen == t) {
      out.push(t.to_string());
    }
  }

  if out.is_empty() {
    return Err(EngineError::InvalidInput(
      "no valid stock tickers provided".into(),
    ));
  }

  Ok(out)
}

/// Close-price history, dates strictly increasing, one column per ticker.
#[derive(Clone, Debug)]
pub struct PriceTable {
  dates: Vec<NaiveDate>,
  tickers: Vec<String>,
  columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
  /// Build a table from aligned columns. `columns[i]` holds the closes of
  /// `tickers[i]`, one entry per date, `None` for non-trading days.
  pub fn new(
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
  ) -> Result<Self> {
    if tickers.is_empty() {
      return Err(EngineError::InvalidInput("empty ticker list".into()));
    }
    if columns.len() != tickers.len() {
      return Err(EngineError::InvalidInput(format!(
        "{} tickers but {} price columns",
        tickers.len(),
        columns.len()
      )));
    }
    for (ticker, col) in tickers.iter().zip(columns.iter()) {
      if col.len() != dates.len() {
        return Err(EngineError::InvalidInput(format!(
          "column for {} has {} rows, expected {}",
          ticker,
          col.len(),
          dates.len()
        )));
      }
    }
    if dates.windows(2).any(|w| w[0] >= w[1]) {
      return Err(EngineError::InvalidInput(
        "dates must be strictly increasing".into(),
      ));
    }

    Ok(Self {
      dates,
      tickers,
      columns,
    })
  }

  /// Ticker symbols, in column order.
  pub fn tickers(&self) -> &[String] {
    &self.tickers
  }

  /// Trading dates, strictly increasing.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Number of rows (dates).
  pub fn len(&self) -> usize {
    self.dates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }

  /// Forward-filled copy of the price columns. Entries before the first
  /// observation of a ticker stay `None`.
  pub fn forward_filled(&self) -> Vec<Vec<Option<f64>>> {
    self
      .columns
      .iter()
      .map(|col| {
        let mut last = None;
        col
          .iter()
          .map(|p| {
            if p.is_some() {
              last = *p;
            }
            last
          })
          .collect()
      })
      .collect()
  }

  /// Non-missing closes per ticker after forward-fill.
  pub(crate) fn observation_counts(&self) -> Vec<usize> {
    self
      .forward_filled()
      .iter()
      .map(|col| col.iter().filter(|p| p.is_some()).count())
      .collect()
  }

  /// Rolling mean of the forward-filled closes, one series per ticker.
  /// A window that still contains a missing value yields `None`.
  pub fn rolling_mean(&self, window: usize) -> Result<Vec<Vec<Option<f64>>>> {
    if window == 0 {
      return Err(EngineError::InvalidInput("rolling window must be > 0".into()));
    }

    let filled = self.forward_filled();
    let out = filled
      .iter()
      .map(|col| {
        (0..col.len())
          .map(|t| {
            if t + 1 < window {
              return None;
            }
            let win = &col[t + 1 - window..=t];
            if win.iter().any(|p| p.is_none()) {
              return None;
            }
            let sum: f64 = win.iter().map(|p| p.unwrap_or(0.0)).sum();
            Some(sum / window as f64)
          })
          .collect()
      })
      .collect();

    Ok(out)
  }
}
