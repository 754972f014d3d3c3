//! # Mean-Variance Estimation
//!
//! $$
//! \mu = P \, \bar r, \qquad \Sigma = P \, \mathrm{Cov}(r), \qquad P = 252
//! $$
//!
//! Annualized expected returns and covariance from a return matrix, with
//! degeneracy detection up front: a zero-variance asset or a singular
//! covariance would divide by zero inside the optimizer, so it is rejected
//! here instead.

use nalgebra::DMatrix;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::Axis;

use crate::error::EngineError;
use crate::error::Result;
use crate::market::ReturnMatrix;

/// Variances at or below this are treated as zero.
const VAR_EPS: f64 = 1e-12;

/// Annualized first and second moments of a return matrix.
#[derive(Clone, Debug)]
pub struct MeanVarianceEstimate {
  /// Ticker symbols, aligned with `mu` and the axes of `cov`.
  pub tickers: Vec<String>,
  /// Annualized expected return per asset.
  pub mu: Array1<f64>,
  /// Annualized sample covariance matrix, symmetric positive definite.
  pub cov: Array2<f64>,
}

impl MeanVarianceEstimate {
  /// Number of assets.
  pub fn n_assets(&self) -> usize {
    self.mu.len()
  }
}

/// Estimator for [`MeanVarianceEstimate`].
pub struct MeanVarianceEstimator;

impl MeanVarianceEstimator {
  /// Compute annualized mean returns and sample covariance (ddof = 1).
  ///
  /// Fails with [`EngineError::DegenerateCovariance`] when any variance is
  /// (numerically) zero or the matrix is singular, so the optimizer never
  /// sees an input it cannot divide by.
  pub fn estimate(returns: &ReturnMatrix, periods_per_year: usize) -> Result<MeanVarianceEstimate> {
    let t = returns.n_periods();
    if t < 2 {
      return Err(EngineError::InsufficientData(format!(
        "{} return rows, covariance needs at least 2",
        t
      )));
    }

    let p = periods_per_year as f64;
    let data = returns.data();
    let daily_mean = data
      .mean_axis(Axis(0))
      .ok_or_else(|| EngineError::InsufficientData("empty return matrix".into()))?;

    let centered = data - &daily_mean;
    let cov = centered.t().dot(&centered) / (t - 1) as f64 * p;
    let mu = daily_mean * p;

    for (i, ticker) in returns.tickers().iter().enumerate() {
      if cov[[i, i]] <= VAR_EPS {
        return Err(EngineError::DegenerateCovariance(format!(
          "zero variance for {}",
          ticker
        )));
      }
    }

    // Cholesky both proves positive definiteness and exposes rank
    // deficiency through a vanishing pivot.
    let n = returns.n_assets();
    let singular = match DMatrix::from_fn(n, n, |i, j| cov[[i, j]]).cholesky() {
      None => true,
      Some(chol) => chol
        .l()
        .diagonal()
        .iter()
        .any(|&pivot| pivot * pivot <= VAR_EPS),
    };
    if singular {
      return Err(EngineError::DegenerateCovariance(
        "covariance matrix is singular".into(),
      ));
    }

    Ok(MeanVarianceEstimate {
      tickers: returns.tickers().to_vec(),
      mu,
      cov,
    })
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  fn matrix(data: ndarray::Array2<f64>) -> ReturnMatrix {
    let tickers = (0..data.ncols()).map(|i| format!("T{}", i)).collect();
    ReturnMatrix::new(tickers, data).unwrap()
  }

  #[test]
  fn annualization_scales_mean_and_covariance() {
    let returns = matrix(array![[0.01, 0.02], [0.03, -0.01], [-0.01, 0.02]]);
    let est = MeanVarianceEstimator::estimate(&returns, 252).unwrap();

    assert_relative_eq!(est.mu[0], 0.01 * 252.0, epsilon = 1e-10);
    // daily sample variance of column 0 is 4e-4
    assert_relative_eq!(est.cov[[0, 0]], 4e-4 * 252.0, epsilon = 1e-10);
  }

  #[test]
  fn covariance_is_symmetric() {
    let returns = matrix(array![
      [0.01, 0.02, -0.01],
      [0.03, -0.01, 0.0],
      [-0.01, 0.02, 0.01],
      [0.0, 0.01, 0.02],
    ]);
    let est = MeanVarianceEstimator::estimate(&returns, 252).unwrap();

    for i in 0..3 {
      for j in 0..3 {
        assert_relative_eq!(est.cov[[i, j]], est.cov[[j, i]], epsilon = 1e-12);
      }
    }
  }

  #[test]
  fn single_row_matrix_is_insufficient() {
    let returns = matrix(array![[0.01, 0.02]]);
    let err = MeanVarianceEstimator::estimate(&returns, 252).unwrap_err();
    assert!(matches!(err, EngineError::InsufficientData(_)));
  }

  #[test]
  fn constant_return_asset_is_degenerate() {
    let returns = matrix(array![[0.01, 0.01], [0.03, 0.01], [-0.01, 0.01]]);
    let err = MeanVarianceEstimator::estimate(&returns, 252).unwrap_err();
    match err {
      EngineError::DegenerateCovariance(msg) => assert!(msg.contains("T1")),
      other => panic!("expected DegenerateCovariance, got {:?}", other),
    }
  }

  #[test]
  fn identical_columns_are_singular() {
    let returns = matrix(array![[0.01, 0.01], [0.03, 0.03], [-0.01, -0.01]]);
    let err = MeanVarianceEstimator::estimate(&returns, 252).unwrap_err();
    assert!(matches!(err, EngineError::DegenerateCovariance(_)));
  }

  #[test]
  fn estimate_is_idempotent() {
    let returns = matrix(array![[0.01, 0.02], [0.03, -0.01], [-0.01, 0.02]]);
    let a = MeanVarianceEstimator::estimate(&returns, 252).unwrap();
    let b = MeanVarianceEstimator::estimate(&returns, 252).unwrap();
    assert_eq!(a.mu, b.mu);
    assert_eq!(a.cov, b.cov);
  }
}
