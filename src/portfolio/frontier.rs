//! # Frontier Sampler
//!
//! $$
//! w_i = \frac{u_i}{\sum_j u_j}, \quad u_i \sim \mathcal{U}(0, 1) \ \text{i.i.d.}
//! $$
//!
//! Monte-Carlo exploration of the risk/return trade-off surface. Weights
//! are i.i.d. uniforms normalized to sum to one, which is deliberately NOT
//! a uniform distribution over the simplex. Existing frontier
//! visualizations depend on that cloud density; do not substitute a
//! Dirichlet sampler here.

use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_stats::QuantileExt;
use rand::Rng;
use rand_distr::Uniform;
use rayon::prelude::*;

use super::types::PortfolioPoint;
use crate::error::EngineError;
use crate::error::Result;
use crate::estimator::MeanVarianceEstimate;

/// A sampled approximation of the efficient frontier.
#[derive(Clone, Debug)]
pub struct FrontierSample {
  /// The sampled cloud, weights omitted. Ordering is not significant.
  pub points: Vec<PortfolioPoint>,
  /// The best realized sample by Sharpe ratio, weights included. A ranking
  /// over the cloud, not a numerical optimum; expected to differ from the
  /// solver's result.
  pub best: PortfolioPoint,
}

fn draw_weights<R: Rng + ?Sized>(n_assets: usize, rng: &mut R) -> Array1<f64> {
  let u: Array1<f64> = Array1::random_using(n_assets, Uniform::new(0.0, 1.0), rng);
  let sum = u.sum();
  if sum <= f64::EPSILON {
    Array1::from_elem(n_assets, 1.0 / n_assets as f64)
  } else {
    u / sum
  }
}

/// Random-portfolio sampler over the simplex.
#[derive(Clone, Copy, Debug)]
pub struct FrontierSampler {
  risk_free: f64,
}

impl FrontierSampler {
  pub fn new(risk_free: f64) -> Self {
    Self { risk_free }
  }

  /// Draw `n` random feasible portfolios and evaluate each.
  ///
  /// Zero-volatility samples are unusable (their Sharpe ratio is
  /// undefined) and are skipped. Fails with [`EngineError::EmptySample`]
  /// when `n == 0` or no usable sample remains.
  pub fn sample(&self, est: &MeanVarianceEstimate, n: usize) -> Result<FrontierSample> {
    if n == 0 {
      return Err(EngineError::EmptySample("requested 0 samples".into()));
    }
    let n_assets = est.n_assets();
    if n_assets == 0 {
      return Err(EngineError::InvalidInput("no assets to sample".into()));
    }

    let mut points: Vec<PortfolioPoint> = (0..n)
      .into_par_iter()
      .filter_map(|_| {
        let mut rng = rand::thread_rng();
        let w = draw_weights(n_assets, &mut rng);
        PortfolioPoint::evaluate(&w, est, self.risk_free)
      })
      .collect();

    if points.is_empty() {
      return Err(EngineError::EmptySample(
        "all sampled portfolios had zero volatility".into(),
      ));
    }

    let sharpes = Array1::from_iter(points.iter().map(|p| p.sharpe_ratio));
    let best_idx = sharpes
      .argmax()
      .map_err(|e| EngineError::EmptySample(e.to_string()))?;
    let best = points[best_idx].clone();

    for point in &mut points {
      point.weights = None;
    }

    Ok(FrontierSample { points, best })
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  fn estimate() -> MeanVarianceEstimate {
    MeanVarianceEstimate {
      tickers: vec!["A".into(), "B".into(), "C".into()],
      mu: array![0.08, 0.12, 0.05],
      cov: array![
        [0.04, 0.01, 0.00],
        [0.01, 0.09, 0.02],
        [0.00, 0.02, 0.16],
      ],
    }
  }

  #[test]
  fn drawn_weights_stay_on_the_simplex() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
      let w = draw_weights(4, &mut rng);
      let sum: f64 = w.sum();
      assert!((sum - 1.0).abs() < 1e-9);
      assert!(w.iter().all(|&wi| (0.0..=1.0).contains(&wi)));
    }
  }

  #[test]
  fn sample_yields_the_requested_cloud() {
    let sample = FrontierSampler::new(0.0).sample(&estimate(), 500).unwrap();

    assert_eq!(sample.points.len(), 500);
    for point in &sample.points {
      assert!(point.weights.is_none());
      assert!(point.volatility > 0.0);
      assert!(point.sharpe_ratio.is_finite());
    }
  }

  #[test]
  fn best_is_the_argmax_over_the_cloud() {
    let sample = FrontierSampler::new(0.0).sample(&estimate(), 300).unwrap();

    assert!(sample.best.weights.is_some());
    for point in &sample.points {
      assert!(point.sharpe_ratio <= sample.best.sharpe_ratio + 1e-12);
    }
  }

  #[test]
  fn zero_samples_is_an_error() {
    let err = FrontierSampler::new(0.0).sample(&estimate(), 0).unwrap_err();
    assert!(matches!(err, EngineError::EmptySample(_)));
  }

  #[test]
  fn single_asset_cloud_collapses_to_its_volatility() {
    let est = MeanVarianceEstimate {
      tickers: vec!["ONLY".into()],
      mu: array![0.10],
      cov: array![[0.04]],
    };

    let sample = FrontierSampler::new(0.0).sample(&est, 50).unwrap();
    for point in &sample.points {
      assert_relative_eq!(point.volatility, 0.2, epsilon = 1e-12);
    }
  }
}
