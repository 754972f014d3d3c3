//! # Max-Sharpe Optimizer
//!
//! $$
//! \min_{\mathbf{x} \in \mathbb{R}^n} -S(\mathrm{softmax}(\mathbf{x}))
//! $$
//!
//! Constrained maximization of the Sharpe ratio over the long-only simplex.
//! The simplex constraint is enforced by construction: the solver works in
//! unconstrained coordinates and a softmax maps every candidate onto
//! `{w : sum w_i = 1, w_i >= 0}`. Nelder-Mead is seeded so that the initial
//! simplex contains the origin, whose image is the equal-weight portfolio;
//! the best vertex is never discarded, so the result cannot score worse
//! than that seed. The objective is not convex: the contract is a feasible,
//! locally optimal point, not a global optimum.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::core::TerminationReason;
use argmin::core::TerminationStatus;
use argmin::solver::neldermead::NelderMead;
use ndarray::Array1;

use super::types::PortfolioPoint;
use crate::error::EngineError;
use crate::error::Result;
use crate::estimator::MeanVarianceEstimate;

/// Cost assigned to zero-volatility candidates, keeping the solver away
/// from corners where the ratio is undefined without ever dividing by zero.
const DEGENERATE_COST: f64 = 1e10;

fn softmax(x: &[f64]) -> Array1<f64> {
  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    Array1::from_elem(x.len(), 1.0 / x.len() as f64)
  } else {
    Array1::from_iter(exps.iter().map(|&e| e / sum))
  }
}

struct NegSharpeCost {
  est: MeanVarianceEstimate,
  risk_free: f64,
}

impl CostFunction for NegSharpeCost {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
    let w = softmax(x);
    match PortfolioPoint::evaluate(&w, &self.est, self.risk_free) {
      Some(point) => Ok(-point.sharpe_ratio),
      None => Ok(DEGENERATE_COST),
    }
  }
}

/// Sharpe-ratio maximizer over the long-only, fully-invested simplex.
#[derive(Clone, Copy, Debug)]
pub struct PortfolioOptimizer {
  max_iters: u64,
  risk_free: f64,
}

impl PortfolioOptimizer {
  /// New optimizer with an iteration budget and risk-free rate.
  pub fn new(max_iters: u64, risk_free: f64) -> Self {
    Self {
      max_iters,
      risk_free,
    }
  }

  /// Solve for the weight vector maximizing the Sharpe ratio.
  ///
  /// Fails with [`EngineError::OptimizationDiverged`] when the solver
  /// errors or exhausts its iteration budget without converging, and with
  /// [`EngineError::DegenerateCovariance`] when the optimum has no usable
  /// volatility.
  pub fn optimize(&self, est: &MeanVarianceEstimate) -> Result<PortfolioPoint> {
    let n = est.n_assets();
    if n == 0 {
      return Err(EngineError::InvalidInput("no assets to optimize".into()));
    }

    // single feasible point, nothing to search
    if n == 1 {
      let w = Array1::from_elem(1, 1.0);
      return PortfolioPoint::evaluate(&w, est, self.risk_free).ok_or_else(|| {
        EngineError::DegenerateCovariance("single asset has zero volatility".into())
      });
    }

    let cost = NegSharpeCost {
      est: est.clone(),
      risk_free: self.risk_free,
    };

    let x0 = vec![0.0; n];
    let mut simplex = Vec::with_capacity(n + 1);
    simplex.push(x0);
    for i in 0..n {
      let mut point = vec![0.0; n];
      point[i] = 1.0;
      simplex.push(point);
    }

    let solver = NelderMead::new(simplex)
      .with_sd_tolerance(1e-8)
      .map_err(|e| EngineError::OptimizationDiverged(e.to_string()))?;

    let res = Executor::new(cost, solver)
      .configure(|state| state.max_iters(self.max_iters))
      .run()
      .map_err(|e| EngineError::OptimizationDiverged(e.to_string()))?;

    if matches!(
      res.state.termination_status,
      TerminationStatus::Terminated(TerminationReason::MaxItersReached)
    ) {
      return Err(EngineError::OptimizationDiverged(format!(
        "no convergence within {} iterations",
        self.max_iters
      )));
    }

    let best_x = res.state.best_param.ok_or_else(|| {
      EngineError::OptimizationDiverged("solver finished without a best parameter".into())
    })?;

    let w = softmax(&best_x);
    tracing::debug!(iters = res.state.iter, "max-Sharpe solve converged");

    PortfolioPoint::evaluate(&w, est, self.risk_free).ok_or_else(|| {
      EngineError::DegenerateCovariance("volatility vanished at the optimum".into())
    })
  }
}

#[cfg(test)]
mod tests {
  use ndarray::array;

  use super::*;

  fn two_asset_estimate() -> MeanVarianceEstimate {
    MeanVarianceEstimate {
      tickers: vec!["LOW".into(), "HIGH".into()],
      mu: array![0.10, 0.20],
      cov: array![[0.04, 0.0], [0.0, 0.09]],
    }
  }

  fn assert_on_simplex(w: &[f64]) {
    let sum: f64 = w.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6, "weights sum to {}", sum);
    for &wi in w {
      assert!((-1e-9..=1.0 + 1e-9).contains(&wi), "weight {} out of bounds", wi);
    }
  }

  #[test]
  fn uncorrelated_assets_yield_a_feasible_positive_sharpe() {
    let est = two_asset_estimate();
    let point = PortfolioOptimizer::new(5000, 0.0).optimize(&est).unwrap();

    let w = point.weights.as_ref().unwrap();
    assert_on_simplex(w);
    assert!(point.sharpe_ratio > 0.0);

    let seed = Array1::from_elem(2, 0.5);
    let seed_point = PortfolioPoint::evaluate(&seed, &est, 0.0).unwrap();
    assert!(point.sharpe_ratio >= seed_point.sharpe_ratio - 1e-9);
  }

  #[test]
  fn dominant_asset_gets_more_weight() {
    // equal variance, double the return: the second asset strictly dominates
    let est = MeanVarianceEstimate {
      tickers: vec!["LOW".into(), "HIGH".into()],
      mu: array![0.10, 0.20],
      cov: array![[0.04, 0.0], [0.0, 0.04]],
    };
    let point = PortfolioOptimizer::new(5000, 0.0).optimize(&est).unwrap();

    let w = point.weights.as_ref().unwrap();
    assert_on_simplex(w);
    assert!(w[1] > w[0], "expected overweight on the 0.20-return asset");
    assert!(point.sharpe_ratio > 0.0);
  }

  #[test]
  fn result_is_feasible_and_improves_on_the_seed() {
    let est = MeanVarianceEstimate {
      tickers: vec!["A".into(), "B".into(), "C".into()],
      mu: array![0.08, 0.12, 0.05],
      cov: array![
        [0.04, 0.01, 0.00],
        [0.01, 0.09, 0.02],
        [0.00, 0.02, 0.16],
      ],
    };

    let point = PortfolioOptimizer::new(5000, 0.0).optimize(&est).unwrap();
    assert_on_simplex(point.weights.as_ref().unwrap());

    let seed = Array1::from_elem(3, 1.0 / 3.0);
    let seed_point = PortfolioPoint::evaluate(&seed, &est, 0.0).unwrap();
    assert!(point.sharpe_ratio >= seed_point.sharpe_ratio - 1e-9);
  }

  #[test]
  fn exhausted_budget_is_divergence() {
    let est = two_asset_estimate();
    let err = PortfolioOptimizer::new(1, 0.0).optimize(&est).unwrap_err();
    assert!(matches!(err, EngineError::OptimizationDiverged(_)));
  }

  #[test]
  fn single_asset_is_trivially_fully_invested() {
    let est = MeanVarianceEstimate {
      tickers: vec!["ONLY".into()],
      mu: array![0.10],
      cov: array![[0.04]],
    };

    let point = PortfolioOptimizer::new(5000, 0.0).optimize(&est).unwrap();
    assert_eq!(point.weights.as_ref().unwrap(), &vec![1.0]);
    assert!((point.volatility - 0.2).abs() < 1e-12);
  }

  #[test]
  fn softmax_of_origin_is_equal_weight() {
    let w = softmax(&[0.0, 0.0, 0.0, 0.0]);
    for &wi in w.iter() {
      assert!((wi - 0.25).abs() < 1e-12);
    }
  }
}
