//! # Portfolio Engine
//!
//! $$
//! \text{prices} \rightarrow R \rightarrow \{\text{risk}, (\mu, \Sigma) \rightarrow \mathbf{w}^\*, \text{frontier}\}
//! $$
//!
//! High-level orchestration: one return matrix per request, then risk
//! metrics, estimation with optimization, and frontier sampling over it.
//! Everything downstream of the return matrix is a pure function of
//! immutable inputs, so the stages fan out across threads with no locking.

use rayon::join;

use super::frontier::FrontierSample;
use super::frontier::FrontierSampler;
use super::optimizer::PortfolioOptimizer;
use super::types::PortfolioPoint;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::error::Result;
use crate::estimator::MeanVarianceEstimate;
use crate::estimator::MeanVarianceEstimator;
use crate::market::PriceTable;
use crate::market::ReturnMatrix;
use crate::risk::RiskMetrics;
use crate::risk::RiskReport;

/// Full per-request output of [`PortfolioEngine::analyze`].
#[derive(Clone, Debug)]
pub struct EngineReport {
  /// Per-ticker VaR and rolling volatility.
  pub risk: RiskReport,
  /// The solver's max-Sharpe allocation, weights included.
  pub optimal: PortfolioPoint,
  /// The sampled frontier cloud and its best realized point.
  pub frontier: FrontierSample,
}

/// Single entry point for the risk and optimization pipeline.
#[derive(Clone, Debug)]
pub struct PortfolioEngine {
  config: EngineConfig,
}

impl PortfolioEngine {
  /// Construct a new engine with explicit configuration.
  pub fn new(config: EngineConfig) -> Self {
    Self { config }
  }

  /// Borrow engine configuration.
  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Build the return matrix for a price history.
  pub fn returns(&self, prices: &PriceTable) -> Result<ReturnMatrix> {
    ReturnMatrix::from_prices(prices, self.config.min_observations)
  }

  /// Risk metrics with the configured window.
  ///
  /// When the history is shorter than the window and `vol_fallback` is
  /// enabled, the full sample is used instead; the substitution is logged
  /// and flagged on the report, never silent.
  pub fn risk_report(&self, returns: &ReturnMatrix) -> Result<RiskReport> {
    match RiskMetrics::compute(returns, self.config.risk_window) {
      Err(EngineError::InsufficientData(_))
        if self.config.vol_fallback
          && returns.n_periods() >= 2
          && returns.n_periods() < self.config.risk_window =>
      {
        tracing::warn!(
          window = self.config.risk_window,
          rows = returns.n_periods(),
          "rolling window exceeds history, falling back to full-sample volatility"
        );
        let mut report = RiskMetrics::compute(returns, returns.n_periods())?;
        report.full_sample_fallback = true;
        Ok(report)
      }
      other => other,
    }
  }

  /// Annualized mean/covariance estimate.
  pub fn estimate(&self, returns: &ReturnMatrix) -> Result<MeanVarianceEstimate> {
    MeanVarianceEstimator::estimate(returns, self.config.periods_per_year)
  }

  /// Max-Sharpe allocation under the configured solver budget.
  pub fn optimize(&self, est: &MeanVarianceEstimate) -> Result<PortfolioPoint> {
    PortfolioOptimizer::new(self.config.max_iters, self.config.risk_free).optimize(est)
  }

  /// Random frontier cloud of the configured size.
  pub fn frontier(&self, est: &MeanVarianceEstimate) -> Result<FrontierSample> {
    FrontierSampler::new(self.config.risk_free).sample(est, self.config.frontier_samples)
  }

  /// Run the whole pipeline for one price history.
  ///
  /// The return matrix is built once; risk metrics run in parallel with
  /// estimation, which feeds the optimizer and the frontier sampler in
  /// parallel. The first failure wins and no partial report is returned.
  pub fn analyze(&self, prices: &PriceTable) -> Result<EngineReport> {
    let returns = self.returns(prices)?;
    tracing::debug!(
      assets = returns.n_assets(),
      periods = returns.n_periods(),
      "return matrix built"
    );

    let (risk, solved) = join(
      || self.risk_report(&returns),
      || -> Result<(PortfolioPoint, FrontierSample)> {
        let est = self.estimate(&returns)?;
        let (optimal, frontier) = join(|| self.optimize(&est), || self.frontier(&est));
        Ok((optimal?, frontier?))
      },
    );

    let (optimal, frontier) = solved?;
    Ok(EngineReport {
      risk: risk?,
      optimal,
      frontier,
    })
  }
}
