//! # Portfolio Risk & Optimization Engine
//!
//! `frontier_rs` turns historical close prices for a basket of tickers into
//! risk metrics, a max-Sharpe allocation and a sampled efficient frontier.
//!
//! ## Modules
//!
//! | Module        | Description                                                              |
//! |---------------|--------------------------------------------------------------------------|
//! | [`market`]    | Price-table container, ticker sanitation and return-series construction. |
//! | [`risk`]      | Value-at-Risk and rolling volatility per asset.                          |
//! | [`estimator`] | Annualized mean returns and covariance with degeneracy detection.        |
//! | [`portfolio`] | Max-Sharpe optimizer, frontier sampler and the orchestrating engine.     |
//! | [`report`]    | Serialization-ready payloads for the service edge.                       |
//! | [`config`]    | Explicit engine configuration, no process-wide state.                    |
//! | [`error`]     | Typed failure kinds, mapped to 400/500 at the service edge.              |
//!
//! ## Parallelism
//!
//! Every computation downstream of the return matrix is a pure function of
//! immutable inputs: risk metrics, estimation plus optimization, and
//! frontier sampling fan out with `rayon`, and the frontier's samples are
//! themselves drawn in parallel.
//!
//! ## Example Usage
//!
//! ```rust
//! use frontier_rs::config::EngineConfig;
//! use frontier_rs::portfolio::PortfolioEngine;
//!
//! // let prices: PriceTable = ...;
//! let engine = PortfolioEngine::new(EngineConfig::default());
//! // let report = engine.analyze(&prices)?;
//! ```

pub mod config;
pub mod error;
pub mod estimator;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod risk;

pub use config::EngineConfig;
pub use error::EngineError;
pub use error::Result;
pub use estimator::MeanVarianceEstimate;
pub use estimator::MeanVarianceEstimator;
pub use market::sanitize_tickers;
pub use market::PriceTable;
pub use market::ReturnMatrix;
pub use portfolio::EngineReport;
pub use portfolio::FrontierSample;
pub use portfolio::FrontierSampler;
pub use portfolio::PortfolioEngine;
pub use portfolio::PortfolioOptimizer;
pub use portfolio::PortfolioPoint;
pub use report::FrontierPayload;
pub use report::RiskPayload;
pub use risk::RiskMetrics;
pub use risk::RiskReport;
