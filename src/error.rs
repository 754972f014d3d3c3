//! # Errors
//!
//! $$
//! \text{precondition violated} \Rightarrow \text{typed failure, no partial result}
//! $$
//!
//! Typed failure kinds for the analytics engine. Every component validates
//! its own preconditions and fails with the most specific kind instead of
//! letting a numerical exception escape.

use thiserror::Error;

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failure kinds surfaced by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
  /// Empty or malformed ticker list.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Too few price observations or return rows for the requested window/assets.
  #[error("insufficient data: {0}")]
  InsufficientData(String),

  /// Singular covariance matrix or zero-variance asset.
  #[error("degenerate covariance: {0}")]
  DegenerateCovariance(String),

  /// The solver failed to converge within its iteration budget.
  #[error("optimization diverged: {0}")]
  OptimizationDiverged(String),

  /// Sampling produced zero usable portfolios.
  #[error("empty sample: {0}")]
  EmptySample(String),
}

impl EngineError {
  /// Whether the failure is caused by the caller's input rather than the
  /// numerics. The service edge maps client errors to HTTP 400, the rest
  /// to 500.
  pub fn is_client_error(&self) -> bool {
    matches!(
      self,
      EngineError::InvalidInput(_) | EngineError::InsufficientData(_)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn client_errors_map_to_bad_request() {
    assert!(EngineError::InvalidInput("no tickers".into()).is_client_error());
    assert!(EngineError::InsufficientData("1 row".into()).is_client_error());
    assert!(!EngineError::DegenerateCovariance("singular".into()).is_client_error());
    assert!(!EngineError::OptimizationDiverged("budget".into()).is_client_error());
    assert!(!EngineError::EmptySample("n=0".into()).is_client_error());
  }

  #[test]
  fn error_messages_carry_the_kind() {
    let e = EngineError::DegenerateCovariance("zero variance for AAPL".into());
    assert_eq!(
      e.to_string(),
      "degenerate covariance: zero variance for AAPL"
    );
  }
}
