//! Error types for risk calculations.

use bondsmith_math::MathError;
use thiserror::Error;

/// Result type for risk operations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// Out-of-range parameter.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was out of range.
        reason: String,
    },

    /// Weights, returns and covariance disagree in size.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A numerical kernel rejected its input.
    #[error("numerical error: {0}")]
    Numerical(#[from] MathError),
}

impl RiskError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}
