//! Error types for the allocation solver.
//!
//! Every solver failure path ends in one of these variants; `Display` is the
//! diagnostic an investor sees.

use std::fmt;

use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Which optimizer produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    /// Yield maximization (linear program).
    Linear,
    /// Sharpe maximization (nonlinear program).
    NonLinear,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear solver"),
            Self::NonLinear => f.write_str("non-linear solver"),
        }
    }
}

/// Errors that can occur while solving an allocation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// No point satisfies every constraint, or the optimizer gave up.
    #[error("Optimization failed ({solver}): {message}")]
    InfeasibleProblem {
        /// The optimizer that failed.
        solver: SolverKind,
        /// Solver diagnostic, passed through verbatim.
        message: String,
    },

    /// Unrecognized objective mode.
    #[error("Invalid objective type selected: '{objective}'")]
    InvalidObjective {
        /// The rejected objective string.
        objective: String,
    },

    /// The optimizer reported success without a usable weight vector.
    #[error("Optimization failed to produce a valid result: {reason}")]
    DegenerateResult {
        /// What was wrong with the weights.
        reason: String,
    },

    /// Out-of-range parameter or malformed universe.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// The offending parameter.
        reason: String,
    },

    /// Vectors and matrices of different sizes were combined.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
}

impl PortfolioError {
    /// Creates an infeasible problem error.
    #[must_use]
    pub fn infeasible(solver: SolverKind, message: impl Into<String>) -> Self {
        Self::InfeasibleProblem {
            solver,
            message: message.into(),
        }
    }

    /// Creates an invalid objective error.
    #[must_use]
    pub fn invalid_objective(objective: impl Into<String>) -> Self {
        Self::InvalidObjective {
            objective: objective.into(),
        }
    }

    /// Creates a degenerate result error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateResult {
            reason: reason.into(),
        }
    }

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
