//! Error types for market data acquisition.

use bondsmith_core::CoreError;
use bondsmith_math::MathError;
use thiserror::Error;

/// Result type for market data operations.
pub type MarketResult<T> = Result<T, MarketError>;

/// Errors raised while generating or loading market data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// The source file could not be opened or read.
    #[error("I/O error reading '{path}': {message}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error text.
        message: String,
    },

    /// A data row could not be turned into an instrument.
    #[error("parse error at row {row}: {message}")]
    Parse {
        /// One-based data row (header excluded).
        row: usize,
        /// What was wrong with the row.
        message: String,
    },

    /// Out-of-range generator or service setting.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was out of range.
        reason: String,
    },

    /// A generated instrument failed validation.
    #[error(transparent)]
    Instrument(#[from] CoreError),

    /// Curve construction failed.
    #[error("curve error: {0}")]
    Curve(#[from] MathError),
}

impl MarketError {
    /// Creates an I/O error.
    #[must_use]
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error for a data row.
    #[must_use]
    pub fn parse(row: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            row,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketError::parse(3, "unknown rating 'XYZ'");
        assert_eq!(err.to_string(), "parse error at row 3: unknown rating 'XYZ'");

        let err = MarketError::io("bonds.csv", "No such file");
        assert!(err.to_string().contains("bonds.csv"));

        let err: MarketError = CoreError::UnknownSector("Crypto".into()).into();
        assert!(err.to_string().contains("Crypto"));
    }
}
