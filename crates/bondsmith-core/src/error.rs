//! Error types for instrument construction and validation.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or validating instruments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Missing required field during construction.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// Instrument attribute outside its valid domain.
    #[error("Invalid instrument '{id}': {reason}")]
    InvalidInstrument {
        /// The instrument identifier.
        id: String,
        /// Why the instrument is invalid.
        reason: String,
    },

    /// Unrecognized rating label.
    #[error("Unknown credit rating: '{0}'")]
    UnknownRating(String),

    /// Unrecognized sector label.
    #[error("Unknown sector: '{0}'")]
    UnknownSector(String),
}

impl CoreError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
