//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by date, period and currency handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string could not be parsed.
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unknown or unsupported currency code.
    #[error("Unknown currency: {code}")]
    UnknownCurrency {
        /// The offending code.
        code: String,
    },

    /// An FX rate was requested for a currency missing from the matrix.
    #[error("No FX rate between {from} and {to}")]
    MissingFxRate {
        /// Source currency code.
        from: String,
        /// Target currency code.
        to: String,
    },

    /// Invalid input parameters.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
