//! Currency error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from currency formatting and conversion.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// The currency code is not a recognized ISO 4217 code.
    #[error("Unrecognized currency code: {code}")]
    InvalidCurrencyCode {
        /// The offending code as supplied by the caller.
        code: String,
    },

    /// Exchange rates must be strictly positive.
    #[error("Invalid exchange rate: {rate}")]
    InvalidExchangeRate {
        /// The offending rate.
        rate: Decimal,
    },
}

impl CurrencyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCurrencyCode { .. } | Self::InvalidExchangeRate { .. } => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCurrencyCode { .. } => "INVALID_CURRENCY_CODE",
            Self::InvalidExchangeRate { .. } => "INVALID_EXCHANGE_RATE",
        }
    }
}
