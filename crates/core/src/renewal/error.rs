//! Error types for service-commitment renewal operations.

use chrono::NaiveDate;
use thiserror::Error;

use spendhub_shared::types::CommitmentId;

/// Errors that can occur during renewal operations.
#[derive(Debug, Error)]
pub enum RenewalError {
    /// Commitment shape failed validation.
    #[error("Invalid commitment: {reason}")]
    InvalidCommitment {
        /// What failed.
        reason: String,
    },

    /// Postponement must move the renewal date forward.
    #[error("Postponement periods must be positive, got {periods}")]
    InvalidPostponement {
        /// The rejected number of billing cycles.
        periods: i32,
    },

    /// Retired commitments take no further renewal operations.
    #[error("Commitment {0} is inactive")]
    Inactive(CommitmentId),

    /// Commitment not found.
    #[error("Commitment not found: {0}")]
    NotFound(CommitmentId),

    /// Advancing the renewal date left the supported calendar range.
    #[error("Renewal date out of range when advancing from {date}")]
    DateOutOfRange {
        /// The date the advance started from.
        date: NaiveDate,
    },
}

impl RenewalError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCommitment { .. }
            | Self::InvalidPostponement { .. }
            | Self::DateOutOfRange { .. } => 400,
            Self::Inactive(_) => 409,
            Self::NotFound(_) => 404,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCommitment { .. } => "INVALID_COMMITMENT",
            Self::InvalidPostponement { .. } => "INVALID_POSTPONEMENT",
            Self::Inactive(_) => "COMMITMENT_INACTIVE",
            Self::NotFound(_) => "COMMITMENT_NOT_FOUND",
            Self::DateOutOfRange { .. } => "DATE_OUT_OF_RANGE",
        }
    }
}
