//! Allocation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use spendhub_shared::types::AllocationId;

/// Errors from allocation operations.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Ceiling amount failed validation.
    #[error("Invalid amount for {field}: {amount}")]
    InvalidAmount {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        amount: Decimal,
    },

    /// An allocation chain already exists for this cost group and year.
    #[error("Allocation already exists for {cost_group} in {year}")]
    DuplicateAllocation {
        /// Cost group name.
        cost_group: String,
        /// Fiscal year.
        year: i32,
    },

    /// The caller targeted a superseded revision.
    #[error("Allocation {allocation_id} is superseded; current revision is {current_revision}")]
    StaleWrite {
        /// The revision the caller targeted.
        allocation_id: AllocationId,
        /// The revision that is actually current.
        current_revision: AllocationId,
    },

    /// Allocation not found.
    #[error("Allocation not found: {0}")]
    NotFound(AllocationId),

    /// Cost group not registered for the year.
    #[error("Cost group not found: {cost_group} ({year})")]
    CostGroupNotFound {
        /// Cost group name.
        cost_group: String,
        /// Fiscal year.
        year: i32,
    },

    /// The group exists but no allocation was ever published for the year.
    #[error("No allocation published for {cost_group} in {year}")]
    NoCurrentAllocation {
        /// Cost group name.
        cost_group: String,
        /// Fiscal year.
        year: i32,
    },
}

impl AllocationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } => 400,

            Self::DuplicateAllocation { .. } | Self::StaleWrite { .. } => 409,

            Self::NotFound(_) | Self::CostGroupNotFound { .. } | Self::NoCurrentAllocation { .. } => {
                404
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::DuplicateAllocation { .. } => "DUPLICATE_ALLOCATION",
            Self::StaleWrite { .. } => "STALE_WRITE",
            Self::NotFound(_) => "ALLOCATION_NOT_FOUND",
            Self::CostGroupNotFound { .. } => "COST_GROUP_NOT_FOUND",
            Self::NoCurrentAllocation { .. } => "NO_CURRENT_ALLOCATION",
        }
    }
}
