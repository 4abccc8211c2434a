//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use spendhub_shared::types::TransactionId;

use crate::allocation::{AllocationError, CostType};

use super::types::SpendStatus;

/// Errors that can occur during spend-ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction amount must be strictly positive.
    #[error("Invalid transaction amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// The post would drive headroom negative without an override.
    #[error(
        "Budget exceeded for {cost_group} {year} {cost_type}: headroom {headroom}, attempted {attempted}"
    )]
    BudgetExceeded {
        /// Cost group name.
        cost_group: String,
        /// Fiscal year.
        year: i32,
        /// CAPEX or OPEX.
        cost_type: CostType,
        /// Headroom remaining before the post.
        headroom: Decimal,
        /// Amount the caller tried to post.
        attempted: Decimal,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: SpendStatus,
        /// The attempted target status.
        to: SpendStatus,
    },

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// Allocation lookup or validation failed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } | Self::InvalidTransition { .. } => 400,
            Self::BudgetExceeded { .. } => 422,
            Self::NotFound(_) => 404,
            Self::Allocation(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::BudgetExceeded { .. } => "BUDGET_EXCEEDED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Allocation(err) => err.error_code(),
        }
    }
}
