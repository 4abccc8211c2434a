//! Procurement error types.

use thiserror::Error;

use spendhub_shared::types::{PurchaseOrderId, TransactionId};

use crate::currency::CurrencyError;
use crate::ledger::LedgerError;

use super::types::PoStatus;

/// Errors that can occur during purchase-order operations.
#[derive(Debug, Error)]
pub enum ProcurementError {
    /// Order shape failed validation.
    #[error("Invalid purchase order: {reason}")]
    InvalidPurchaseOrder {
        /// What failed.
        reason: String,
    },

    /// The order number is already taken.
    #[error("Purchase order number already exists: {po_number}")]
    DuplicatePoNumber {
        /// The duplicate number.
        po_number: String,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: PoStatus,
        /// The attempted target status.
        to: PoStatus,
    },

    /// The caller's copy of the order is out of date.
    #[error("Purchase order was modified concurrently: expected version {expected}, actual {actual}")]
    StaleWrite {
        /// Version the caller carried.
        expected: u64,
        /// Version actually stored.
        actual: u64,
    },

    /// Committed spend already exists for this order.
    #[error("Cannot cancel a purchase order with committed spend; reverse it instead")]
    CannotCancelWithCommittedSpend,

    /// Only approved orders with committed spend can be reversed.
    #[error("Purchase order in status {status} cannot be reversed")]
    NotReversible {
        /// The order's current status.
        status: PoStatus,
    },

    /// The committed transaction was already reversed.
    #[error("Transaction {transaction_id} has already been reversed")]
    AlreadyReversed {
        /// The transaction that already carries a reversal.
        transaction_id: TransactionId,
    },

    /// Purchase order not found.
    #[error("Purchase order not found: {0}")]
    NotFound(PurchaseOrderId),

    /// Currency conversion failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// The committed-spend post was rejected by the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ProcurementError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPurchaseOrder { .. }
            | Self::InvalidTransition { .. }
            | Self::NotReversible { .. } => 400,

            Self::DuplicatePoNumber { .. }
            | Self::StaleWrite { .. }
            | Self::CannotCancelWithCommittedSpend
            | Self::AlreadyReversed { .. } => 409,

            Self::NotFound(_) => 404,

            Self::Currency(err) => err.status_code(),
            Self::Ledger(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPurchaseOrder { .. } => "INVALID_PURCHASE_ORDER",
            Self::DuplicatePoNumber { .. } => "DUPLICATE_PO_NUMBER",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::StaleWrite { .. } => "STALE_WRITE",
            Self::CannotCancelWithCommittedSpend => "CANNOT_CANCEL_COMMITTED",
            Self::NotReversible { .. } => "NOT_REVERSIBLE",
            Self::AlreadyReversed { .. } => "ALREADY_REVERSED",
            Self::NotFound(_) => "PURCHASE_ORDER_NOT_FOUND",
            Self::Currency(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
        }
    }
}
