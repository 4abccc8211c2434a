//! Procurement service for purchase-order state transitions.
//!
//! Implements the approval state machine and shape validation. The store
//! applies the returned statuses, bumps version counters, and posts the
//! committed-spend transaction on approval.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use spendhub_shared::types::PurchaseOrderId;

use super::error::ProcurementError;
use super::types::{CreatePurchaseOrderInput, LineItem, PoStatus, PurchaseOrder};

/// Stateless service for the purchase-order workflow.
pub struct ProcurementService;

impl ProcurementService {
    /// Builds a new draft order.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidPurchaseOrder` when the number,
    /// vendor, cost group, FX rate, or any line item fails validation.
    pub fn create_draft(
        input: CreatePurchaseOrderInput,
        created_on: NaiveDate,
    ) -> Result<PurchaseOrder, ProcurementError> {
        Self::validate_draft(&input)?;

        Ok(PurchaseOrder {
            id: PurchaseOrderId::new(),
            po_number: input.po_number,
            vendor: input.vendor,
            cost_group: input.cost_group,
            cost_type: input.cost_type,
            currency: input.currency,
            fx_rate_to_usd: input.fx_rate_to_usd,
            line_items: input.line_items,
            status: PoStatus::Draft,
            created_on,
            version: 1,
        })
    }

    /// Validates the shape of a draft order.
    ///
    /// An empty line-item list is allowed while drafting; `submit` is the
    /// gate that requires at least one line.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidPurchaseOrder` naming the first
    /// field that failed.
    pub fn validate_draft(input: &CreatePurchaseOrderInput) -> Result<(), ProcurementError> {
        if input.po_number.trim().is_empty() {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: "po_number must not be empty".to_string(),
            });
        }
        if input.vendor.trim().is_empty() {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: "vendor must not be empty".to_string(),
            });
        }
        if input.cost_group.trim().is_empty() {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: "cost_group must not be empty".to_string(),
            });
        }
        if input.fx_rate_to_usd <= Decimal::ZERO {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: format!(
                    "fx_rate_to_usd must be positive, got {}",
                    input.fx_rate_to_usd
                ),
            });
        }
        Self::validate_line_items(&input.line_items)
    }

    /// Validates a set of line items.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidPurchaseOrder` for an empty
    /// description, a zero quantity, or a negative unit price.
    pub fn validate_line_items(line_items: &[LineItem]) -> Result<(), ProcurementError> {
        for (index, item) in line_items.iter().enumerate() {
            if item.description.trim().is_empty() {
                return Err(ProcurementError::InvalidPurchaseOrder {
                    reason: format!("line item {index}: description must not be empty"),
                });
            }
            if item.quantity == 0 {
                return Err(ProcurementError::InvalidPurchaseOrder {
                    reason: format!("line item {index}: quantity must be at least 1"),
                });
            }
            if item.unit_price_local < Decimal::ZERO {
                return Err(ProcurementError::InvalidPurchaseOrder {
                    reason: format!(
                        "line item {index}: unit price must not be negative, got {}",
                        item.unit_price_local
                    ),
                });
            }
        }
        Ok(())
    }

    /// Submit a draft order for approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the order is DRAFT, or
    /// `InvalidPurchaseOrder` when the submit checks fail.
    pub fn submit(po: &PurchaseOrder) -> Result<PoStatus, ProcurementError> {
        match po.status {
            PoStatus::Draft => {
                Self::validate_submittable(po)?;
                Ok(PoStatus::PendingApproval)
            }
            _ => Err(ProcurementError::InvalidTransition {
                from: po.status,
                to: PoStatus::PendingApproval,
            }),
        }
    }

    /// Approve a pending order.
    ///
    /// The caller posts the committed-spend transaction in the same
    /// atomic step; if that post fails, the order must stay
    /// PENDING_APPROVAL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the order is PENDING_APPROVAL.
    pub fn approve(po: &PurchaseOrder) -> Result<PoStatus, ProcurementError> {
        match po.status {
            PoStatus::PendingApproval => Ok(PoStatus::Approved),
            _ => Err(ProcurementError::InvalidTransition {
                from: po.status,
                to: PoStatus::Approved,
            }),
        }
    }

    /// Reject a pending order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the order is PENDING_APPROVAL.
    pub fn reject(po: &PurchaseOrder) -> Result<PoStatus, ProcurementError> {
        match po.status {
            PoStatus::PendingApproval => Ok(PoStatus::Rejected),
            _ => Err(ProcurementError::InvalidTransition {
                from: po.status,
                to: PoStatus::Rejected,
            }),
        }
    }

    /// Send a pending order back for changes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the order is PENDING_APPROVAL.
    pub fn request_revision(po: &PurchaseOrder) -> Result<PoStatus, ProcurementError> {
        match po.status {
            PoStatus::PendingApproval => Ok(PoStatus::Revised),
            _ => Err(ProcurementError::InvalidTransition {
                from: po.status,
                to: PoStatus::Revised,
            }),
        }
    }

    /// Resubmit a revised order for approval.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the order is REVISED, or
    /// `InvalidPurchaseOrder` when the submit checks fail.
    pub fn resubmit(po: &PurchaseOrder) -> Result<PoStatus, ProcurementError> {
        match po.status {
            PoStatus::Revised => {
                Self::validate_submittable(po)?;
                Ok(PoStatus::PendingApproval)
            }
            _ => Err(ProcurementError::InvalidTransition {
                from: po.status,
                to: PoStatus::PendingApproval,
            }),
        }
    }

    /// Cancel an order that has not reached a terminal state.
    ///
    /// The committed-spend guard runs first: an approved order with spend
    /// on the ledger reports `CannotCancelWithCommittedSpend`, pointing the
    /// caller at the reversal path instead of a dead-end transition error.
    ///
    /// # Errors
    ///
    /// Returns `CannotCancelWithCommittedSpend` when committed spend
    /// already references the order and `InvalidTransition` from terminal
    /// states.
    pub fn cancel(
        po: &PurchaseOrder,
        has_committed_spend: bool,
    ) -> Result<PoStatus, ProcurementError> {
        if has_committed_spend {
            return Err(ProcurementError::CannotCancelWithCommittedSpend);
        }
        if po.status.is_terminal() {
            return Err(ProcurementError::InvalidTransition {
                from: po.status,
                to: PoStatus::Cancelled,
            });
        }
        Ok(PoStatus::Cancelled)
    }

    /// Line items may only change while the order is DRAFT or REVISED.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidPurchaseOrder` otherwise.
    pub fn ensure_editable(po: &PurchaseOrder) -> Result<(), ProcurementError> {
        if !po.status.is_editable() {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: format!(
                    "line items can only be edited in DRAFT or REVISED, order is {}",
                    po.status
                ),
            });
        }
        Ok(())
    }

    /// Hard deletion is allowed only while the order is still DRAFT.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidPurchaseOrder` otherwise.
    pub fn ensure_deletable(po: &PurchaseOrder) -> Result<(), ProcurementError> {
        if po.status != PoStatus::Draft {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: format!("only DRAFT orders can be deleted, order is {}", po.status),
            });
        }
        Ok(())
    }

    /// Reversal applies to approved orders only. The order keeps its
    /// APPROVED status; the ledger records the undo.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::NotReversible` for any other status.
    pub fn ensure_reversible(po: &PurchaseOrder) -> Result<(), ProcurementError> {
        if po.status != PoStatus::Approved {
            return Err(ProcurementError::NotReversible { status: po.status });
        }
        Ok(())
    }

    /// Compares the caller's version with the stored one.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite` on mismatch.
    pub fn check_version(po: &PurchaseOrder, expected: u64) -> Result<(), ProcurementError> {
        if po.version != expected {
            return Err(ProcurementError::StaleWrite {
                expected,
                actual: po.version,
            });
        }
        Ok(())
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Draft → PendingApproval (submit)
    /// - PendingApproval → Approved (approve)
    /// - PendingApproval → Rejected (reject)
    /// - PendingApproval → Revised (request revision)
    /// - Revised → PendingApproval (resubmit)
    /// - Draft / PendingApproval / Revised → Cancelled (cancel)
    #[must_use]
    pub fn is_valid_transition(from: PoStatus, to: PoStatus) -> bool {
        matches!(
            (from, to),
            (PoStatus::Draft, PoStatus::PendingApproval)
                | (
                    PoStatus::PendingApproval,
                    PoStatus::Approved | PoStatus::Rejected | PoStatus::Revised
                )
                | (PoStatus::Revised, PoStatus::PendingApproval)
                | (
                    PoStatus::Draft | PoStatus::PendingApproval | PoStatus::Revised,
                    PoStatus::Cancelled
                )
        )
    }

    fn validate_submittable(po: &PurchaseOrder) -> Result<(), ProcurementError> {
        if po.vendor.trim().is_empty() {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: "vendor must not be empty".to_string(),
            });
        }
        if po.cost_group.trim().is_empty() {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: "cost_group must not be empty".to_string(),
            });
        }
        if po.line_items.is_empty() {
            return Err(ProcurementError::InvalidPurchaseOrder {
                reason: "order must have at least one line item".to_string(),
            });
        }
        Self::validate_line_items(&po.line_items)
    }
}
