//! Purchase order domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use spendhub_shared::types::{Currency, PurchaseOrderId};

use crate::allocation::CostType;
use crate::currency::{to_usd, CurrencyError};

/// Purchase order status in the approval workflow.
///
/// The valid transitions are:
/// - Draft → PendingApproval (submit)
/// - PendingApproval → Approved (approve)
/// - PendingApproval → Rejected (reject)
/// - PendingApproval → Revised (request revision)
/// - Revised → PendingApproval (resubmit)
/// - Draft / PendingApproval / Revised → Cancelled (cancel)
///
/// Approved, Rejected, and Cancelled are terminal. Undoing an approved
/// order goes through a reversing ledger transaction, never a status
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoStatus {
    /// Order is being drafted and can be edited or deleted.
    Draft,
    /// Order has been submitted and awaits a decision.
    PendingApproval,
    /// Order was approved; committed spend has been posted.
    Approved,
    /// Order was rejected.
    Rejected,
    /// Changes were requested; the order can be edited and resubmitted.
    Revised,
    /// Order was withdrawn before approval.
    Cancelled,
}

impl PoStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Revised => "REVISED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "PENDING_APPROVAL" => Some(Self::PendingApproval),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "REVISED" => Some(Self::Revised),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition leaves this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Cancelled)
    }

    /// Returns true if the order's line items can be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Revised)
    }
}

impl fmt::Display for PoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ordered line on a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What is being bought.
    pub description: String,
    /// Ordered quantity, at least 1.
    pub quantity: u32,
    /// Unit price in the order's local currency, non-negative.
    pub unit_price_local: Decimal,
}

impl LineItem {
    /// Line total in local currency.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price_local
    }
}

/// A purchase order moving through the approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Purchase order ID.
    pub id: PurchaseOrderId,
    /// Externally assigned order number, unique (e.g. "PO-2025-0012").
    pub po_number: String,
    /// Vendor name.
    pub vendor: String,
    /// Cost group charged when the order is approved.
    pub cost_group: String,
    /// CAPEX or OPEX.
    pub cost_type: CostType,
    /// Local currency of the line items.
    pub currency: Currency,
    /// Exchange rate from local currency to USD, strictly positive.
    pub fx_rate_to_usd: Decimal,
    /// Ordered line items.
    pub line_items: Vec<LineItem>,
    /// Lifecycle status.
    pub status: PoStatus,
    /// Date the order was drafted.
    pub created_on: NaiveDate,
    /// Optimistic-concurrency counter, bumped on every write.
    pub version: u64,
}

impl PurchaseOrder {
    /// Order total in local currency, recomputed from the line items.
    #[must_use]
    pub fn total_local(&self) -> Decimal {
        self.line_items.iter().map(LineItem::line_total).sum()
    }

    /// Order total in USD, recomputed on every call. Totals are never
    /// stored, so a line-item edit is reflected on the next read.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidExchangeRate` if the stored rate is
    /// not positive.
    pub fn total_usd(&self) -> Result<Decimal, CurrencyError> {
        to_usd(self.total_local(), self.fx_rate_to_usd)
    }
}

/// Input for drafting a purchase order.
#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    /// Externally assigned order number.
    pub po_number: String,
    /// Vendor name.
    pub vendor: String,
    /// Cost group to charge on approval.
    pub cost_group: String,
    /// CAPEX or OPEX.
    pub cost_type: CostType,
    /// Local currency of the line items.
    pub currency: Currency,
    /// Exchange rate from local currency to USD.
    pub fx_rate_to_usd: Decimal,
    /// Initial line items; may be empty while drafting.
    pub line_items: Vec<LineItem>,
}
