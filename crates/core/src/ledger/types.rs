//! Spend ledger domain types.
//!
//! Every budget-relevant movement is a `SpendTransaction`: planned spend,
//! committed spend from an approved purchase order, settled invoices, and
//! reversing entries that compensate earlier commitments.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use spendhub_shared::types::{CommitmentId, CostGroupId, PurchaseOrderId, TransactionId};

use crate::allocation::CostType;

/// Transaction status in the spend lifecycle.
///
/// Spend only ever moves forward, one step at a time:
/// - Budgeted → Committed
/// - Committed → Paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpendStatus {
    /// Planned spend; not yet counted against the ceiling.
    Budgeted,
    /// Contractually committed; counts against the ceiling.
    Committed,
    /// Invoice settled; counts against the ceiling.
    Paid,
}

impl SpendStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budgeted => "BUDGETED",
            Self::Committed => "COMMITTED",
            Self::Paid => "PAID",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BUDGETED" => Some(Self::Budgeted),
            "COMMITTED" => Some(Self::Committed),
            "PAID" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Returns true if the amount counts against the budget ceiling.
    #[must_use]
    pub fn counts_against_ceiling(&self) -> bool {
        matches!(self, Self::Committed | Self::Paid)
    }
}

impl fmt::Display for SpendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry in the spend ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendTransaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Cost group charged.
    pub cost_group_id: CostGroupId,
    /// CAPEX or OPEX.
    pub cost_type: CostType,
    /// Amount in USD, always positive.
    pub amount_usd: Decimal,
    /// Transaction date; the fiscal year derives from it.
    pub date: NaiveDate,
    /// Lifecycle status.
    pub status: SpendStatus,
    /// Free-text project / vendor label.
    pub description: String,
    /// Service commitment that produced this entry, if any.
    pub commitment_id: Option<CommitmentId>,
    /// Purchase order that produced this entry, if any.
    pub purchase_order_id: Option<PurchaseOrderId>,
    /// Transaction this entry reverses, if any. Reversing entries
    /// subtract from used totals.
    pub reverses: Option<TransactionId>,
    /// Set when the entry was posted past the ceiling with an override.
    pub budget_override: bool,
}

impl SpendTransaction {
    /// Fiscal year the entry belongs to.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Returns true if this entry reverses another.
    #[must_use]
    pub fn is_reversal(&self) -> bool {
        self.reverses.is_some()
    }
}

/// Input for posting a new ledger entry.
#[derive(Debug, Clone)]
pub struct PostTransactionInput {
    /// Cost group name (registered on first use).
    pub cost_group: String,
    /// CAPEX or OPEX.
    pub cost_type: CostType,
    /// Amount in USD.
    pub amount_usd: Decimal,
    /// Transaction date.
    pub date: NaiveDate,
    /// Initial status.
    pub status: SpendStatus,
    /// Free-text project / vendor label.
    pub description: String,
    /// Optional commitment back-reference.
    pub commitment_id: Option<CommitmentId>,
    /// Optional purchase order back-reference.
    pub purchase_order_id: Option<PurchaseOrderId>,
    /// Post even when the ceiling would be exceeded. Recorded on the
    /// transaction and logged.
    pub override_budget: bool,
}
