//! Allocation domain types: cost groups and yearly budget ceilings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use spendhub_shared::types::{AllocationId, CostGroupId};

/// Capital vs operating expenditure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostType {
    /// Capital expenditure (one-off purchases, hardware, build-outs).
    Capex,
    /// Operating expenditure (subscriptions, services, run costs).
    Opex,
}

impl CostType {
    /// Returns the string representation of the cost type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capex => "CAPEX",
            Self::Opex => "OPEX",
        }
    }

    /// Parses a cost type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CAPEX" => Some(Self::Capex),
            "OPEX" => Some(Self::Opex),
            _ => None,
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named spending category, scoped to a fiscal year.
///
/// Groups are registered implicitly on first reference and are immutable
/// afterwards; budget history lives in allocation revisions, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostGroup {
    /// Cost group ID.
    pub id: CostGroupId,
    /// Group name (free text, unique within the year).
    pub name: String,
    /// Fiscal year the group belongs to.
    pub year: i32,
}

/// One revision of the budget ceilings for a (cost group, year) pair.
///
/// Revisions are append-only. Revising posts a new record with
/// `supersedes` pointing at the previous one; the latest revision is
/// authoritative for headroom checks, prior revisions are retained for
/// audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation ID.
    pub id: AllocationId,
    /// Cost group this allocation budgets.
    pub cost_group_id: CostGroupId,
    /// Fiscal year.
    pub year: i32,
    /// CAPEX ceiling in USD.
    pub capex_ceiling: Decimal,
    /// OPEX ceiling in USD.
    pub opex_ceiling: Decimal,
    /// 1-based revision number, increasing per (cost group, year).
    pub revision: u32,
    /// Previous revision in the chain, if any.
    pub supersedes: Option<AllocationId>,
    /// Date the revision was recorded.
    pub created_on: NaiveDate,
}

impl Allocation {
    /// Ceiling for the given cost type.
    #[must_use]
    pub fn ceiling_for(&self, cost_type: CostType) -> Decimal {
        match cost_type {
            CostType::Capex => self.capex_ceiling,
            CostType::Opex => self.opex_ceiling,
        }
    }
}

/// Input for publishing the first allocation of a cost group and year.
#[derive(Debug, Clone)]
pub struct NewAllocationInput {
    /// Cost group name (registered on first use).
    pub cost_group: String,
    /// Fiscal year.
    pub year: i32,
    /// CAPEX ceiling in USD.
    pub capex_ceiling: Decimal,
    /// OPEX ceiling in USD.
    pub opex_ceiling: Decimal,
}

/// Input for revising an existing allocation chain.
///
/// `allocation_id` names the revision the caller last read; it doubles
/// as the optimistic-concurrency token.
#[derive(Debug, Clone)]
pub struct ReviseAllocationInput {
    /// The revision being superseded.
    pub allocation_id: AllocationId,
    /// New CAPEX ceiling; `None` carries the current value over.
    pub new_capex_ceiling: Option<Decimal>,
    /// New OPEX ceiling; `None` carries the current value over.
    pub new_opex_ceiling: Option<Decimal>,
}
