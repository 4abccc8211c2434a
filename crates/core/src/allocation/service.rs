//! Allocation service: revision chains and headroom math.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use spendhub_shared::types::{AllocationId, CostGroupId};

use super::error::AllocationError;
use super::types::{Allocation, CostType};

/// Allocation business logic.
pub struct AllocationService;

impl AllocationService {
    /// Validates a pair of budget ceilings.
    ///
    /// Zero is allowed: a group may carry budget on only one side.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` if either ceiling is
    /// negative.
    pub fn validate_ceilings(
        capex_ceiling: Decimal,
        opex_ceiling: Decimal,
    ) -> Result<(), AllocationError> {
        if capex_ceiling < Decimal::ZERO {
            return Err(AllocationError::InvalidAmount {
                field: "capex_ceiling",
                amount: capex_ceiling,
            });
        }
        if opex_ceiling < Decimal::ZERO {
            return Err(AllocationError::InvalidAmount {
                field: "opex_ceiling",
                amount: opex_ceiling,
            });
        }
        Ok(())
    }

    /// Builds revision 1 of a new allocation chain.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` for negative ceilings.
    pub fn first_revision(
        cost_group_id: CostGroupId,
        year: i32,
        capex_ceiling: Decimal,
        opex_ceiling: Decimal,
        created_on: NaiveDate,
    ) -> Result<Allocation, AllocationError> {
        Self::validate_ceilings(capex_ceiling, opex_ceiling)?;

        Ok(Allocation {
            id: AllocationId::new(),
            cost_group_id,
            year,
            capex_ceiling,
            opex_ceiling,
            revision: 1,
            supersedes: None,
            created_on,
        })
    }

    /// Builds the next revision superseding `current`.
    ///
    /// Omitted ceilings carry over from the superseded revision.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` for negative ceilings.
    pub fn next_revision(
        current: &Allocation,
        new_capex_ceiling: Option<Decimal>,
        new_opex_ceiling: Option<Decimal>,
        created_on: NaiveDate,
    ) -> Result<Allocation, AllocationError> {
        let capex_ceiling = new_capex_ceiling.unwrap_or(current.capex_ceiling);
        let opex_ceiling = new_opex_ceiling.unwrap_or(current.opex_ceiling);
        Self::validate_ceilings(capex_ceiling, opex_ceiling)?;

        Ok(Allocation {
            id: AllocationId::new(),
            cost_group_id: current.cost_group_id,
            year: current.year,
            capex_ceiling,
            opex_ceiling,
            revision: current.revision + 1,
            supersedes: Some(current.id),
            created_on,
        })
    }

    /// Remaining room under one ceiling.
    ///
    /// Negative when spend already exceeds the ceiling; the value is
    /// surfaced as-is, never clamped.
    #[must_use]
    pub fn headroom(allocation: &Allocation, cost_type: CostType, used: Decimal) -> Decimal {
        allocation.ceiling_for(cost_type) - used
    }
}
