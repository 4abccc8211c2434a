//! Ledger service: amount validation, headroom checks, and the spend
//! status machine.

use rust_decimal::Decimal;

use spendhub_shared::types::CostGroupId;

use crate::allocation::{Allocation, AllocationService, CostType};

use super::error::LedgerError;
use super::types::{SpendStatus, SpendTransaction};

/// Spend ledger business logic.
///
/// All methods are associated functions over plain data; persistence and
/// locking live in the store crate.
pub struct LedgerService;

impl LedgerService {
    /// Validates a transaction amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` unless the amount is strictly
    /// positive. Reversing entries carry the positive original amount and
    /// subtract by construction, so negative amounts never enter the ledger.
    pub fn validate_amount(amount_usd: Decimal) -> Result<(), LedgerError> {
        if amount_usd <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount: amount_usd });
        }
        Ok(())
    }

    /// Sum of COMMITTED and PAID amounts for one ceiling, net of reversals.
    ///
    /// BUDGETED entries and entries for other groups, years, or cost types
    /// are ignored.
    #[must_use]
    pub fn total_used(
        transactions: &[SpendTransaction],
        cost_group_id: CostGroupId,
        year: i32,
        cost_type: CostType,
    ) -> Decimal {
        transactions
            .iter()
            .filter(|txn| {
                txn.cost_group_id == cost_group_id
                    && txn.year() == year
                    && txn.cost_type == cost_type
                    && txn.status.counts_against_ceiling()
            })
            .map(|txn| {
                if txn.is_reversal() {
                    -txn.amount_usd
                } else {
                    txn.amount_usd
                }
            })
            .sum()
    }

    /// Checks whether posting `amount` would exceed the allocation ceiling.
    ///
    /// `override_budget` turns the rejection into a permitted post; the
    /// caller records the flag on the transaction and logs it.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::BudgetExceeded` when the post would drive
    /// headroom negative and no override accompanies it.
    pub fn check_headroom(
        allocation: &Allocation,
        cost_group: &str,
        cost_type: CostType,
        used: Decimal,
        amount: Decimal,
        override_budget: bool,
    ) -> Result<(), LedgerError> {
        let headroom = AllocationService::headroom(allocation, cost_type, used);
        if amount > headroom && !override_budget {
            return Err(LedgerError::BudgetExceeded {
                cost_group: cost_group.to_string(),
                year: allocation.year,
                cost_type,
                headroom,
                attempted: amount,
            });
        }
        Ok(())
    }

    /// Advances a transaction status by one step.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidTransition` for any move the table does
    /// not allow, including the skip from BUDGETED straight to PAID.
    pub fn advance(current: SpendStatus, new_status: SpendStatus) -> Result<SpendStatus, LedgerError> {
        if !Self::is_valid_transition(current, new_status) {
            return Err(LedgerError::InvalidTransition {
                from: current,
                to: new_status,
            });
        }
        Ok(new_status)
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Budgeted → Committed
    /// - Committed → Paid
    #[must_use]
    pub fn is_valid_transition(from: SpendStatus, to: SpendStatus) -> bool {
        matches!(
            (from, to),
            (SpendStatus::Budgeted, SpendStatus::Committed)
                | (SpendStatus::Committed, SpendStatus::Paid)
        )
    }
}
