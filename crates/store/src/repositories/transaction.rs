//! Transaction repository: posting spend and advancing its status.

use std::sync::Arc;

use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::{info, warn};

use spendhub_core::allocation::{AllocationError, AllocationService, CostType};
use spendhub_core::ledger::{LedgerError, LedgerService, PostTransactionInput, SpendStatus, SpendTransaction};
use spendhub_shared::types::TransactionId;

use crate::state::StoreState;
use crate::SpendStore;

/// Repository for the spend ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    store: Arc<SpendStore>,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub fn new(store: Arc<SpendStore>) -> Self {
        Self { store }
    }

    /// Posts a new ledger entry.
    ///
    /// BUDGETED entries reserve nothing and need no allocation. COMMITTED
    /// and PAID entries are checked against the current allocation's
    /// headroom; `override_budget` turns the rejection into a permitted,
    /// recorded, and logged over-commitment. A rejected post leaves the
    /// ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` for a non-positive amount,
    /// `AllocationError::NoCurrentAllocation` (wrapped) when recognized
    /// spend has no ceiling to check against, or
    /// `LedgerError::BudgetExceeded` when the post would drive headroom
    /// negative without an override.
    pub fn post(&self, input: PostTransactionInput) -> Result<SpendTransaction, LedgerError> {
        LedgerService::validate_amount(input.amount_usd)?;

        let year = input.date.year();
        let mut state = self.store.write();

        let group_id = state.register_group(&input.cost_group, year);
        if input.status.counts_against_ceiling() {
            Self::check_ceiling(
                &state,
                &input.cost_group,
                year,
                input.cost_type,
                input.amount_usd,
                input.override_budget,
            )?;
        }

        let transaction = SpendTransaction {
            id: TransactionId::new(),
            cost_group_id: group_id,
            cost_type: input.cost_type,
            amount_usd: input.amount_usd,
            date: input.date,
            status: input.status,
            description: input.description,
            commitment_id: input.commitment_id,
            purchase_order_id: input.purchase_order_id,
            reverses: None,
            budget_override: input.override_budget,
        };
        state.transactions.push(transaction.clone());
        info!(
            transaction_id = %transaction.id,
            cost_group = %input.cost_group,
            cost_type = %input.cost_type,
            amount_usd = %input.amount_usd,
            status = %input.status,
            "Transaction posted"
        );
        Ok(transaction)
    }

    /// Advances a transaction one step along BUDGETED → COMMITTED → PAID.
    ///
    /// Entering COMMITTED is the moment the amount starts counting against
    /// the ceiling, so that edge re-runs the headroom check with the same
    /// override escape hatch. A rejected advance leaves the stored status
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound`, `LedgerError::InvalidTransition`,
    /// or `LedgerError::BudgetExceeded`.
    pub fn advance_status(
        &self,
        transaction_id: TransactionId,
        new_status: SpendStatus,
        override_budget: bool,
    ) -> Result<SpendTransaction, LedgerError> {
        let mut state = self.store.write();

        let index = state
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or(LedgerError::NotFound(transaction_id))?;
        let current = state.transactions[index].clone();

        let advanced = LedgerService::advance(current.status, new_status)?;
        if !current.status.counts_against_ceiling() && advanced.counts_against_ceiling() {
            let group_name = state
                .cost_groups
                .iter()
                .find(|g| g.id == current.cost_group_id)
                .map_or_else(String::new, |g| g.name.clone());
            Self::check_ceiling(
                &state,
                &group_name,
                current.year(),
                current.cost_type,
                current.amount_usd,
                override_budget,
            )?;
        }

        let transaction = &mut state.transactions[index];
        transaction.status = advanced;
        if override_budget {
            transaction.budget_override = true;
        }
        let updated = transaction.clone();
        info!(
            transaction_id = %transaction_id,
            from = %current.status,
            to = %advanced,
            "Transaction status advanced"
        );
        Ok(updated)
    }

    /// Fetches one transaction.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown id.
    pub fn get(&self, transaction_id: TransactionId) -> Result<SpendTransaction, LedgerError> {
        self.store
            .read()
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or(LedgerError::NotFound(transaction_id))
    }

    /// Transactions matching the filters, newest first (date, then id,
    /// descending). An unknown cost group simply yields nothing.
    #[must_use]
    pub fn list(&self, cost_group: Option<&str>, year: Option<i32>) -> Vec<SpendTransaction> {
        let state = self.store.read();
        let name = cost_group.map(str::trim);

        let mut hits: Vec<SpendTransaction> = state
            .transactions
            .iter()
            .filter(|t| year.is_none_or(|y| t.year() == y))
            .filter(|t| {
                name.is_none_or(|n| {
                    state
                        .cost_groups
                        .iter()
                        .any(|g| g.id == t.cost_group_id && g.name == n)
                })
            })
            .cloned()
            .collect();
        hits.sort_by_key(|t| (t.date, t.id));
        hits.reverse();
        hits
    }

    /// COMMITTED plus PAID spend for one ceiling, net of reversals.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::CostGroupNotFound` (wrapped) for an
    /// unknown group.
    pub fn total_used(
        &self,
        cost_group: &str,
        year: i32,
        cost_type: CostType,
    ) -> Result<Decimal, LedgerError> {
        let state = self.store.read();
        let group = state.find_group(cost_group.trim(), year).ok_or_else(|| {
            AllocationError::CostGroupNotFound {
                cost_group: cost_group.to_string(),
                year,
            }
        })?;
        Ok(state.used(group.id, year, cost_type))
    }

    /// Headroom check shared by `post`, the BUDGETED → COMMITTED edge,
    /// and purchase order approval. Over-commitments permitted by an
    /// override are logged at `warn` as the audit trail.
    pub(crate) fn check_ceiling(
        state: &StoreState,
        cost_group: &str,
        year: i32,
        cost_type: CostType,
        amount: Decimal,
        override_budget: bool,
    ) -> Result<(), LedgerError> {
        let group = state.find_group(cost_group.trim(), year).ok_or_else(|| {
            AllocationError::NoCurrentAllocation {
                cost_group: cost_group.to_string(),
                year,
            }
        })?;
        let allocation = state.current_allocation(group.id, year).ok_or_else(|| {
            AllocationError::NoCurrentAllocation {
                cost_group: cost_group.to_string(),
                year,
            }
        })?;

        let used = state.used(group.id, year, cost_type);
        LedgerService::check_headroom(
            allocation,
            cost_group,
            cost_type,
            used,
            amount,
            override_budget,
        )?;

        let headroom = AllocationService::headroom(allocation, cost_type, used);
        if amount > headroom {
            warn!(
                cost_group = %cost_group,
                year,
                cost_type = %cost_type,
                headroom = %headroom,
                amount = %amount,
                "Budget ceiling exceeded with explicit override"
            );
        }
        Ok(())
    }
}
