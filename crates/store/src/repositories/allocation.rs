//! Allocation repository: revision chains and headroom queries.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use spendhub_core::allocation::{
    Allocation, AllocationError, AllocationService, CostGroup, CostType, NewAllocationInput,
    ReviseAllocationInput,
};
use spendhub_shared::types::AllocationId;

use crate::SpendStore;

/// Repository for budget allocations.
#[derive(Debug, Clone)]
pub struct AllocationRepository {
    store: Arc<SpendStore>,
}

impl AllocationRepository {
    /// Creates a new allocation repository.
    #[must_use]
    pub fn new(store: Arc<SpendStore>) -> Self {
        Self { store }
    }

    /// Publishes revision 1 of an allocation chain, registering the cost
    /// group on first use.
    ///
    /// With `revise` set, an existing chain is revised in place of the
    /// duplicate rejection: the new ceilings supersede the current
    /// revision.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::InvalidAmount` for negative ceilings and
    /// `AllocationError::DuplicateAllocation` when a chain already exists
    /// for the (cost group, year) and `revise` was not requested.
    pub fn create(
        &self,
        input: NewAllocationInput,
        revise: bool,
    ) -> Result<Allocation, AllocationError> {
        // Validate before touching state so a rejection mutates nothing.
        AllocationService::validate_ceilings(input.capex_ceiling, input.opex_ceiling)?;

        let today = self.store.today();
        let mut state = self.store.write();

        let group_id = state.register_group(&input.cost_group, input.year);
        if let Some(current) = state.current_allocation(group_id, input.year) {
            if !revise {
                return Err(AllocationError::DuplicateAllocation {
                    cost_group: input.cost_group,
                    year: input.year,
                });
            }
            let next = AllocationService::next_revision(
                current,
                Some(input.capex_ceiling),
                Some(input.opex_ceiling),
                today,
            )?;
            state
                .current_allocations
                .insert((group_id, input.year), next.id);
            state.allocations.push(next.clone());
            info!(
                allocation_id = %next.id,
                cost_group = %input.cost_group,
                year = input.year,
                revision = next.revision,
                "Allocation revised"
            );
            return Ok(next);
        }

        let allocation = AllocationService::first_revision(
            group_id,
            input.year,
            input.capex_ceiling,
            input.opex_ceiling,
            today,
        )?;
        state
            .current_allocations
            .insert((group_id, input.year), allocation.id);
        state.allocations.push(allocation.clone());
        info!(
            allocation_id = %allocation.id,
            cost_group = %input.cost_group,
            year = input.year,
            "Allocation created"
        );
        Ok(allocation)
    }

    /// Revises an existing chain. The targeted revision must be current;
    /// a superseded id fails with `StaleWrite` carrying the current one,
    /// so the caller can re-fetch and reapply.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NotFound`, `AllocationError::StaleWrite`,
    /// or `AllocationError::InvalidAmount`.
    pub fn revise(&self, input: ReviseAllocationInput) -> Result<Allocation, AllocationError> {
        let today = self.store.today();
        let mut state = self.store.write();

        let current = state
            .allocations
            .iter()
            .find(|a| a.id == input.allocation_id)
            .ok_or(AllocationError::NotFound(input.allocation_id))?;

        let current_id = state
            .current_allocations
            .get(&(current.cost_group_id, current.year))
            .copied()
            .ok_or(AllocationError::NotFound(input.allocation_id))?;
        if current_id != input.allocation_id {
            return Err(AllocationError::StaleWrite {
                allocation_id: input.allocation_id,
                current_revision: current_id,
            });
        }

        let next = AllocationService::next_revision(
            current,
            input.new_capex_ceiling,
            input.new_opex_ceiling,
            today,
        )?;
        let key = (current.cost_group_id, current.year);
        state.current_allocations.insert(key, next.id);
        state.allocations.push(next.clone());
        info!(
            allocation_id = %next.id,
            supersedes = %input.allocation_id,
            revision = next.revision,
            "Allocation revised"
        );
        Ok(next)
    }

    /// Remaining ceiling for a (cost group, year, cost type). Negative
    /// when spend already exceeds the ceiling; never clamped.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::CostGroupNotFound` for an unknown group
    /// and `AllocationError::NoCurrentAllocation` when no chain was ever
    /// published for the year.
    pub fn headroom(
        &self,
        cost_group: &str,
        year: i32,
        cost_type: CostType,
    ) -> Result<Decimal, AllocationError> {
        let state = self.store.read();

        let group = state
            .find_group(cost_group.trim(), year)
            .ok_or_else(|| AllocationError::CostGroupNotFound {
                cost_group: cost_group.to_string(),
                year,
            })?;
        let allocation = state.current_allocation(group.id, year).ok_or_else(|| {
            AllocationError::NoCurrentAllocation {
                cost_group: cost_group.to_string(),
                year,
            }
        })?;

        let used = state.used(group.id, year, cost_type);
        Ok(AllocationService::headroom(allocation, cost_type, used))
    }

    /// Current revisions for a year.
    #[must_use]
    pub fn list_current(&self, year: i32) -> Vec<Allocation> {
        self.store.read().current_allocations_for_year(year)
    }

    /// Full revision chain for the allocation's (cost group, year),
    /// ascending by revision. Works from any revision in the chain.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::NotFound` for an unknown id.
    pub fn history(&self, allocation_id: AllocationId) -> Result<Vec<Allocation>, AllocationError> {
        let state = self.store.read();

        let member = state
            .allocations
            .iter()
            .find(|a| a.id == allocation_id)
            .ok_or(AllocationError::NotFound(allocation_id))?;

        let mut chain: Vec<Allocation> = state
            .allocations
            .iter()
            .filter(|a| a.cost_group_id == member.cost_group_id && a.year == member.year)
            .cloned()
            .collect();
        chain.sort_by_key(|a| a.revision);
        Ok(chain)
    }

    /// Cost groups registered for a year.
    #[must_use]
    pub fn list_cost_groups(&self, year: i32) -> Vec<CostGroup> {
        self.store
            .read()
            .cost_groups
            .iter()
            .filter(|g| g.year == year)
            .cloned()
            .collect()
    }
}
