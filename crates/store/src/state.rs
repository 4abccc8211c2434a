//! Store state: the owned-by-service replacement for per-page arrays.

use std::collections::HashMap;

use rust_decimal::Decimal;

use spendhub_core::allocation::{Allocation, CostGroup, CostType};
use spendhub_core::ledger::{LedgerService, SpendTransaction};
use spendhub_core::procurement::PurchaseOrder;
use spendhub_core::renewal::ServiceCommitment;
use spendhub_shared::types::{AllocationId, CostGroupId};

/// All ledgers in one place, guarded by the store's lock.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    /// Cost groups, registered implicitly on first reference.
    pub cost_groups: Vec<CostGroup>,
    /// Every allocation revision ever published, append-only.
    pub allocations: Vec<Allocation>,
    /// Current revision per (cost group, year).
    pub current_allocations: HashMap<(CostGroupId, i32), AllocationId>,
    /// Spend transactions, append-only apart from status advances.
    pub transactions: Vec<SpendTransaction>,
    /// Purchase orders; drafts may be hard-deleted.
    pub purchase_orders: Vec<PurchaseOrder>,
    /// Service commitments; retired ones stay, flagged inactive.
    pub commitments: Vec<ServiceCommitment>,
}

impl StoreState {
    /// Looks up a cost group by name within a year.
    pub fn find_group(&self, name: &str, year: i32) -> Option<&CostGroup> {
        self.cost_groups
            .iter()
            .find(|g| g.year == year && g.name == name)
    }

    /// Returns the group's id, registering the group on first use.
    /// Names are unique per year; the stored name keeps the caller's
    /// trimmed spelling.
    pub fn register_group(&mut self, name: &str, year: i32) -> CostGroupId {
        let name = name.trim();
        if let Some(group) = self.find_group(name, year) {
            return group.id;
        }
        let group = CostGroup {
            id: CostGroupId::new(),
            name: name.to_string(),
            year,
        };
        let id = group.id;
        self.cost_groups.push(group);
        id
    }

    /// Current allocation revision for a (cost group, year), if one was
    /// ever published.
    pub fn current_allocation(&self, cost_group_id: CostGroupId, year: i32) -> Option<&Allocation> {
        let id = self.current_allocations.get(&(cost_group_id, year))?;
        self.allocations.iter().find(|a| a.id == *id)
    }

    /// COMMITTED plus PAID spend for one ceiling, net of reversals.
    pub fn used(&self, cost_group_id: CostGroupId, year: i32, cost_type: CostType) -> Decimal {
        LedgerService::total_used(&self.transactions, cost_group_id, year, cost_type)
    }

    /// Current allocation revisions for a year, in registration order.
    pub fn current_allocations_for_year(&self, year: i32) -> Vec<Allocation> {
        self.cost_groups
            .iter()
            .filter(|g| g.year == year)
            .filter_map(|g| self.current_allocation(g.id, year))
            .cloned()
            .collect()
    }
}
