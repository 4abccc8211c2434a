//! Dashboard repository: read-only projection over the other ledgers.

use std::sync::Arc;

use spendhub_core::dashboard::{DashboardOverview, DashboardService};

use crate::SpendStore;

/// Repository for the dashboard projection.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    store: Arc<SpendStore>,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub fn new(store: Arc<SpendStore>) -> Self {
        Self { store }
    }

    /// Budget position plus upcoming renewals, computed over a single
    /// consistent snapshot of the store.
    #[must_use]
    pub fn overview(&self, year: i32, within_days: u32) -> DashboardOverview {
        let today = self.store.today();
        let state = self.store.read();

        let allocations = state.current_allocations_for_year(year);
        DashboardService::overview(
            &allocations,
            &state.transactions,
            &state.commitments,
            year,
            today,
            within_days,
        )
    }
}
