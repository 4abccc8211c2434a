//! Dashboard projection over the allocation, transaction, and commitment
//! ledgers.
//!
//! Pure aggregation; the store hands this service the current state and
//! the caller's window.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::allocation::{Allocation, CostType};
use crate::currency::utilization_percent;
use crate::ledger::SpendTransaction;
use crate::renewal::{RenewalService, ServiceCommitment};

use super::types::{BudgetSummary, DashboardOverview, MonthlyBurn, UpcomingRenewalItem};

/// Stateless service computing the dashboard projection.
pub struct DashboardService;

impl DashboardService {
    /// Builds the full overview: budget position plus upcoming renewals.
    #[must_use]
    pub fn overview(
        allocations: &[Allocation],
        transactions: &[SpendTransaction],
        commitments: &[ServiceCommitment],
        year: i32,
        today: NaiveDate,
        within_days: u32,
    ) -> DashboardOverview {
        DashboardOverview {
            budget: Self::budget_summary(allocations, transactions, year),
            upcoming_renewals: Self::upcoming_renewals(commitments, today, within_days),
        }
    }

    /// Aggregates current ceilings and recognized spend for a year.
    ///
    /// `allocations` must contain only current revisions; superseded ones
    /// would double-count their ceilings.
    #[must_use]
    pub fn budget_summary(
        allocations: &[Allocation],
        transactions: &[SpendTransaction],
        year: i32,
    ) -> BudgetSummary {
        let mut total_capex_allocated = Decimal::ZERO;
        let mut total_opex_allocated = Decimal::ZERO;
        for allocation in allocations.iter().filter(|a| a.year == year) {
            total_capex_allocated += allocation.capex_ceiling;
            total_opex_allocated += allocation.opex_ceiling;
        }

        let total_capex_used = Self::used_for(transactions, year, CostType::Capex);
        let total_opex_used = Self::used_for(transactions, year, CostType::Opex);

        BudgetSummary {
            year,
            total_capex_allocated,
            total_capex_used,
            total_opex_allocated,
            total_opex_used,
            capex_utilization_percent: utilization_percent(
                total_capex_used,
                total_capex_allocated,
            ),
            opex_utilization_percent: utilization_percent(total_opex_used, total_opex_allocated),
            monthly_burn: Self::monthly_burn(transactions, year),
        }
    }

    /// Per-month recognized spend for the burn chart; only months with
    /// spend appear, ascending. Reversals subtract in the month they are
    /// dated.
    #[must_use]
    pub fn monthly_burn(transactions: &[SpendTransaction], year: i32) -> Vec<MonthlyBurn> {
        let mut by_month: BTreeMap<u32, (Decimal, Decimal)> = BTreeMap::new();

        for txn in transactions
            .iter()
            .filter(|t| t.year() == year && t.status.counts_against_ceiling())
        {
            let signed = if txn.is_reversal() {
                -txn.amount_usd
            } else {
                txn.amount_usd
            };
            let entry = by_month.entry(txn.date.month()).or_default();
            match txn.cost_type {
                CostType::Capex => entry.0 += signed,
                CostType::Opex => entry.1 += signed,
            }
        }

        by_month
            .into_iter()
            .map(|(month, (capex_used, opex_used))| MonthlyBurn {
                month,
                capex_used,
                opex_used,
            })
            .collect()
    }

    /// Renewals due within the window, in the order the renewal ledger
    /// yields them.
    #[must_use]
    pub fn upcoming_renewals(
        commitments: &[ServiceCommitment],
        today: NaiveDate,
        within_days: u32,
    ) -> Vec<UpcomingRenewalItem> {
        RenewalService::upcoming(commitments, today, within_days)
            .map(|c| UpcomingRenewalItem {
                id: c.id,
                asset_name: c.asset_name,
                renewal_date: c.next_renewal_date,
                cost_estimate_local: c.cost_estimate_local,
                currency_local: c.currency_local,
            })
            .collect()
    }

    fn used_for(transactions: &[SpendTransaction], year: i32, cost_type: CostType) -> Decimal {
        transactions
            .iter()
            .filter(|t| {
                t.year() == year && t.cost_type == cost_type && t.status.counts_against_ceiling()
            })
            .map(|t| {
                if t.is_reversal() {
                    -t.amount_usd
                } else {
                    t.amount_usd
                }
            })
            .sum()
    }
}
