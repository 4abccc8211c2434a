//! Dashboard data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spendhub_shared::types::{CommitmentId, Currency};

/// Dashboard overview response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOverview {
    /// Budget position for the year.
    pub budget: BudgetSummary,
    /// Renewals due within the configured window.
    pub upcoming_renewals: Vec<UpcomingRenewalItem>,
}

/// Year-level budget position across all cost groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Fiscal year.
    pub year: i32,
    /// Sum of current CAPEX ceilings.
    pub total_capex_allocated: Decimal,
    /// CAPEX committed plus paid, net of reversals.
    pub total_capex_used: Decimal,
    /// Sum of current OPEX ceilings.
    pub total_opex_allocated: Decimal,
    /// OPEX committed plus paid, net of reversals.
    pub total_opex_used: Decimal,
    /// Rounded CAPEX used/allocated percentage.
    pub capex_utilization_percent: i64,
    /// Rounded OPEX used/allocated percentage.
    pub opex_utilization_percent: i64,
    /// Per-month spend series for the burn chart.
    pub monthly_burn: Vec<MonthlyBurn>,
}

/// One calendar month of recognized spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBurn {
    /// Calendar month, 1 through 12.
    pub month: u32,
    /// CAPEX spend dated in the month.
    pub capex_used: Decimal,
    /// OPEX spend dated in the month.
    pub opex_used: Decimal,
}

/// A commitment renewing soon, as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingRenewalItem {
    /// Commitment identifier.
    pub id: CommitmentId,
    /// Asset or service name.
    pub asset_name: String,
    /// Date the renewal is due.
    pub renewal_date: NaiveDate,
    /// Estimated renewal cost in the local currency.
    pub cost_estimate_local: Option<Decimal>,
    /// Currency of the cost estimate.
    pub currency_local: Option<Currency>,
}
