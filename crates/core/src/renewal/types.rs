//! Service commitment types for recurring spend and renewal tracking.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spendhub_shared::types::{CommitmentId, Currency, PurchaseOrderId, TransactionId};

/// How often a commitment bills and renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingFrequency {
    /// Bills every month.
    Monthly,
    /// Bills every three months.
    Quarterly,
    /// Bills once a year.
    Annual,
    /// Bills every two years.
    Biennial,
}

impl BillingFrequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Annual => "ANNUAL",
            Self::Biennial => "BIENNIAL",
        }
    }

    /// Parses a billing frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MONTHLY" => Some(Self::Monthly),
            "QUARTERLY" => Some(Self::Quarterly),
            "ANNUAL" => Some(Self::Annual),
            "BIENNIAL" => Some(Self::Biennial),
            _ => None,
        }
    }

    /// Calendar months in one billing cycle.
    #[must_use]
    pub const fn months_per_cycle(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annual => 12,
            Self::Biennial => 24,
        }
    }
}

impl std::fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of recurring obligation the commitment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitmentType {
    /// Software licenses or subscriptions.
    License,
    /// Outsourced managed services.
    ManagedService,
    /// Hardware or software maintenance contracts.
    Maintenance,
    /// Anything else.
    Other,
}

impl CommitmentType {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::License => "LICENSE",
            Self::ManagedService => "MANAGED_SERVICE",
            Self::Maintenance => "MAINTENANCE",
            Self::Other => "OTHER",
        }
    }

    /// Parses a commitment type from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LICENSE" => Some(Self::License),
            "MANAGED_SERVICE" => Some(Self::ManagedService),
            "MAINTENANCE" => Some(Self::Maintenance),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommitmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a commitment stands in its current billing cycle.
///
/// RENEWED is a cycle boundary, not a terminal state: `mark_renewed`
/// advances the renewal date and immediately resets to PLANNED for the
/// next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenewalStatus {
    /// Renewal is expected but nothing has been arranged yet.
    Planned,
    /// Renewal has been scheduled with the vendor.
    Scheduled,
    /// Renewal completed for the current cycle.
    Renewed,
}

impl RenewalStatus {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::Scheduled => "SCHEDULED",
            Self::Renewed => "RENEWED",
        }
    }

    /// Parses a renewal status from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PLANNED" => Some(Self::Planned),
            "SCHEDULED" => Some(Self::Scheduled),
            "RENEWED" => Some(Self::Renewed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RenewalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring service obligation with a renewal schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCommitment {
    /// Unique identifier.
    pub id: CommitmentId,
    /// Asset or service the commitment covers.
    pub asset_name: String,
    /// Kind of obligation.
    pub commitment_type: CommitmentType,
    /// Vendor providing the service.
    pub vendor: String,
    /// Cost group charged for renewals.
    pub cost_group: String,
    /// Billing cadence.
    pub billing_frequency: BillingFrequency,
    /// Next date the commitment comes up for renewal.
    pub next_renewal_date: NaiveDate,
    /// Where the current cycle stands.
    pub renewal_status: RenewalStatus,
    /// Estimated renewal cost in the local currency, for the dashboard.
    pub cost_estimate_local: Option<Decimal>,
    /// Currency of the cost estimate.
    pub currency_local: Option<Currency>,
    /// Purchase order produced by the most recent renewal.
    pub last_po_id: Option<PurchaseOrderId>,
    /// Ledger transaction produced by the most recent renewal.
    pub last_transaction_id: Option<TransactionId>,
    /// Inactive commitments are retired and take no further operations.
    pub active: bool,
    /// Date the commitment was registered.
    pub created_on: NaiveDate,
}

/// Input for registering a new service commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommitmentInput {
    /// Asset or service the commitment covers.
    pub asset_name: String,
    /// Kind of obligation.
    pub commitment_type: CommitmentType,
    /// Vendor providing the service.
    pub vendor: String,
    /// Cost group charged for renewals.
    pub cost_group: String,
    /// Billing cadence.
    pub billing_frequency: BillingFrequency,
    /// First renewal date; must not be in the past.
    pub next_renewal_date: NaiveDate,
    /// Estimated renewal cost in the local currency.
    pub cost_estimate_local: Option<Decimal>,
    /// Currency of the cost estimate.
    pub currency_local: Option<Currency>,
}
