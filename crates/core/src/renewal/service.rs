//! Renewal service for recurring service commitments.
//!
//! Commitments cycle PLANNED → SCHEDULED → renewed; completing a renewal
//! advances the next renewal date by one billing cycle and starts the next
//! cycle back at PLANNED. Dates only ever move forward.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use spendhub_shared::types::{CommitmentId, PurchaseOrderId, TransactionId};

use super::error::RenewalError;
use super::types::{BillingFrequency, NewCommitmentInput, RenewalStatus, ServiceCommitment};

/// Stateless service for commitment renewal operations.
pub struct RenewalService;

impl RenewalService {
    /// Registers a new commitment starting its first cycle at PLANNED.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::InvalidCommitment` when the asset name,
    /// vendor, or cost group is blank, the renewal date lies in the past,
    /// or the cost estimate is malformed.
    pub fn create(
        input: NewCommitmentInput,
        today: NaiveDate,
    ) -> Result<ServiceCommitment, RenewalError> {
        if input.asset_name.trim().is_empty() {
            return Err(RenewalError::InvalidCommitment {
                reason: "asset_name must not be empty".to_string(),
            });
        }
        if input.vendor.trim().is_empty() {
            return Err(RenewalError::InvalidCommitment {
                reason: "vendor must not be empty".to_string(),
            });
        }
        if input.cost_group.trim().is_empty() {
            return Err(RenewalError::InvalidCommitment {
                reason: "cost_group must not be empty".to_string(),
            });
        }
        if input.next_renewal_date < today {
            return Err(RenewalError::InvalidCommitment {
                reason: format!(
                    "next_renewal_date {} is before {}",
                    input.next_renewal_date, today
                ),
            });
        }
        if let Some(estimate) = input.cost_estimate_local {
            if estimate < Decimal::ZERO {
                return Err(RenewalError::InvalidCommitment {
                    reason: format!("cost_estimate_local must not be negative, got {estimate}"),
                });
            }
        }
        if input.cost_estimate_local.is_some() != input.currency_local.is_some() {
            return Err(RenewalError::InvalidCommitment {
                reason: "cost_estimate_local and currency_local must be provided together"
                    .to_string(),
            });
        }

        Ok(ServiceCommitment {
            id: CommitmentId::new(),
            asset_name: input.asset_name,
            commitment_type: input.commitment_type,
            vendor: input.vendor,
            cost_group: input.cost_group,
            billing_frequency: input.billing_frequency,
            next_renewal_date: input.next_renewal_date,
            renewal_status: RenewalStatus::Planned,
            cost_estimate_local: input.cost_estimate_local,
            currency_local: input.currency_local,
            last_po_id: None,
            last_transaction_id: None,
            active: true,
            created_on: today,
        })
    }

    /// Marks the current cycle's renewal as scheduled with the vendor.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::Inactive` for retired commitments.
    pub fn schedule(commitment: &ServiceCommitment) -> Result<ServiceCommitment, RenewalError> {
        Self::ensure_active(commitment)?;

        let mut updated = commitment.clone();
        updated.renewal_status = RenewalStatus::Scheduled;
        Ok(updated)
    }

    /// Completes the current cycle: records the links, advances the
    /// renewal date by one billing cycle, and resets to PLANNED.
    ///
    /// The link fields always reflect this renewal; passing `None` clears
    /// a link left over from the previous cycle.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::Inactive` for retired commitments or
    /// `RenewalError::DateOutOfRange` when the date cannot advance.
    pub fn mark_renewed(
        commitment: &ServiceCommitment,
        po_id: Option<PurchaseOrderId>,
        transaction_id: Option<TransactionId>,
    ) -> Result<ServiceCommitment, RenewalError> {
        Self::ensure_active(commitment)?;

        let next = Self::advance_date(
            commitment.next_renewal_date,
            commitment.billing_frequency,
            1,
        )?;

        let mut updated = commitment.clone();
        updated.next_renewal_date = next;
        updated.renewal_status = RenewalStatus::Planned;
        updated.last_po_id = po_id;
        updated.last_transaction_id = transaction_id;
        Ok(updated)
    }

    /// Pushes the renewal date forward by whole billing cycles and resets
    /// the cycle to PLANNED.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::InvalidPostponement` for non-positive
    /// periods, `RenewalError::Inactive` for retired commitments, or
    /// `RenewalError::DateOutOfRange` when the date cannot advance.
    pub fn postpone(
        commitment: &ServiceCommitment,
        periods: i32,
    ) -> Result<ServiceCommitment, RenewalError> {
        Self::ensure_active(commitment)?;

        let cycles =
            u32::try_from(periods).map_err(|_| RenewalError::InvalidPostponement { periods })?;
        if cycles == 0 {
            return Err(RenewalError::InvalidPostponement { periods });
        }

        let next = Self::advance_date(
            commitment.next_renewal_date,
            commitment.billing_frequency,
            cycles,
        )?;

        let mut updated = commitment.clone();
        updated.next_renewal_date = next;
        updated.renewal_status = RenewalStatus::Planned;
        Ok(updated)
    }

    /// Retires a commitment. Commitments are never deleted; inactive ones
    /// simply take no further renewal operations.
    #[must_use]
    pub fn deactivate(commitment: &ServiceCommitment) -> ServiceCommitment {
        let mut updated = commitment.clone();
        updated.active = false;
        updated
    }

    /// Advances a date by whole billing cycles. Month-end dates clamp to
    /// the shorter month (Jan 31 + 1 month = Feb 28).
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::DateOutOfRange` when the result would leave
    /// the supported calendar range.
    pub fn advance_date(
        date: NaiveDate,
        frequency: BillingFrequency,
        cycles: u32,
    ) -> Result<NaiveDate, RenewalError> {
        let months = frequency
            .months_per_cycle()
            .checked_mul(cycles)
            .ok_or(RenewalError::DateOutOfRange { date })?;
        date.checked_add_months(Months::new(months))
            .ok_or(RenewalError::DateOutOfRange { date })
    }

    /// Active commitments renewing within the window, ascending by date
    /// with ties broken by id. The returned iterator is cloneable, so the
    /// sequence can be walked more than once.
    #[must_use]
    pub fn upcoming(
        commitments: &[ServiceCommitment],
        today: NaiveDate,
        within_days: u32,
    ) -> std::vec::IntoIter<ServiceCommitment> {
        let end = today
            .checked_add_days(Days::new(u64::from(within_days)))
            .unwrap_or(NaiveDate::MAX);

        let mut hits: Vec<ServiceCommitment> = commitments
            .iter()
            .filter(|c| c.active && c.next_renewal_date >= today && c.next_renewal_date <= end)
            .cloned()
            .collect();
        hits.sort_by_key(|c| (c.next_renewal_date, c.id));
        hits.into_iter()
    }

    fn ensure_active(commitment: &ServiceCommitment) -> Result<(), RenewalError> {
        if !commitment.active {
            return Err(RenewalError::Inactive(commitment.id));
        }
        Ok(())
    }
}
