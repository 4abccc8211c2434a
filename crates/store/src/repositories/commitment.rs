//! Commitment repository: renewal scheduling over the commitment ledger.

use std::sync::Arc;

use tracing::info;

use spendhub_core::renewal::{
    NewCommitmentInput, RenewalError, RenewalService, ServiceCommitment,
};
use spendhub_shared::types::{CommitmentId, PurchaseOrderId, TransactionId};

use crate::SpendStore;

/// Repository for service commitments.
#[derive(Debug, Clone)]
pub struct CommitmentRepository {
    store: Arc<SpendStore>,
}

impl CommitmentRepository {
    /// Creates a new commitment repository.
    #[must_use]
    pub fn new(store: Arc<SpendStore>) -> Self {
        Self { store }
    }

    /// Registers a commitment, starting its first cycle at PLANNED.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::InvalidCommitment` for a malformed input.
    pub fn create(&self, input: NewCommitmentInput) -> Result<ServiceCommitment, RenewalError> {
        let today = self.store.today();
        let commitment = RenewalService::create(input, today)?;

        let mut state = self.store.write();
        state.commitments.push(commitment.clone());
        info!(
            commitment_id = %commitment.id,
            asset = %commitment.asset_name,
            next_renewal = %commitment.next_renewal_date,
            "Service commitment registered"
        );
        Ok(commitment)
    }

    /// Fetches one commitment.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::NotFound` for an unknown id.
    pub fn get(&self, commitment_id: CommitmentId) -> Result<ServiceCommitment, RenewalError> {
        self.store
            .read()
            .commitments
            .iter()
            .find(|c| c.id == commitment_id)
            .cloned()
            .ok_or(RenewalError::NotFound(commitment_id))
    }

    /// All commitments, active and retired.
    #[must_use]
    pub fn list(&self) -> Vec<ServiceCommitment> {
        self.store.read().commitments.clone()
    }

    /// Active commitments renewing within the window, ascending by date
    /// with ties broken by id. The returned iterator can be walked more
    /// than once.
    #[must_use]
    pub fn upcoming(&self, within_days: u32) -> std::vec::IntoIter<ServiceCommitment> {
        let today = self.store.today();
        let state = self.store.read();
        RenewalService::upcoming(&state.commitments, today, within_days)
    }

    /// Marks the current cycle's renewal as scheduled.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::NotFound` or `RenewalError::Inactive`.
    pub fn schedule(&self, commitment_id: CommitmentId) -> Result<ServiceCommitment, RenewalError> {
        self.apply(commitment_id, "scheduled", RenewalService::schedule)
    }

    /// Completes the current cycle: links the resulting PO/transaction,
    /// advances the renewal date one billing cycle, resets to PLANNED.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::NotFound`, `Inactive`, or `DateOutOfRange`.
    pub fn mark_renewed(
        &self,
        commitment_id: CommitmentId,
        po_id: Option<PurchaseOrderId>,
        transaction_id: Option<TransactionId>,
    ) -> Result<ServiceCommitment, RenewalError> {
        self.apply(commitment_id, "renewed", |c| {
            RenewalService::mark_renewed(c, po_id, transaction_id)
        })
    }

    /// Pushes the renewal date forward by whole billing cycles.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::NotFound`, `Inactive`,
    /// `InvalidPostponement`, or `DateOutOfRange`.
    pub fn postpone(
        &self,
        commitment_id: CommitmentId,
        periods: i32,
    ) -> Result<ServiceCommitment, RenewalError> {
        self.apply(commitment_id, "postponed", |c| {
            RenewalService::postpone(c, periods)
        })
    }

    /// Retires a commitment. Never deleted, only flagged inactive.
    ///
    /// # Errors
    ///
    /// Returns `RenewalError::NotFound` for an unknown id.
    pub fn deactivate(
        &self,
        commitment_id: CommitmentId,
    ) -> Result<ServiceCommitment, RenewalError> {
        self.apply(commitment_id, "retired", |c| {
            Ok(RenewalService::deactivate(c))
        })
    }

    /// Applies a renewal operation and stores the updated record.
    fn apply(
        &self,
        commitment_id: CommitmentId,
        what: &'static str,
        operation: impl FnOnce(&ServiceCommitment) -> Result<ServiceCommitment, RenewalError>,
    ) -> Result<ServiceCommitment, RenewalError> {
        let mut state = self.store.write();
        let index = state
            .commitments
            .iter()
            .position(|c| c.id == commitment_id)
            .ok_or(RenewalError::NotFound(commitment_id))?;

        let updated = operation(&state.commitments[index])?;
        state.commitments[index] = updated.clone();
        info!(
            commitment_id = %commitment_id,
            next_renewal = %updated.next_renewal_date,
            status = %updated.renewal_status,
            operation = what,
            "Service commitment updated"
        );
        Ok(updated)
    }
}
