//! Purchase order repository: the approval workflow's write path.
//!
//! Approval and the committed-spend post happen under one write-lock
//! acquisition with validation up front, so a PO is never observably
//! approved without its transaction or vice versa.

use std::sync::Arc;

use chrono::Datelike;
use tracing::info;

use spendhub_core::ledger::{LedgerService, SpendStatus, SpendTransaction};
use spendhub_core::procurement::{
    CreatePurchaseOrderInput, LineItem, PoStatus, ProcurementError, ProcurementService,
    PurchaseOrder,
};
use spendhub_shared::types::{PurchaseOrderId, TransactionId};

use crate::SpendStore;

use super::transaction::TransactionRepository;

/// Repository for purchase orders.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    store: Arc<SpendStore>,
}

impl PurchaseOrderRepository {
    /// Creates a new purchase order repository.
    #[must_use]
    pub fn new(store: Arc<SpendStore>) -> Self {
        Self { store }
    }

    /// Drafts a new order.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::InvalidPurchaseOrder` for a malformed
    /// draft and `ProcurementError::DuplicatePoNumber` when the number is
    /// already taken.
    pub fn create(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<PurchaseOrder, ProcurementError> {
        let today = self.store.today();
        let mut state = self.store.write();

        if state
            .purchase_orders
            .iter()
            .any(|po| po.po_number == input.po_number)
        {
            return Err(ProcurementError::DuplicatePoNumber {
                po_number: input.po_number,
            });
        }

        let po = ProcurementService::create_draft(input, today)?;
        state.purchase_orders.push(po.clone());
        info!(po_id = %po.id, po_number = %po.po_number, "Purchase order drafted");
        Ok(po)
    }

    /// Fetches one order.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::NotFound` for an unknown id.
    pub fn get(&self, po_id: PurchaseOrderId) -> Result<PurchaseOrder, ProcurementError> {
        self.store
            .read()
            .purchase_orders
            .iter()
            .find(|po| po.id == po_id)
            .cloned()
            .ok_or(ProcurementError::NotFound(po_id))
    }

    /// Orders matching the status filter, newest draft first.
    #[must_use]
    pub fn list(&self, status: Option<PoStatus>) -> Vec<PurchaseOrder> {
        let state = self.store.read();
        let mut hits: Vec<PurchaseOrder> = state
            .purchase_orders
            .iter()
            .filter(|po| status.is_none_or(|s| po.status == s))
            .cloned()
            .collect();
        hits.sort_by_key(|po| (po.created_on, po.id));
        hits.reverse();
        hits
    }

    /// Replaces the line items of a DRAFT or REVISED order. Totals are
    /// never stored, so the new lines are reflected on the next read.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite` on a version mismatch and
    /// `ProcurementError::InvalidPurchaseOrder` for uneditable orders or
    /// malformed lines.
    pub fn update_line_items(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
        line_items: Vec<LineItem>,
    ) -> Result<PurchaseOrder, ProcurementError> {
        let mut state = self.store.write();
        let index = Self::position(&state.purchase_orders, po_id)?;
        {
            let po = &state.purchase_orders[index];
            ProcurementService::check_version(po, version)?;
            ProcurementService::ensure_editable(po)?;
            ProcurementService::validate_line_items(&line_items)?;
        }

        let po = &mut state.purchase_orders[index];
        po.line_items = line_items;
        po.version += 1;
        let updated = po.clone();
        info!(po_id = %po_id, version = updated.version, "Purchase order line items updated");
        Ok(updated)
    }

    /// Hard-deletes an order that is still DRAFT. Anything later is a
    /// status transition, not a deletion.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::NotFound` or
    /// `ProcurementError::InvalidPurchaseOrder`.
    pub fn delete_draft(&self, po_id: PurchaseOrderId) -> Result<(), ProcurementError> {
        let mut state = self.store.write();
        let index = Self::position(&state.purchase_orders, po_id)?;
        ProcurementService::ensure_deletable(&state.purchase_orders[index])?;

        state.purchase_orders.remove(index);
        info!(po_id = %po_id, "Draft purchase order deleted");
        Ok(())
    }

    /// DRAFT → PENDING_APPROVAL.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite`, `InvalidTransition`, or
    /// `InvalidPurchaseOrder` when the submit checks fail.
    pub fn submit(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
    ) -> Result<PurchaseOrder, ProcurementError> {
        self.transition(po_id, version, ProcurementService::submit)
    }

    /// PENDING_APPROVAL → APPROVED, atomically posting the committed-spend
    /// transaction. If the ledger rejects the post, the approval fails as
    /// a unit and the order stays PENDING_APPROVAL.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite`, `InvalidTransition`,
    /// `Currency` for a bad stored rate, or `Ledger` (including
    /// `BudgetExceeded`) when the post is rejected.
    pub fn approve(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
        override_budget: bool,
    ) -> Result<(PurchaseOrder, SpendTransaction), ProcurementError> {
        let today = self.store.today();
        let mut state = self.store.write();
        let index = Self::position(&state.purchase_orders, po_id)?;

        // All validation happens against an immutable snapshot; nothing is
        // written until every check has passed.
        let po = state.purchase_orders[index].clone();
        ProcurementService::check_version(&po, version)?;
        let approved = ProcurementService::approve(&po)?;
        let total_usd = po.total_usd()?;
        LedgerService::validate_amount(total_usd)?;

        let group_id = state.register_group(&po.cost_group, today.year());
        TransactionRepository::check_ceiling(
            &state,
            &po.cost_group,
            today.year(),
            po.cost_type,
            total_usd,
            override_budget,
        )?;

        let transaction = SpendTransaction {
            id: TransactionId::new(),
            cost_group_id: group_id,
            cost_type: po.cost_type,
            amount_usd: total_usd,
            date: today,
            status: SpendStatus::Committed,
            description: format!("Purchase order {} ({})", po.po_number, po.vendor),
            commitment_id: None,
            purchase_order_id: Some(po.id),
            reverses: None,
            budget_override: override_budget,
        };
        state.transactions.push(transaction.clone());

        let stored = &mut state.purchase_orders[index];
        stored.status = approved;
        stored.version += 1;
        let updated = stored.clone();
        info!(
            po_id = %po_id,
            transaction_id = %transaction.id,
            amount_usd = %total_usd,
            "Purchase order approved, committed spend posted"
        );
        Ok((updated, transaction))
    }

    /// PENDING_APPROVAL → REJECTED. No ledger side effect.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite` or `InvalidTransition`.
    pub fn reject(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
    ) -> Result<PurchaseOrder, ProcurementError> {
        self.transition(po_id, version, ProcurementService::reject)
    }

    /// PENDING_APPROVAL → REVISED. No ledger side effect.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite` or `InvalidTransition`.
    pub fn request_revision(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
    ) -> Result<PurchaseOrder, ProcurementError> {
        self.transition(po_id, version, ProcurementService::request_revision)
    }

    /// REVISED → PENDING_APPROVAL after edits.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite`, `InvalidTransition`, or
    /// `InvalidPurchaseOrder` when the submit checks fail.
    pub fn resubmit(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
    ) -> Result<PurchaseOrder, ProcurementError> {
        self.transition(po_id, version, ProcurementService::resubmit)
    }

    /// Any non-terminal state → CANCELLED, allowed only while no committed
    /// spend references the order.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite`, `InvalidTransition`, or
    /// `CannotCancelWithCommittedSpend`.
    pub fn cancel(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
    ) -> Result<PurchaseOrder, ProcurementError> {
        let mut state = self.store.write();
        let index = Self::position(&state.purchase_orders, po_id)?;

        let has_committed_spend = state.transactions.iter().any(|t| {
            t.purchase_order_id == Some(po_id) && !t.is_reversal() && t.status.counts_against_ceiling()
        });
        {
            let po = &state.purchase_orders[index];
            ProcurementService::check_version(po, version)?;
        }
        let cancelled = ProcurementService::cancel(&state.purchase_orders[index], has_committed_spend)?;

        let po = &mut state.purchase_orders[index];
        po.status = cancelled;
        po.version += 1;
        let updated = po.clone();
        info!(po_id = %po_id, "Purchase order cancelled");
        Ok(updated)
    }

    /// Undoes an approved order by posting a reversing transaction that
    /// restores the headroom the approval consumed. The order keeps its
    /// APPROVED status; the ledger records the undo, exactly once.
    ///
    /// # Errors
    ///
    /// Returns `ProcurementError::StaleWrite`, `NotReversible` for orders
    /// that never committed spend, or `AlreadyReversed` on a second
    /// attempt.
    pub fn reverse(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
    ) -> Result<(PurchaseOrder, SpendTransaction), ProcurementError> {
        let today = self.store.today();
        let mut state = self.store.write();
        let index = Self::position(&state.purchase_orders, po_id)?;

        let po = state.purchase_orders[index].clone();
        ProcurementService::check_version(&po, version)?;
        ProcurementService::ensure_reversible(&po)?;

        let original = state
            .transactions
            .iter()
            .find(|t| t.purchase_order_id == Some(po_id) && !t.is_reversal())
            .cloned()
            .ok_or(ProcurementError::NotReversible { status: po.status })?;
        if state
            .transactions
            .iter()
            .any(|t| t.reverses == Some(original.id))
        {
            return Err(ProcurementError::AlreadyReversed {
                transaction_id: original.id,
            });
        }

        let reversal = SpendTransaction {
            id: TransactionId::new(),
            cost_group_id: original.cost_group_id,
            cost_type: original.cost_type,
            amount_usd: original.amount_usd,
            date: today,
            status: SpendStatus::Committed,
            description: format!("Reversal of purchase order {}", po.po_number),
            commitment_id: None,
            purchase_order_id: Some(po_id),
            reverses: Some(original.id),
            budget_override: false,
        };
        state.transactions.push(reversal.clone());

        let stored = &mut state.purchase_orders[index];
        stored.version += 1;
        let updated = stored.clone();
        info!(
            po_id = %po_id,
            reverses = %original.id,
            amount_usd = %reversal.amount_usd,
            "Purchase order committed spend reversed"
        );
        Ok((updated, reversal))
    }

    /// Applies a pure status transition under the version check.
    fn transition(
        &self,
        po_id: PurchaseOrderId,
        version: u64,
        action: fn(&PurchaseOrder) -> Result<PoStatus, ProcurementError>,
    ) -> Result<PurchaseOrder, ProcurementError> {
        let mut state = self.store.write();
        let index = Self::position(&state.purchase_orders, po_id)?;
        {
            let po = &state.purchase_orders[index];
            ProcurementService::check_version(po, version)?;
        }
        let next = action(&state.purchase_orders[index])?;

        let po = &mut state.purchase_orders[index];
        let from = po.status;
        po.status = next;
        po.version += 1;
        let updated = po.clone();
        info!(po_id = %po_id, from = %from, to = %next, "Purchase order status changed");
        Ok(updated)
    }

    fn position(
        purchase_orders: &[PurchaseOrder],
        po_id: PurchaseOrderId,
    ) -> Result<usize, ProcurementError> {
        purchase_orders
            .iter()
            .position(|po| po.id == po_id)
            .ok_or(ProcurementError::NotFound(po_id))
    }
}
