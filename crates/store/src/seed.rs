//! Demo fixtures, loaded through the normal repository write paths.
//!
//! Dates are derived from the store's clock so the dashboard always has
//! live-looking content: renewals land inside the default 90-day window
//! and spend lands inside the current fiscal year.

use std::sync::Arc;

use chrono::{Datelike, Days};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use spendhub_core::allocation::{AllocationError, CostType, NewAllocationInput};
use spendhub_core::ledger::{LedgerError, PostTransactionInput, SpendStatus};
use spendhub_core::procurement::{CreatePurchaseOrderInput, LineItem, ProcurementError};
use spendhub_core::renewal::{
    BillingFrequency, CommitmentType, NewCommitmentInput, RenewalError,
};
use spendhub_shared::types::Currency;

use crate::repositories::{
    AllocationRepository, CommitmentRepository, PurchaseOrderRepository, TransactionRepository,
};
use crate::SpendStore;

/// Errors from loading the demo fixtures.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Allocation fixture was rejected.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Transaction fixture was rejected.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Purchase order fixture was rejected.
    #[error(transparent)]
    Procurement(#[from] ProcurementError),

    /// Commitment fixture was rejected.
    #[error(transparent)]
    Renewal(#[from] RenewalError),
}

/// Loads the demo fixtures into an empty store.
///
/// # Errors
///
/// Returns `SeedError` if any fixture fails validation; fixtures are
/// posted through the public repositories, so the same rules apply as to
/// any caller.
pub fn seed_demo(store: &Arc<SpendStore>) -> Result<(), SeedError> {
    let today = store.today();
    let year = today.year();
    let month_start = today.with_day(1).unwrap_or(today);

    let allocations = AllocationRepository::new(Arc::clone(store));
    let transactions = TransactionRepository::new(Arc::clone(store));
    let purchase_orders = PurchaseOrderRepository::new(Arc::clone(store));
    let commitments = CommitmentRepository::new(Arc::clone(store));

    for (cost_group, capex, opex) in [
        ("System Development", 600_000, 250_000),
        ("Infrastructure", 400_000, 300_000),
        ("Digitalization", 150_000, 180_000),
        ("Other/General IT", 50_000, 75_000),
    ] {
        allocations.create(
            NewAllocationInput {
                cost_group: cost_group.to_string(),
                year,
                capex_ceiling: Decimal::from(capex),
                opex_ceiling: Decimal::from(opex),
            },
            false,
        )?;
    }

    for (cost_group, cost_type, amount, date, status, description) in [
        (
            "System Development",
            CostType::Capex,
            120_000,
            month_start,
            SpendStatus::Paid,
            "ERP platform build-out, phase 1",
        ),
        (
            "Infrastructure",
            CostType::Opex,
            8_500,
            month_start,
            SpendStatus::Paid,
            "Data center managed service (InfraCorp)",
        ),
        (
            "Infrastructure",
            CostType::Capex,
            64_000,
            today,
            SpendStatus::Committed,
            "Core switch refresh",
        ),
        (
            "Digitalization",
            CostType::Opex,
            45_000,
            today,
            SpendStatus::Budgeted,
            "CRM license renewal (CloudCRM Inc.)",
        ),
    ] {
        transactions.post(PostTransactionInput {
            cost_group: cost_group.to_string(),
            cost_type,
            amount_usd: Decimal::from(amount),
            date,
            status,
            description: description.to_string(),
            commitment_id: None,
            purchase_order_id: None,
            override_budget: false,
        })?;
    }

    purchase_orders.create(CreatePurchaseOrderInput {
        po_number: format!("PO-{year}-0001"),
        vendor: "InfraCorp".to_string(),
        cost_group: "Infrastructure".to_string(),
        cost_type: CostType::Capex,
        currency: Currency::Usd,
        fx_rate_to_usd: Decimal::ONE,
        line_items: vec![
            LineItem {
                description: "Rack servers".to_string(),
                quantity: 4,
                unit_price_local: Decimal::from(9_500),
            },
            LineItem {
                description: "Installation and cabling".to_string(),
                quantity: 1,
                unit_price_local: Decimal::from(4_200),
            },
        ],
    })?;

    for (asset, kind, vendor, cost_group, frequency, due_in_days, estimate) in [
        (
            "Data Center Managed Service",
            CommitmentType::ManagedService,
            "InfraCorp",
            "Infrastructure",
            BillingFrequency::Monthly,
            15_u64,
            8_500,
        ),
        (
            "CRM Enterprise Licenses",
            CommitmentType::License,
            "CloudCRM Inc.",
            "Digitalization",
            BillingFrequency::Annual,
            45,
            45_000,
        ),
        (
            "Finance ERP Maintenance",
            CommitmentType::Maintenance,
            "ERP Systems Ltd.",
            "System Development",
            BillingFrequency::Annual,
            120,
            32_000,
        ),
    ] {
        commitments.create(NewCommitmentInput {
            asset_name: asset.to_string(),
            commitment_type: kind,
            vendor: vendor.to_string(),
            cost_group: cost_group.to_string(),
            billing_frequency: frequency,
            next_renewal_date: today
                .checked_add_days(Days::new(due_in_days))
                .unwrap_or(today),
            cost_estimate_local: Some(Decimal::from(estimate)),
            currency_local: Some(Currency::Usd),
        })?;
    }

    info!("Demo fixtures loaded");
    Ok(())
}
