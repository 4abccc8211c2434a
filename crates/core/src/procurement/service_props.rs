//! Property-based tests for the procurement service.
//!
//! Exercises the approval state machine, the version guard, and draft
//! validation across generated orders.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use spendhub_shared::types::Currency;

use crate::allocation::CostType;
use crate::currency::to_usd;
use crate::procurement::error::ProcurementError;
use crate::procurement::service::ProcurementService;
use crate::procurement::types::{CreatePurchaseOrderInput, LineItem, PoStatus, PurchaseOrder};

// =============================================================================
// Strategies
// =============================================================================

fn arb_po_status() -> impl Strategy<Value = PoStatus> {
    prop_oneof![
        Just(PoStatus::Draft),
        Just(PoStatus::PendingApproval),
        Just(PoStatus::Approved),
        Just(PoStatus::Rejected),
        Just(PoStatus::Revised),
        Just(PoStatus::Cancelled),
    ]
}

fn arb_terminal_status() -> impl Strategy<Value = PoStatus> {
    prop_oneof![
        Just(PoStatus::Approved),
        Just(PoStatus::Rejected),
        Just(PoStatus::Cancelled),
    ]
}

/// Positive unit price with two decimal places.
fn positive_price() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Positive FX rate with six decimal places.
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|micros| Decimal::new(micros, 6))
}

fn arb_line_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec((1u32..50u32, positive_price()), 1..6).prop_map(|lines| {
        lines
            .into_iter()
            .enumerate()
            .map(|(index, (quantity, unit_price_local))| LineItem {
                description: format!("Item {index}"),
                quantity,
                unit_price_local,
            })
            .collect()
    })
}

fn order_with(status: PoStatus, line_items: Vec<LineItem>, fx_rate_to_usd: Decimal) -> PurchaseOrder {
    let mut po = ProcurementService::create_draft(
        CreatePurchaseOrderInput {
            po_number: "PO-2025-0001".to_string(),
            vendor: "CloudCRM Inc.".to_string(),
            cost_group: "System Development".to_string(),
            cost_type: CostType::Opex,
            currency: Currency::Usd,
            fx_rate_to_usd,
            line_items,
        },
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
    )
    .unwrap();
    po.status = status;
    po
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property: Each operation succeeds from exactly one source status
    // =========================================================================

    /// *For any* order status, submit SHALL succeed from DRAFT only,
    /// approve / reject / request-revision from PENDING_APPROVAL only,
    /// and resubmit from REVISED only.
    #[test]
    fn prop_operations_gate_on_source_status(
        status in arb_po_status(),
        lines in arb_line_items(),
    ) {
        let po = order_with(status, lines, dec!(1));

        prop_assert_eq!(
            ProcurementService::submit(&po).is_ok(),
            status == PoStatus::Draft
        );
        prop_assert_eq!(
            ProcurementService::approve(&po).is_ok(),
            status == PoStatus::PendingApproval
        );
        prop_assert_eq!(
            ProcurementService::reject(&po).is_ok(),
            status == PoStatus::PendingApproval
        );
        prop_assert_eq!(
            ProcurementService::request_revision(&po).is_ok(),
            status == PoStatus::PendingApproval
        );
        prop_assert_eq!(
            ProcurementService::resubmit(&po).is_ok(),
            status == PoStatus::Revised
        );
    }

    /// *For any* successful operation, the (from, to) pair SHALL appear
    /// in the transition table.
    #[test]
    fn prop_successful_operations_match_table(
        status in arb_po_status(),
        lines in arb_line_items(),
    ) {
        let po = order_with(status, lines, dec!(1));

        let results = [
            ProcurementService::submit(&po),
            ProcurementService::approve(&po),
            ProcurementService::reject(&po),
            ProcurementService::request_revision(&po),
            ProcurementService::resubmit(&po),
            ProcurementService::cancel(&po, false),
        ];

        for result in results {
            if let Ok(next) = result {
                prop_assert!(
                    ProcurementService::is_valid_transition(status, next),
                    "operation produced {} -> {} which the table forbids",
                    status,
                    next
                );
            }
        }
    }

    // =========================================================================
    // Property: Terminal statuses never move again
    // =========================================================================

    /// *For any* terminal status, every workflow operation SHALL fail.
    #[test]
    fn prop_terminal_statuses_are_frozen(
        status in arb_terminal_status(),
        lines in arb_line_items(),
    ) {
        let po = order_with(status, lines, dec!(1));

        prop_assert!(ProcurementService::submit(&po).is_err());
        prop_assert!(ProcurementService::approve(&po).is_err());
        prop_assert!(ProcurementService::reject(&po).is_err());
        prop_assert!(ProcurementService::request_revision(&po).is_err());
        prop_assert!(ProcurementService::resubmit(&po).is_err());
        prop_assert!(ProcurementService::cancel(&po, false).is_err());
    }

    /// *For any* non-terminal status, cancel SHALL succeed when no
    /// committed spend references the order and fail with
    /// `CannotCancelWithCommittedSpend` when spend exists.
    #[test]
    fn prop_cancel_respects_committed_spend(
        status in arb_po_status(),
        lines in arb_line_items(),
    ) {
        let po = order_with(status, lines, dec!(1));

        if status.is_terminal() {
            prop_assert!(ProcurementService::cancel(&po, false).is_err());
        } else {
            prop_assert_eq!(
                ProcurementService::cancel(&po, false).unwrap(),
                PoStatus::Cancelled
            );
            prop_assert!(matches!(
                ProcurementService::cancel(&po, true),
                Err(ProcurementError::CannotCancelWithCommittedSpend)
            ));
        }
    }

    // =========================================================================
    // Property: Version guard
    // =========================================================================

    /// *For any* stored and expected version pair, the check SHALL pass
    /// exactly when they match and report both numbers otherwise.
    #[test]
    fn prop_version_check_detects_stale_writes(
        stored in 1u64..1_000u64,
        expected in 1u64..1_000u64,
        lines in arb_line_items(),
    ) {
        let mut po = order_with(PoStatus::Draft, lines, dec!(1));
        po.version = stored;

        let result = ProcurementService::check_version(&po, expected);
        if stored == expected {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(ProcurementError::StaleWrite { expected: e, actual: a }) => {
                    prop_assert_eq!(e, expected);
                    prop_assert_eq!(a, stored);
                }
                other => prop_assert!(false, "Expected StaleWrite, got {:?}", other),
            }
        }
    }

    // =========================================================================
    // Property: Draft validation
    // =========================================================================

    /// *For any* order input with a blank number, vendor, or cost group,
    /// validation SHALL fail.
    #[test]
    fn prop_blank_fields_rejected(
        lines in arb_line_items(),
        blank in "[ \t]{0,4}",
    ) {
        let base = CreatePurchaseOrderInput {
            po_number: "PO-2025-0001".to_string(),
            vendor: "CloudCRM Inc.".to_string(),
            cost_group: "System Development".to_string(),
            cost_type: CostType::Opex,
            currency: Currency::Usd,
            fx_rate_to_usd: dec!(1),
            line_items: lines,
        };

        let mut no_number = base.clone();
        no_number.po_number = blank.clone();
        prop_assert!(ProcurementService::validate_draft(&no_number).is_err());

        let mut no_vendor = base.clone();
        no_vendor.vendor = blank.clone();
        prop_assert!(ProcurementService::validate_draft(&no_vendor).is_err());

        let mut no_group = base;
        no_group.cost_group = blank;
        prop_assert!(ProcurementService::validate_draft(&no_group).is_err());
    }

    /// *For any* non-positive FX rate, validation SHALL fail.
    #[test]
    fn prop_non_positive_rate_rejected(
        rate in -100_000i64..=0i64,
        lines in arb_line_items(),
    ) {
        let input = CreatePurchaseOrderInput {
            po_number: "PO-2025-0001".to_string(),
            vendor: "CloudCRM Inc.".to_string(),
            cost_group: "System Development".to_string(),
            cost_type: CostType::Opex,
            currency: Currency::Usd,
            fx_rate_to_usd: Decimal::new(rate, 4),
            line_items: lines,
        };

        let rejected = matches!(
            ProcurementService::validate_draft(&input),
            Err(ProcurementError::InvalidPurchaseOrder { .. })
        );
        prop_assert!(rejected, "rate {} accepted", rate);
    }

    // =========================================================================
    // Property: Totals recompute from line items
    // =========================================================================

    /// *For any* set of line items, the local total SHALL equal the sum
    /// of quantity times unit price, and the USD total SHALL equal the
    /// converted local total.
    #[test]
    fn prop_totals_recompute_from_lines(
        lines in arb_line_items(),
        rate in positive_rate(),
    ) {
        let po = order_with(PoStatus::Draft, lines.clone(), rate);

        let expected_local: Decimal = lines
            .iter()
            .map(|item| Decimal::from(item.quantity) * item.unit_price_local)
            .sum();

        prop_assert_eq!(po.total_local(), expected_local);
        prop_assert_eq!(
            po.total_usd().unwrap(),
            to_usd(expected_local, rate).unwrap()
        );
    }
}

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_full_lifecycle_ends_approved() {
        let mut po = order_with(
            PoStatus::Draft,
            vec![LineItem {
                description: "CRM licenses".to_string(),
                quantity: 50,
                unit_price_local: dec!(900),
            }],
            dec!(1),
        );

        po.status = ProcurementService::submit(&po).unwrap();
        po.status = ProcurementService::request_revision(&po).unwrap();
        po.status = ProcurementService::resubmit(&po).unwrap();
        po.status = ProcurementService::approve(&po).unwrap();

        assert_eq!(po.status, PoStatus::Approved);
        assert!(ProcurementService::ensure_reversible(&po).is_ok());
    }

    #[test]
    fn test_no_transition_leaves_terminal_state() {
        for from in [PoStatus::Approved, PoStatus::Rejected, PoStatus::Cancelled] {
            for to in [
                PoStatus::Draft,
                PoStatus::PendingApproval,
                PoStatus::Approved,
                PoStatus::Rejected,
                PoStatus::Revised,
                PoStatus::Cancelled,
            ] {
                assert!(
                    !ProcurementService::is_valid_transition(from, to),
                    "{from} -> {to} should be forbidden"
                );
            }
        }
    }
}
