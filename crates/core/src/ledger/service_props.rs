//! Property-based tests for LedgerService.
//!
//! Randomized checks over the forward-only status machine, headroom
//! enforcement, and used-total accounting.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use spendhub_shared::types::{CostGroupId, TransactionId};

use crate::allocation::{AllocationService, CostType};

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{SpendStatus, SpendTransaction};

/// Strategy for generating random SpendStatus values.
fn arb_status() -> impl Strategy<Value = SpendStatus> {
    prop_oneof![
        Just(SpendStatus::Budgeted),
        Just(SpendStatus::Committed),
        Just(SpendStatus::Paid),
    ]
}

/// Strategy for generating random cost types.
fn arb_cost_type() -> impl Strategy<Value = CostType> {
    prop_oneof![Just(CostType::Capex), Just(CostType::Opex)]
}

/// Strategy to generate positive decimal amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_txn(
    cost_group_id: CostGroupId,
    cost_type: CostType,
    amount: Decimal,
    status: SpendStatus,
    reverses: Option<TransactionId>,
) -> SpendTransaction {
    SpendTransaction {
        id: TransactionId::new(),
        cost_group_id,
        cost_type,
        amount_usd: amount,
        date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        status,
        description: "prop".to_string(),
        commitment_id: None,
        purchase_order_id: None,
        reverses,
        budget_override: false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Forward-only status machine
    // =========================================================================

    /// *For any* (from, to) pair, advance() succeeds exactly when the pair is
    /// one of the two forward steps.
    #[test]
    fn prop_advance_matches_transition_table(
        from in arb_status(),
        to in arb_status(),
    ) {
        let expected_valid = matches!(
            (from, to),
            (SpendStatus::Budgeted, SpendStatus::Committed)
                | (SpendStatus::Committed, SpendStatus::Paid)
        );

        match LedgerService::advance(from, to) {
            Ok(new_status) => {
                prop_assert!(expected_valid);
                prop_assert_eq!(new_status, to);
            }
            Err(LedgerError::InvalidTransition { from: f, to: t }) => {
                prop_assert!(!expected_valid);
                prop_assert_eq!(f, from);
                prop_assert_eq!(t, to);
            }
            Err(other) => prop_assert!(false, "Unexpected error: {other}"),
        }
    }

    /// *For any* status, PAID never transitions anywhere.
    #[test]
    fn prop_paid_is_terminal(to in arb_status()) {
        prop_assert!(!LedgerService::is_valid_transition(SpendStatus::Paid, to));
    }

    // =========================================================================
    // Headroom enforcement
    // =========================================================================

    /// *For any* post that fits inside the remaining headroom, the check
    /// SHALL pass without an override.
    #[test]
    fn prop_posts_within_ceiling_accepted(
        ceiling in positive_amount(),
        used_fraction in 0u32..=100,
        cost_type in arb_cost_type(),
    ) {
        let used = ceiling * Decimal::from(used_fraction) / Decimal::from(100);
        let amount = ceiling - used;
        prop_assume!(amount > Decimal::ZERO);

        let allocation = AllocationService::first_revision(
            CostGroupId::new(),
            2025,
            ceiling,
            ceiling,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();

        let result = LedgerService::check_headroom(
            &allocation, "Infra", cost_type, used, amount, false,
        );
        prop_assert!(result.is_ok());
    }

    /// *For any* post that exceeds the headroom without an override, the
    /// check SHALL fail and report the exact headroom and attempted amount.
    #[test]
    fn prop_exceeding_posts_rejected(
        ceiling in positive_amount(),
        excess in positive_amount(),
        cost_type in arb_cost_type(),
    ) {
        let allocation = AllocationService::first_revision(
            CostGroupId::new(),
            2025,
            ceiling,
            ceiling,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();

        let amount = ceiling + excess;
        match LedgerService::check_headroom(
            &allocation, "Infra", cost_type, Decimal::ZERO, amount, false,
        ) {
            Err(LedgerError::BudgetExceeded { headroom, attempted, .. }) => {
                prop_assert_eq!(headroom, ceiling);
                prop_assert_eq!(attempted, amount);
            }
            other => prop_assert!(false, "Expected BudgetExceeded, got {other:?}"),
        }
    }

    /// *For any* amount, an override SHALL permit the post regardless of
    /// headroom.
    #[test]
    fn prop_override_always_permits(
        ceiling in positive_amount(),
        amount in positive_amount(),
        used in positive_amount(),
        cost_type in arb_cost_type(),
    ) {
        let allocation = AllocationService::first_revision(
            CostGroupId::new(),
            2025,
            ceiling,
            ceiling,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();

        let result = LedgerService::check_headroom(
            &allocation, "Infra", cost_type, used, amount, true,
        );
        prop_assert!(result.is_ok());
    }

    // =========================================================================
    // Used-total accounting
    // =========================================================================

    /// *For any* mix of entries, total_used() SHALL equal the manual sum of
    /// COMMITTED and PAID amounts with reversals negated.
    #[test]
    fn prop_total_used_matches_manual_sum(
        entries in prop::collection::vec(
            (positive_amount(), arb_status(), any::<bool>()),
            0..20,
        ),
    ) {
        let group = CostGroupId::new();
        let mut expected = Decimal::ZERO;
        let mut transactions = Vec::with_capacity(entries.len());

        for (amount, status, is_reversal) in entries {
            let reverses = is_reversal.then(TransactionId::new);
            if status.counts_against_ceiling() {
                if is_reversal {
                    expected -= amount;
                } else {
                    expected += amount;
                }
            }
            transactions.push(make_txn(group, CostType::Opex, amount, status, reverses));
        }

        let total = LedgerService::total_used(&transactions, group, 2025, CostType::Opex);
        prop_assert_eq!(total, expected);
    }

    /// *For any* committed entry, adding its reversal SHALL restore the
    /// previous total exactly.
    #[test]
    fn prop_reversal_restores_total(
        base in positive_amount(),
        amount in positive_amount(),
    ) {
        let group = CostGroupId::new();
        let mut transactions = vec![
            make_txn(group, CostType::Capex, base, SpendStatus::Paid, None),
        ];
        let before = LedgerService::total_used(&transactions, group, 2025, CostType::Capex);

        let committed = make_txn(group, CostType::Capex, amount, SpendStatus::Committed, None);
        let committed_id = committed.id;
        transactions.push(committed);
        transactions.push(make_txn(
            group,
            CostType::Capex,
            amount,
            SpendStatus::Committed,
            Some(committed_id),
        ));

        let after = LedgerService::total_used(&transactions, group, 2025, CostType::Capex);
        prop_assert_eq!(after, before);
    }
}

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_total_used_empty_ledger() {
        let total =
            LedgerService::total_used(&[], CostGroupId::new(), 2025, CostType::Capex);
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_exact_fit_is_not_exceeded() {
        let allocation = AllocationService::first_revision(
            CostGroupId::new(),
            2025,
            Decimal::from(100),
            Decimal::ZERO,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();

        let result = LedgerService::check_headroom(
            &allocation,
            "Infra",
            CostType::Capex,
            Decimal::ZERO,
            Decimal::from(100),
            false,
        );
        assert!(result.is_ok());
    }
}
