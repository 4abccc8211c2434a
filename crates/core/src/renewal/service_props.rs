//! Property-based tests for the renewal service.
//!
//! Covers date monotonicity across renew/postpone and the ordering
//! guarantees of the upcoming-renewals sequence.

use chrono::NaiveDate;
use proptest::prelude::*;

use crate::renewal::service::RenewalService;
use crate::renewal::types::{
    BillingFrequency, CommitmentType, NewCommitmentInput, RenewalStatus, ServiceCommitment,
};

// =============================================================================
// Strategies
// =============================================================================

fn arb_frequency() -> impl Strategy<Value = BillingFrequency> {
    prop_oneof![
        Just(BillingFrequency::Monthly),
        Just(BillingFrequency::Quarterly),
        Just(BillingFrequency::Annual),
        Just(BillingFrequency::Biennial),
    ]
}

/// Arbitrary calendar date; days capped at 28 so every (year, month, day)
/// combination is valid.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2035i32, 1u32..=12u32, 1u32..=28u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn commitment_on(frequency: BillingFrequency, renewal: NaiveDate) -> ServiceCommitment {
    RenewalService::create(
        NewCommitmentInput {
            asset_name: "Data Center Managed Service".to_string(),
            commitment_type: CommitmentType::ManagedService,
            vendor: "InfraCorp".to_string(),
            cost_group: "Infrastructure".to_string(),
            billing_frequency: frequency,
            next_renewal_date: renewal,
            cost_estimate_local: None,
            currency_local: None,
        },
        renewal,
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property: Renewal dates never move backwards
    // =========================================================================

    /// *For any* date, frequency, and positive cycle count, the advanced
    /// date SHALL be strictly later than the starting date.
    #[test]
    fn prop_advance_date_moves_forward(
        start in arb_date(),
        frequency in arb_frequency(),
        cycles in 1u32..=40u32,
    ) {
        let advanced = RenewalService::advance_date(start, frequency, cycles).unwrap();
        prop_assert!(advanced > start);
    }

    /// *For any* commitment, mark-renewed and postpone SHALL leave the
    /// renewal date later than before and the status at PLANNED.
    #[test]
    fn prop_renew_and_postpone_are_monotonic(
        start in arb_date(),
        frequency in arb_frequency(),
        periods in 1i32..=24i32,
    ) {
        let c = commitment_on(frequency, start);

        let renewed = RenewalService::mark_renewed(&c, None, None).unwrap();
        prop_assert!(renewed.next_renewal_date > c.next_renewal_date);
        prop_assert_eq!(renewed.renewal_status, RenewalStatus::Planned);

        let postponed = RenewalService::postpone(&c, periods).unwrap();
        prop_assert!(postponed.next_renewal_date > c.next_renewal_date);
        prop_assert_eq!(postponed.renewal_status, RenewalStatus::Planned);
    }

    /// *For any* non-positive period count, postpone SHALL fail and echo
    /// the rejected value.
    #[test]
    fn prop_postpone_rejects_non_positive(
        start in arb_date(),
        frequency in arb_frequency(),
        periods in -100i32..=0i32,
    ) {
        let c = commitment_on(frequency, start);
        let result = RenewalService::postpone(&c, periods);
        let rejected = matches!(
            result,
            Err(crate::renewal::RenewalError::InvalidPostponement { periods: p }) if p == periods
        );
        prop_assert!(rejected, "periods {} accepted", periods);
    }

    // =========================================================================
    // Property: Upcoming sequence ordering
    // =========================================================================

    /// *For any* set of commitments, the upcoming sequence SHALL contain
    /// only active commitments inside the window, in ascending date order,
    /// and re-iterating SHALL yield the same sequence.
    #[test]
    fn prop_upcoming_is_sorted_windowed_and_restartable(
        dates in prop::collection::vec(arb_date(), 0..12),
        today in arb_date(),
        within_days in 0u32..=365u32,
    ) {
        let commitments: Vec<ServiceCommitment> = dates
            .iter()
            .map(|d| commitment_on(BillingFrequency::Monthly, *d))
            .collect();

        let iter = RenewalService::upcoming(&commitments, today, within_days);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        prop_assert_eq!(&first, &second);

        for window in first.windows(2) {
            prop_assert!(
                (window[0].next_renewal_date, window[0].id)
                    <= (window[1].next_renewal_date, window[1].id)
            );
        }
        for c in &first {
            prop_assert!(c.active);
            prop_assert!(c.next_renewal_date >= today);
        }
    }

    /// *For any* mix of active and retired commitments, retired ones
    /// SHALL never appear in the upcoming sequence.
    #[test]
    fn prop_upcoming_excludes_retired(
        dates in prop::collection::vec(arb_date(), 1..8),
        retire_mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let commitments: Vec<ServiceCommitment> = dates
            .iter()
            .zip(retire_mask.iter().cycle())
            .map(|(d, retire)| {
                let c = commitment_on(BillingFrequency::Annual, *d);
                if *retire { RenewalService::deactivate(&c) } else { c }
            })
            .collect();

        let today = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        for c in RenewalService::upcoming(&commitments, today, 10_000) {
            prop_assert!(c.active);
        }
    }
}

#[cfg(test)]
mod edge_case_tests {
    use super::*;

    #[test]
    fn test_biennial_cycle_spans_two_years() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let advanced =
            RenewalService::advance_date(start, BillingFrequency::Biennial, 1).unwrap();
        assert_eq!(advanced, NaiveDate::from_ymd_opt(2027, 6, 30).unwrap());
    }

    #[test]
    fn test_leap_day_advances_to_february_28() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let advanced = RenewalService::advance_date(start, BillingFrequency::Annual, 1).unwrap();
        assert_eq!(advanced, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
