//! Property-based tests for currency operations.
//!
//! Covers USD conversion rounding, display formatting, and utilization
//! percentage behavior across randomized inputs.

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use spendhub_shared::types::Currency;

use super::conversion::to_usd;
use super::format::format_currency;
use super::utilization::utilization_percent;

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate signed decimal amounts (-1,000,000.00 to 1,000,000.00).
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate zero or negative exchange rates.
fn non_positive_rate() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=0i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate supported ISO 4217 codes.
fn currency_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["USD", "IDR", "EUR", "SGD", "JPY"])
}

/// Strategy to generate locale tags, including unsupported ones.
fn locale_tag() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["en-US", "id-ID", "de-DE", "fr-FR", "xx", ""])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // USD conversion rounding
    // =========================================================================

    /// *For any* amount and positive rate, to_usd() SHALL produce a value with
    /// at most 2 decimal places.
    #[test]
    fn prop_to_usd_rounds_to_2_decimals(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let result = to_usd(amount, rate).unwrap();
        let scaled = result * Decimal::from(100);
        prop_assert_eq!(
            scaled,
            scaled.round(),
            "Result {} should have at most 2 decimal places",
            result
        );
    }

    /// *For any* amount and positive rate, calling to_usd() twice with the
    /// same inputs SHALL produce the same result.
    #[test]
    fn prop_to_usd_is_deterministic(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let result1 = to_usd(amount, rate).unwrap();
        let result2 = to_usd(amount, rate).unwrap();
        prop_assert_eq!(result1, result2, "Conversion should be deterministic");
    }

    /// *For any* amount, converting with rate=1 SHALL return the original
    /// amount (already at 2 decimals by construction).
    #[test]
    fn prop_to_usd_identity_rate_preserves_amount(
        amount in positive_amount(),
    ) {
        let result = to_usd(amount, Decimal::ONE).unwrap();
        prop_assert_eq!(result, amount, "Identity rate should preserve amount");
    }

    /// *For any* positive amount and positive rate, the result SHALL be
    /// positive.
    #[test]
    fn prop_to_usd_positive_inputs_positive_output(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let result = to_usd(amount, rate).unwrap();
        prop_assert!(result > Decimal::ZERO, "Result should be positive");
    }

    /// *For any* zero or negative rate, to_usd() SHALL fail.
    #[test]
    fn prop_to_usd_rejects_non_positive_rate(
        amount in positive_amount(),
        rate in non_positive_rate(),
    ) {
        prop_assert!(to_usd(amount, rate).is_err(), "Rate {} should be rejected", rate);
    }

    // =========================================================================
    // Display formatting
    // =========================================================================

    /// *For any* amount, supported code, and locale tag, format_currency()
    /// SHALL succeed. Unknown locales fall back rather than fail.
    #[test]
    fn prop_format_known_codes_never_fail(
        amount in any_amount(),
        code in currency_code(),
        locale in locale_tag(),
    ) {
        prop_assert!(format_currency(amount, code, locale).is_ok());
    }

    /// *For any* inputs, formatting twice SHALL produce identical output.
    #[test]
    fn prop_format_is_deterministic(
        amount in any_amount(),
        code in currency_code(),
        locale in locale_tag(),
    ) {
        let first = format_currency(amount, code, locale).unwrap();
        let second = format_currency(amount, code, locale).unwrap();
        prop_assert_eq!(first, second);
    }

    /// *For any* amount, the formatted string SHALL carry a leading minus
    /// sign exactly when the rounded amount is below zero.
    #[test]
    fn prop_format_sign_matches_rounded_amount(
        amount in any_amount(),
        code in currency_code(),
    ) {
        let currency: Currency = code.parse().unwrap();
        let rounded = amount.round_dp_with_strategy(
            currency.decimal_places(),
            RoundingStrategy::MidpointAwayFromZero,
        );
        let formatted = format_currency(amount, code, "en-US").unwrap();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            prop_assert!(formatted.starts_with('-'), "Expected sign in {}", formatted);
        } else {
            prop_assert!(!formatted.starts_with('-'), "Unexpected sign in {}", formatted);
        }
    }

    /// *For any* amount, stripping the sign, symbol, and en-US group
    /// separators from the output SHALL parse back to the rounded magnitude.
    #[test]
    fn prop_format_en_us_digits_roundtrip(
        amount in any_amount(),
        code in currency_code(),
    ) {
        let currency: Currency = code.parse().unwrap();
        let rounded = amount.round_dp_with_strategy(
            currency.decimal_places(),
            RoundingStrategy::MidpointAwayFromZero,
        );
        let formatted = format_currency(amount, code, "en-US").unwrap();
        let digits = formatted
            .trim_start_matches('-')
            .strip_prefix(currency.symbol())
            .unwrap()
            .replace(',', "");
        let parsed: Decimal = digits.parse().unwrap();
        prop_assert_eq!(parsed, rounded.abs());
    }

    // =========================================================================
    // Utilization percentage
    // =========================================================================

    /// *For any* spend, a zero or negative ceiling SHALL report 0 utilization.
    #[test]
    fn prop_utilization_without_ceiling_is_zero(
        used in any_amount(),
        ceiling in non_positive_rate(),
    ) {
        prop_assert_eq!(utilization_percent(used, ceiling), 0);
    }

    /// *For any* positive ceiling, spending exactly the ceiling SHALL report
    /// 100 utilization.
    #[test]
    fn prop_utilization_full_budget_is_100(
        ceiling in positive_amount(),
    ) {
        prop_assert_eq!(utilization_percent(ceiling, ceiling), 100);
    }

    /// *For any* spend and positive ceiling, the reported percentage SHALL
    /// sit within half a point of the exact ratio.
    #[test]
    fn prop_utilization_rounding_error_bounded(
        used in any_amount(),
        ceiling in positive_amount(),
    ) {
        let reported = Decimal::from(utilization_percent(used, ceiling));
        let exact = used / ceiling * Decimal::ONE_HUNDRED;
        let error = (reported - exact).abs();
        prop_assert!(
            error <= Decimal::new(5, 1),
            "Reported {} too far from exact {}",
            reported,
            exact
        );
    }

    /// *For any* two spend levels against the same ceiling, more spend SHALL
    /// never report lower utilization.
    #[test]
    fn prop_utilization_monotonic_in_spend(
        a in any_amount(),
        b in any_amount(),
        ceiling in positive_amount(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(utilization_percent(lo, ceiling) <= utilization_percent(hi, ceiling));
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::currency::conversion::convert_amount;

    /// Conversion uses banker's rounding while display rounds half away from
    /// zero: the same midpoint lands differently.
    #[test]
    fn test_midpoint_differs_between_conversion_and_display() {
        let converted = convert_amount(dec!(2.345), Decimal::ONE, 2);
        assert_eq!(converted, dec!(2.34));

        let displayed = format_currency(dec!(2.345), "USD", "en-US").unwrap();
        assert_eq!(displayed, "$2.35");
    }

    /// Utilization midpoints move away from zero in both directions.
    #[test]
    fn test_utilization_midpoint_away_from_zero() {
        assert_eq!(utilization_percent(dec!(42.5), dec!(100)), 43);
        assert_eq!(utilization_percent(dec!(-42.5), dec!(100)), -43);
    }
}
