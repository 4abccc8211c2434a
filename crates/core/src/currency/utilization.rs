//! Budget utilization percentage.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Computes spend as a whole-number percentage of a budget ceiling.
///
/// Rounds half away from zero, so 42.5% reports as 43 and -42.5% as -43.
/// A zero or negative ceiling yields 0; the result is not capped at 100,
/// an overrun group reads as 125%.
#[must_use]
pub fn utilization_percent(used: Decimal, ceiling: Decimal) -> i64 {
    if ceiling <= Decimal::ZERO {
        return 0;
    }
    let percent = (used / ceiling * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    percent.to_i64().unwrap_or(if percent.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
