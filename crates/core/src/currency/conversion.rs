//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Always round to the target currency's decimal places
//! - Use banker's rounding (round half to even)
//! - Rates are injected by the caller, never fetched here

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use super::error::CurrencyError;

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    let converted = amount * rate;
    converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Converts a local-currency amount to USD using an explicit FX rate.
///
/// The result is rounded to USD minor units (2 decimal places).
///
/// # Errors
///
/// Returns `CurrencyError::InvalidExchangeRate` if the rate is zero or negative.
pub fn to_usd(amount_local: Decimal, fx_rate_to_usd: Decimal) -> Result<Decimal, CurrencyError> {
    if fx_rate_to_usd <= Decimal::ZERO {
        return Err(CurrencyError::InvalidExchangeRate {
            rate: fx_rate_to_usd,
        });
    }
    Ok(convert_amount(amount_local, fx_rate_to_usd, 2))
}
