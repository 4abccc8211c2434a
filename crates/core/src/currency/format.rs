//! Deterministic currency display formatting.
//!
//! Output is symbol-prefixed with locale-dependent digit grouping, e.g.
//! `$45,000.00` (en-US) or `Rp8.500.000` (id-ID). Fractional digits follow
//! the currency's minor units, capped at 2.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use spendhub_shared::types::Currency;

use super::error::CurrencyError;

/// Digit-grouping conventions for supported locale tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// `1,234.56` grouping.
    EnUs,
    /// `1.234,56` grouping.
    IdId,
    /// `1.234,56` grouping.
    DeDe,
}

impl Locale {
    /// Parses a BCP 47 locale tag.
    ///
    /// Unrecognized tags fall back to `en-US` grouping; only the currency
    /// code is validated.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "id-ID" => Self::IdId,
            "de-DE" => Self::DeDe,
            _ => Self::EnUs,
        }
    }

    const fn thousands_separator(self) -> char {
        match self {
            Self::EnUs => ',',
            Self::IdId | Self::DeDe => '.',
        }
    }

    const fn decimal_separator(self) -> char {
        match self {
            Self::EnUs => '.',
            Self::IdId | Self::DeDe => ',',
        }
    }
}

/// Formats a monetary amount for display.
///
/// Rounds half away from zero to the currency's minor units, then renders
/// the sign, currency symbol, grouped integer digits, and fractional digits.
///
/// # Errors
///
/// Returns `CurrencyError::InvalidCurrencyCode` if `currency_code` is not a
/// recognized ISO 4217 code.
pub fn format_currency(
    amount: Decimal,
    currency_code: &str,
    locale: &str,
) -> Result<String, CurrencyError> {
    let currency: Currency =
        currency_code
            .parse()
            .map_err(|_| CurrencyError::InvalidCurrencyCode {
                code: currency_code.to_string(),
            })?;
    let locale = Locale::parse(locale);
    let places = currency.decimal_places();

    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits.as_str(), ""),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(currency.symbol());
    out.push_str(&group_thousands(int_part, locale.thousands_separator()));

    let places = places as usize;
    if places > 0 {
        out.push(locale.decimal_separator());
        let mut frac = frac_part.to_string();
        frac.truncate(places);
        while frac.len() < places {
            frac.push('0');
        }
        out.push_str(&frac);
    }

    Ok(out)
}

/// Inserts a separator every three integer digits, counting from the right.
fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
