//! Multi-currency conversion, display formatting, and utilization math.

pub mod conversion;
pub mod error;
pub mod format;
pub mod utilization;

#[cfg(test)]
mod props;

pub use conversion::{convert_amount, to_usd};
pub use error::CurrencyError;
pub use format::{format_currency, Locale};
pub use utilization::utilization_percent;
