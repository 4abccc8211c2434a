//! Spend ledger: transactions checked against allocation headroom.
//!
//! This module implements the budget-facing side of spend tracking:
//! - Transaction entries with a forward-only status lifecycle
//! - Headroom checks against the current allocation revision
//! - Used-total accounting net of reversing entries

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{PostTransactionInput, SpendStatus, SpendTransaction};
