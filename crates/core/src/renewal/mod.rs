//! Service commitments and renewal scheduling.
//!
//! Tracks recurring obligations (licenses, managed services, maintenance)
//! with a billing cadence and a forward-only renewal date.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::RenewalError;
pub use service::RenewalService;
pub use types::{
    BillingFrequency, CommitmentType, NewCommitmentInput, RenewalStatus, ServiceCommitment,
};
