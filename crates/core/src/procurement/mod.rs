//! Purchase-order procurement workflow.
//!
//! Orders move Draft → PendingApproval → Approved/Rejected/Revised, with
//! a revision loop back through PendingApproval and cancellation from any
//! non-terminal state. Approval commits spend in the ledger atomically.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ProcurementError;
pub use service::ProcurementService;
pub use types::{CreatePurchaseOrderInput, LineItem, PoStatus, PurchaseOrder};
