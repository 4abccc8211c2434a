//! Repositories: one authoritative write path per aggregate.

pub mod allocation;
pub mod commitment;
pub mod dashboard;
pub mod purchase_order;
pub mod transaction;

pub use allocation::AllocationRepository;
pub use commitment::CommitmentRepository;
pub use dashboard::DashboardRepository;
pub use purchase_order::PurchaseOrderRepository;
pub use transaction::TransactionRepository;
