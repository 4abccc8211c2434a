//! Budget allocations: yearly CAPEX/OPEX ceilings per cost group.

pub mod error;
pub mod service;
pub mod types;

pub use error::AllocationError;
pub use service::AllocationService;
pub use types::{Allocation, CostGroup, CostType, NewAllocationInput, ReviseAllocationInput};
