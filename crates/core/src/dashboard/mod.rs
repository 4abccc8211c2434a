//! Dashboard projection.
//!
//! This module provides the read-only overview the dashboard renders:
//! - Year-level budget position with a monthly burn series
//! - Renewals due within the configured window

pub mod service;
pub mod types;

pub use service::DashboardService;
pub use types::*;
