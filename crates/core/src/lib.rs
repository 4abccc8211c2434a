//! Core business logic for Spend Hub.
//!
//! This crate contains pure business logic with ZERO web or storage dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `currency` - Currency formatting, FX conversion, and utilization math
//! - `allocation` - Yearly CAPEX/OPEX ceilings per cost group
//! - `ledger` - Spend transactions and headroom enforcement
//! - `procurement` - Purchase order approval state machine
//! - `renewal` - Service commitments and renewal scheduling
//! - `dashboard` - Read-only budget and renewal projections

pub mod allocation;
pub mod currency;
pub mod dashboard;
pub mod ledger;
pub mod procurement;
pub mod renewal;
