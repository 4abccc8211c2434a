//! Authoritative in-memory data store for Spend Hub.
//!
//! Every mutation goes through one of the repositories in [`repositories`],
//! which serialize writers on a single lock over the store state. Purchase
//! order approval and the committed-spend post happen under one write-lock
//! acquisition with all validation up front, so partial application is
//! never observable.
//!
//! The store owns the clock: production stores read the system date,
//! tests pin one with [`SpendStore::with_today`].

pub mod repositories;
pub mod seed;

mod state;

pub use repositories::{
    AllocationRepository, CommitmentRepository, DashboardRepository, PurchaseOrderRepository,
    TransactionRepository,
};
pub use seed::{seed_demo, SeedError};

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};

use state::StoreState;

/// The clock a store reads "today" from.
#[derive(Debug, Clone, Copy)]
enum Clock {
    /// System date, used in production.
    System,
    /// Pinned date, used in tests and deterministic seeding.
    Fixed(NaiveDate),
}

/// Shared in-memory store behind all repositories.
///
/// Cheap to share: handlers clone an `Arc<SpendStore>` and construct
/// repositories per request, mirroring a connection-pool handle.
#[derive(Debug)]
pub struct SpendStore {
    state: RwLock<StoreState>,
    clock: Clock,
}

impl SpendStore {
    /// Creates an empty store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            clock: Clock::System,
        }
    }

    /// Creates an empty store with a pinned date.
    #[must_use]
    pub fn with_today(today: NaiveDate) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            clock: Clock::Fixed(today),
        }
    }

    /// The date the store stamps on new records.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self.clock {
            Clock::System => Utc::now().date_naive(),
            Clock::Fixed(date) => date,
        }
    }

    /// Read access to the state. Poisoning is recovered: writers validate
    /// before mutating, so a panicked writer leaves the state consistent.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the state for one atomic unit of work.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SpendStore {
    fn default() -> Self {
        Self::new()
    }
}
