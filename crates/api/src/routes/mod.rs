//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod allocations;
pub mod dashboard;
pub mod health;
pub mod purchase_orders;
pub mod service_commitments;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(dashboard::routes())
        .merge(allocations::routes())
        .merge(transactions::routes())
        .merge(purchase_orders::routes())
        .merge(service_commitments::routes())
}
