//! HTTP API layer with Axum routes.
//!
//! Thin handlers over the store repositories: parse the request, call the
//! repository, map domain errors to status codes.

pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use spendhub_shared::AppConfig;
use spendhub_store::SpendStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory ledger store.
    pub store: Arc<SpendStore>,
    /// Loaded application configuration.
    pub config: Arc<AppConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
