//! Dashboard overview route.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::Datelike;
use serde::Deserialize;

use crate::AppState;
use spendhub_store::DashboardRepository;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/overview", get(get_overview))
}

/// Query parameters for the overview.
#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    /// Fiscal year; defaults to the current year.
    pub year: Option<i32>,
    /// Renewal window in days; defaults to the configured window.
    pub within_days: Option<u32>,
}

/// GET `/dashboard/overview` - Budget position plus upcoming renewals.
async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> impl IntoResponse {
    let year = query.year.unwrap_or_else(|| state.store.today().year());
    let within_days = query
        .within_days
        .unwrap_or(state.config.dashboard.renewal_window_days);

    let repo = DashboardRepository::new(state.store.clone());
    Json(repo.overview(year, within_days))
}
