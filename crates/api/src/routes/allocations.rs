//! Budget allocation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use spendhub_core::allocation::{
    AllocationError, NewAllocationInput, ReviseAllocationInput,
};
use spendhub_shared::types::AllocationId;
use spendhub_store::AllocationRepository;

/// Creates the allocation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/allocations", post(create_allocation))
        .route("/allocations", get(list_allocations))
        .route("/allocations/{allocation_id}", patch(revise_allocation))
        .route("/allocations/{allocation_id}/history", get(get_history))
        .route("/cost-groups", get(list_cost_groups))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for publishing an allocation.
#[derive(Debug, Deserialize)]
pub struct CreateAllocationRequest {
    /// Cost group name; registered on first use.
    pub cost_group: String,
    /// Fiscal year.
    pub year: i32,
    /// CAPEX ceiling in USD.
    pub capex_ceiling: Decimal,
    /// OPEX ceiling in USD.
    pub opex_ceiling: Decimal,
    /// Revise an existing chain instead of rejecting the duplicate.
    #[serde(default)]
    pub revise: bool,
}

/// Request body for revising an allocation.
#[derive(Debug, Deserialize)]
pub struct ReviseAllocationRequest {
    /// New CAPEX ceiling; omitted fields carry over.
    pub capex_ceiling: Option<Decimal>,
    /// New OPEX ceiling; omitted fields carry over.
    pub opex_ceiling: Option<Decimal>,
}

/// Query parameters for year-scoped listings.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Fiscal year; defaults to the current year.
    pub year: Option<i32>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/allocations` - Publish a new allocation (or revise with `revise`).
async fn create_allocation(
    State(state): State<AppState>,
    Json(payload): Json<CreateAllocationRequest>,
) -> impl IntoResponse {
    let repo = AllocationRepository::new(state.store.clone());

    let input = NewAllocationInput {
        cost_group: payload.cost_group,
        year: payload.year,
        capex_ceiling: payload.capex_ceiling,
        opex_ceiling: payload.opex_ceiling,
    };

    match repo.create(input, payload.revise) {
        Ok(allocation) => (StatusCode::CREATED, Json(allocation)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create allocation");
            map_allocation_error(&e)
        }
    }
}

/// GET `/allocations` - Current revisions for a year.
async fn list_allocations(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> impl IntoResponse {
    let year = query.year.unwrap_or_else(|| state.store.today().year());
    let repo = AllocationRepository::new(state.store.clone());

    Json(json!({ "allocations": repo.list_current(year) }))
}

/// PATCH `/allocations/{allocation_id}` - Revise the current revision.
async fn revise_allocation(
    State(state): State<AppState>,
    Path(allocation_id): Path<AllocationId>,
    Json(payload): Json<ReviseAllocationRequest>,
) -> impl IntoResponse {
    let repo = AllocationRepository::new(state.store.clone());

    let input = ReviseAllocationInput {
        allocation_id,
        new_capex_ceiling: payload.capex_ceiling,
        new_opex_ceiling: payload.opex_ceiling,
    };

    match repo.revise(input) {
        Ok(allocation) => {
            info!(
                allocation_id = %allocation.id,
                revision = allocation.revision,
                "Allocation revised via API"
            );
            Json(allocation).into_response()
        }
        Err(e) => {
            error!(error = %e, allocation_id = %allocation_id, "Failed to revise allocation");
            map_allocation_error(&e)
        }
    }
}

/// GET `/allocations/{allocation_id}/history` - Full revision chain.
async fn get_history(
    State(state): State<AppState>,
    Path(allocation_id): Path<AllocationId>,
) -> impl IntoResponse {
    let repo = AllocationRepository::new(state.store.clone());

    match repo.history(allocation_id) {
        Ok(history) => Json(json!({ "history": history })).into_response(),
        Err(e) => map_allocation_error(&e),
    }
}

/// GET `/cost-groups` - Cost groups registered for a year.
async fn list_cost_groups(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> impl IntoResponse {
    let year = query.year.unwrap_or_else(|| state.store.today().year());
    let repo = AllocationRepository::new(state.store.clone());

    Json(json!({ "cost_groups": repo.list_cost_groups(year) }))
}

/// Maps an allocation error to its HTTP response.
pub(crate) fn map_allocation_error(e: &AllocationError) -> axum::response::Response {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string()
        })),
    )
        .into_response()
}
