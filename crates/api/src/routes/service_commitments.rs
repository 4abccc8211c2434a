//! Service commitment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use spendhub_core::renewal::{
    BillingFrequency, CommitmentType, NewCommitmentInput, RenewalError, ServiceCommitment,
};
use spendhub_shared::types::{CommitmentId, Currency, PurchaseOrderId, TransactionId};
use spendhub_store::CommitmentRepository;

/// Creates the service commitment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/service-commitments", post(create_commitment))
        .route("/service-commitments", get(list_commitments))
        .route("/service-commitments/{commitment_id}/schedule", post(schedule))
        .route("/service-commitments/{commitment_id}/renew", post(renew))
        .route("/service-commitments/{commitment_id}/postpone", post(postpone))
        .route(
            "/service-commitments/{commitment_id}/deactivate",
            post(deactivate),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for registering a commitment.
#[derive(Debug, Deserialize)]
pub struct CreateCommitmentRequest {
    /// What the commitment covers.
    pub asset_name: String,
    /// License, maintenance, or managed service.
    pub commitment_type: CommitmentType,
    /// Vendor name.
    pub vendor: String,
    /// Cost group renewals will be charged to.
    pub cost_group: String,
    /// How often the commitment renews.
    pub billing_frequency: BillingFrequency,
    /// First renewal date; today or later.
    pub next_renewal_date: NaiveDate,
    /// Expected renewal cost in the local currency.
    pub cost_estimate_local: Option<Decimal>,
    /// Currency of the estimate; required with it.
    pub currency_local: Option<Currency>,
}

/// Request body for completing a renewal.
#[derive(Debug, Default, Deserialize)]
pub struct RenewRequest {
    /// Purchase order raised for this renewal.
    pub purchase_order_id: Option<PurchaseOrderId>,
    /// Transaction posted for this renewal.
    pub transaction_id: Option<TransactionId>,
}

/// Request body for postponing a renewal.
#[derive(Debug, Deserialize)]
pub struct PostponeRequest {
    /// Whole billing cycles to push forward; at least 1.
    pub periods: i32,
}

/// Query parameters for listing commitments.
#[derive(Debug, Deserialize)]
pub struct ListCommitmentsQuery {
    /// Restrict to active commitments renewing within this many days.
    pub upcoming_within: Option<u32>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/service-commitments` - Register a commitment.
async fn create_commitment(
    State(state): State<AppState>,
    Json(payload): Json<CreateCommitmentRequest>,
) -> impl IntoResponse {
    let repo = CommitmentRepository::new(state.store.clone());

    let input = NewCommitmentInput {
        asset_name: payload.asset_name,
        commitment_type: payload.commitment_type,
        vendor: payload.vendor,
        cost_group: payload.cost_group,
        billing_frequency: payload.billing_frequency,
        next_renewal_date: payload.next_renewal_date,
        cost_estimate_local: payload.cost_estimate_local,
        currency_local: payload.currency_local,
    };

    match repo.create(input) {
        Ok(commitment) => (StatusCode::CREATED, Json(commitment)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to register commitment");
            map_renewal_error(&e)
        }
    }
}

/// GET `/service-commitments` - All commitments, or the upcoming window.
async fn list_commitments(
    State(state): State<AppState>,
    Query(query): Query<ListCommitmentsQuery>,
) -> impl IntoResponse {
    let repo = CommitmentRepository::new(state.store.clone());

    let commitments: Vec<ServiceCommitment> = match query.upcoming_within {
        Some(within_days) => repo.upcoming(within_days).collect(),
        None => repo.list(),
    };
    Json(json!({ "service_commitments": commitments }))
}

/// POST `/service-commitments/{commitment_id}/schedule` - Mark SCHEDULED.
async fn schedule(
    State(state): State<AppState>,
    Path(commitment_id): Path<CommitmentId>,
) -> impl IntoResponse {
    let repo = CommitmentRepository::new(state.store.clone());
    respond(repo.schedule(commitment_id), commitment_id)
}

/// POST `/service-commitments/{commitment_id}/renew` - Complete the cycle.
async fn renew(
    State(state): State<AppState>,
    Path(commitment_id): Path<CommitmentId>,
    payload: Option<Json<RenewRequest>>,
) -> impl IntoResponse {
    let repo = CommitmentRepository::new(state.store.clone());
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    respond(
        repo.mark_renewed(commitment_id, request.purchase_order_id, request.transaction_id),
        commitment_id,
    )
}

/// POST `/service-commitments/{commitment_id}/postpone` - Push the date out.
async fn postpone(
    State(state): State<AppState>,
    Path(commitment_id): Path<CommitmentId>,
    Json(payload): Json<PostponeRequest>,
) -> impl IntoResponse {
    let repo = CommitmentRepository::new(state.store.clone());
    respond(repo.postpone(commitment_id, payload.periods), commitment_id)
}

/// POST `/service-commitments/{commitment_id}/deactivate` - Retire it.
async fn deactivate(
    State(state): State<AppState>,
    Path(commitment_id): Path<CommitmentId>,
) -> impl IntoResponse {
    let repo = CommitmentRepository::new(state.store.clone());
    respond(repo.deactivate(commitment_id), commitment_id)
}

/// Shared response path for renewal operations.
fn respond(
    result: Result<ServiceCommitment, RenewalError>,
    commitment_id: CommitmentId,
) -> axum::response::Response {
    match result {
        Ok(commitment) => {
            info!(
                commitment_id = %commitment.id,
                status = %commitment.renewal_status,
                next_renewal = %commitment.next_renewal_date,
                "Commitment updated via API"
            );
            Json(commitment).into_response()
        }
        Err(e) => {
            error!(error = %e, commitment_id = %commitment_id, "Commitment operation failed");
            map_renewal_error(&e)
        }
    }
}

/// Maps a renewal error to its HTTP response.
pub(crate) fn map_renewal_error(e: &RenewalError) -> axum::response::Response {
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
