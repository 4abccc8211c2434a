//! Spend transaction routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use spendhub_core::allocation::CostType;
use spendhub_core::ledger::{LedgerError, PostTransactionInput, SpendStatus};
use spendhub_shared::types::{CommitmentId, PurchaseOrderId, TransactionId};
use spendhub_store::TransactionRepository;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(post_transaction))
        .route("/transactions", get(list_transactions))
        .route("/transactions/{transaction_id}/status", patch(advance_status))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for posting a transaction.
#[derive(Debug, Deserialize)]
pub struct PostTransactionRequest {
    /// Cost group name; registered on first use.
    pub cost_group: String,
    /// CAPEX or OPEX.
    pub cost_type: CostType,
    /// Amount in USD; must be strictly positive.
    pub amount_usd: Decimal,
    /// Transaction date; the fiscal year derives from it.
    pub date: NaiveDate,
    /// Initial status.
    pub status: SpendStatus,
    /// Free-form description.
    pub description: String,
    /// Service commitment this spend belongs to.
    pub commitment_id: Option<CommitmentId>,
    /// Purchase order this spend belongs to.
    pub purchase_order_id: Option<PurchaseOrderId>,
    /// Post past the ceiling anyway; recorded on the transaction.
    #[serde(default)]
    pub override_budget: bool,
}

/// Request body for advancing a transaction's status.
#[derive(Debug, Deserialize)]
pub struct AdvanceStatusRequest {
    /// Target status; must be the next step in the lifecycle.
    pub status: SpendStatus,
    /// Commit past the ceiling anyway; recorded on the transaction.
    #[serde(default)]
    pub override_budget: bool,
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by cost group name.
    pub cost_group: Option<String>,
    /// Filter by fiscal year.
    pub year: Option<i32>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/transactions` - Post a new ledger entry.
async fn post_transaction(
    State(state): State<AppState>,
    Json(payload): Json<PostTransactionRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new(state.store.clone());

    let input = PostTransactionInput {
        cost_group: payload.cost_group,
        cost_type: payload.cost_type,
        amount_usd: payload.amount_usd,
        date: payload.date,
        status: payload.status,
        description: payload.description,
        commitment_id: payload.commitment_id,
        purchase_order_id: payload.purchase_order_id,
        override_budget: payload.override_budget,
    };

    match repo.post(input) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to post transaction");
            map_ledger_error(&e)
        }
    }
}

/// GET `/transactions` - Transactions matching the filters, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new(state.store.clone());
    let transactions = repo.list(query.cost_group.as_deref(), query.year);

    Json(json!({ "transactions": transactions }))
}

/// PATCH `/transactions/{transaction_id}/status` - Advance one lifecycle step.
async fn advance_status(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
    Json(payload): Json<AdvanceStatusRequest>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new(state.store.clone());

    match repo.advance_status(transaction_id, payload.status, payload.override_budget) {
        Ok(transaction) => {
            info!(
                transaction_id = %transaction.id,
                status = %transaction.status,
                "Transaction status advanced via API"
            );
            Json(transaction).into_response()
        }
        Err(e) => {
            error!(error = %e, transaction_id = %transaction_id, "Failed to advance transaction");
            map_ledger_error(&e)
        }
    }
}

/// Maps a ledger error to its HTTP response.
pub(crate) fn map_ledger_error(e: &LedgerError) -> axum::response::Response {
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
