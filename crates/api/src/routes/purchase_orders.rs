//! Purchase order routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use spendhub_core::allocation::CostType;
use spendhub_core::ledger::SpendTransaction;
use spendhub_core::procurement::{
    CreatePurchaseOrderInput, LineItem, PoStatus, ProcurementError, PurchaseOrder,
};
use spendhub_shared::types::{Currency, PurchaseOrderId};
use spendhub_store::PurchaseOrderRepository;

/// Creates the purchase order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchase-orders", post(create_purchase_order))
        .route("/purchase-orders", get(list_purchase_orders))
        .route("/purchase-orders/{po_id}", get(get_purchase_order))
        .route("/purchase-orders/{po_id}", delete(delete_purchase_order))
        .route("/purchase-orders/{po_id}/line-items", patch(update_line_items))
        .route("/purchase-orders/{po_id}/submit", post(submit))
        .route("/purchase-orders/{po_id}/approve", post(approve))
        .route("/purchase-orders/{po_id}/reject", post(reject))
        .route("/purchase-orders/{po_id}/request-revision", post(request_revision))
        .route("/purchase-orders/{po_id}/resubmit", post(resubmit))
        .route("/purchase-orders/{po_id}/cancel", post(cancel))
        .route("/purchase-orders/{po_id}/reverse", post(reverse))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for drafting a purchase order.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderRequest {
    /// Human-assigned order number; unique.
    pub po_number: String,
    /// Vendor name.
    pub vendor: String,
    /// Cost group the spend will land in.
    pub cost_group: String,
    /// CAPEX or OPEX.
    pub cost_type: CostType,
    /// Local currency of the line items.
    pub currency: Currency,
    /// Exchange rate to USD locked at drafting time.
    pub fx_rate_to_usd: Decimal,
    /// Line items; may be empty while drafting.
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
}

/// A single line item in a request.
#[derive(Debug, Deserialize)]
pub struct LineItemRequest {
    /// What is being bought.
    pub description: String,
    /// Unit count; at least 1.
    pub quantity: u32,
    /// Price per unit in the order's local currency.
    pub unit_price_local: Decimal,
}

impl From<LineItemRequest> for LineItem {
    fn from(request: LineItemRequest) -> Self {
        Self {
            description: request.description,
            quantity: request.quantity,
            unit_price_local: request.unit_price_local,
        }
    }
}

/// Request body carrying only the expected version.
#[derive(Debug, Deserialize)]
pub struct VersionedRequest {
    /// The version the caller last read.
    pub version: u64,
}

/// Request body for approving an order.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// The version the caller last read.
    pub version: u64,
    /// Commit past the ceiling anyway; recorded on the transaction.
    #[serde(default)]
    pub override_budget: bool,
}

/// Request body for replacing line items.
#[derive(Debug, Deserialize)]
pub struct UpdateLineItemsRequest {
    /// The version the caller last read.
    pub version: u64,
    /// The full replacement line-item list.
    pub line_items: Vec<LineItemRequest>,
}

/// Query parameters for listing orders.
#[derive(Debug, Deserialize)]
pub struct ListPurchaseOrdersQuery {
    /// Filter by status.
    pub status: Option<PoStatus>,
}

/// A purchase order with its computed totals.
#[derive(Debug, Serialize)]
pub struct PurchaseOrderResponse {
    /// The stored order.
    #[serde(flatten)]
    pub order: PurchaseOrder,
    /// Sum of line totals in local currency.
    pub total_local: Decimal,
    /// Local total converted at the locked rate.
    pub total_usd: Decimal,
}

/// An order paired with the transaction a lifecycle action posted.
#[derive(Debug, Serialize)]
pub struct OrderWithTransaction {
    /// The updated order.
    pub purchase_order: PurchaseOrder,
    /// The ledger entry the action created.
    pub transaction: SpendTransaction,
}

fn with_totals(order: PurchaseOrder) -> Result<PurchaseOrderResponse, ProcurementError> {
    let total_local = order.total_local();
    let total_usd = order.total_usd()?;
    Ok(PurchaseOrderResponse {
        order,
        total_local,
        total_usd,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/purchase-orders` - Draft a new order.
async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());

    let input = CreatePurchaseOrderInput {
        po_number: payload.po_number,
        vendor: payload.vendor,
        cost_group: payload.cost_group,
        cost_type: payload.cost_type,
        currency: payload.currency,
        fx_rate_to_usd: payload.fx_rate_to_usd,
        line_items: payload.line_items.into_iter().map(Into::into).collect(),
    };

    match repo.create(input).and_then(with_totals) {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to draft purchase order");
            map_procurement_error(&e)
        }
    }
}

/// GET `/purchase-orders` - Orders matching the status filter.
async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(query): Query<ListPurchaseOrdersQuery>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());

    let orders: Result<Vec<PurchaseOrderResponse>, ProcurementError> = repo
        .list(query.status)
        .into_iter()
        .map(with_totals)
        .collect();
    match orders {
        Ok(orders) => Json(json!({ "purchase_orders": orders })).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute purchase order totals");
            map_procurement_error(&e)
        }
    }
}

/// GET `/purchase-orders/{po_id}` - One order with computed totals.
async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());

    match repo.get(po_id).and_then(with_totals) {
        Ok(response) => Json(response).into_response(),
        Err(e) => map_procurement_error(&e),
    }
}

/// DELETE `/purchase-orders/{po_id}` - Hard-delete a DRAFT order.
async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());

    match repo.delete_draft(po_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!(error = %e, po_id = %po_id, "Failed to delete purchase order");
            map_procurement_error(&e)
        }
    }
}

/// PATCH `/purchase-orders/{po_id}/line-items` - Replace the line items.
async fn update_line_items(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<UpdateLineItemsRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());
    let line_items = payload.line_items.into_iter().map(Into::into).collect();

    match repo
        .update_line_items(po_id, payload.version, line_items)
        .and_then(with_totals)
    {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!(error = %e, po_id = %po_id, "Failed to update line items");
            map_procurement_error(&e)
        }
    }
}

/// POST `/purchase-orders/{po_id}/submit` - DRAFT → PENDING_APPROVAL.
async fn submit(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<VersionedRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());
    respond(repo.submit(po_id, payload.version), po_id)
}

/// POST `/purchase-orders/{po_id}/approve` - Approve and post committed spend.
async fn approve(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<ApproveRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());

    match repo.approve(po_id, payload.version, payload.override_budget) {
        Ok((purchase_order, transaction)) => {
            info!(
                po_id = %po_id,
                transaction_id = %transaction.id,
                "Purchase order approved via API"
            );
            Json(OrderWithTransaction {
                purchase_order,
                transaction,
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, po_id = %po_id, "Failed to approve purchase order");
            map_procurement_error(&e)
        }
    }
}

/// POST `/purchase-orders/{po_id}/reject` - PENDING_APPROVAL → REJECTED.
async fn reject(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<VersionedRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());
    respond(repo.reject(po_id, payload.version), po_id)
}

/// POST `/purchase-orders/{po_id}/request-revision` - Send back for changes.
async fn request_revision(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<VersionedRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());
    respond(repo.request_revision(po_id, payload.version), po_id)
}

/// POST `/purchase-orders/{po_id}/resubmit` - REVISED → PENDING_APPROVAL.
async fn resubmit(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<VersionedRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());
    respond(repo.resubmit(po_id, payload.version), po_id)
}

/// POST `/purchase-orders/{po_id}/cancel` - Cancel a non-terminal order.
async fn cancel(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<VersionedRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());
    respond(repo.cancel(po_id, payload.version), po_id)
}

/// POST `/purchase-orders/{po_id}/reverse` - Undo an approved order's spend.
async fn reverse(
    State(state): State<AppState>,
    Path(po_id): Path<PurchaseOrderId>,
    Json(payload): Json<VersionedRequest>,
) -> impl IntoResponse {
    let repo = PurchaseOrderRepository::new(state.store.clone());

    match repo.reverse(po_id, payload.version) {
        Ok((purchase_order, transaction)) => {
            info!(
                po_id = %po_id,
                transaction_id = %transaction.id,
                "Purchase order reversed via API"
            );
            Json(OrderWithTransaction {
                purchase_order,
                transaction,
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, po_id = %po_id, "Failed to reverse purchase order");
            map_procurement_error(&e)
        }
    }
}

/// Shared response path for plain status transitions.
fn respond(
    result: Result<PurchaseOrder, ProcurementError>,
    po_id: PurchaseOrderId,
) -> axum::response::Response {
    match result.and_then(with_totals) {
        Ok(response) => {
            info!(
                po_id = %po_id,
                status = %response.order.status,
                "Purchase order status changed via API"
            );
            Json(response).into_response()
        }
        Err(e) => {
            error!(error = %e, po_id = %po_id, "Purchase order transition failed");
            map_procurement_error(&e)
        }
    }
}

/// Maps a procurement error to its HTTP response.
pub(crate) fn map_procurement_error(e: &ProcurementError) -> axum::response::Response {
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
