use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfloor_core::{Order, OrderDraft, OrderId, OrderStatus, Priority};
use shopfloor_order::OrderStatistics;

use crate::error::AppError;
use crate::state::AppState;
use crate::window::WindowQuery;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", get(list_orders).post(create_order))
        .route("/v1/orders/range", get(orders_in_range))
        .route("/v1/orders/cost-preview", get(cost_preview))
        .route(
            "/v1/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/v1/orders/{id}/advance", post(advance_order))
        .route("/v1/orders/{id}/revert", post(revert_order))
        .route("/v1/statistics", get(statistics))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Status code such as `IN_PROGRESS`
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub client_name: String,
    pub product_description: String,
    pub quantity: i32,
    pub priority: Option<String>,
    pub deadline: DateTime<Utc>,
    /// Manual cost. Takes precedence over `reprice`.
    pub cost: Option<Decimal>,
    /// Recompute cost from the new quantity and priority
    #[serde(default)]
    pub reprice: bool,
}

#[derive(Debug, Deserialize)]
pub struct CostPreviewQuery {
    pub quantity: i32,
    pub priority: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CostPreviewResponse {
    pub quantity: i32,
    pub priority: Priority,
    pub cost: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub id: OrderId,
    pub status: OrderStatus,
    pub label: String,
    pub can_advance: bool,
    pub can_revert: bool,
}

impl StatusResponse {
    fn new(id: OrderId, status: OrderStatus) -> Self {
        Self {
            id,
            status,
            label: status.label().to_string(),
            can_advance: status.can_advance(),
            can_revert: status.can_revert(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/orders
/// All orders, newest first. `?status=` narrows to one stage.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = match query.status.as_deref() {
        Some(code) => {
            let status = code.parse::<OrderStatus>().map_err(AppError::ValidationError)?;
            state.orders.get_orders_by_status(status).await
        }
        None => state.orders.get_all_orders().await,
    };
    Ok(Json(orders))
}

/// POST /v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let id = state.orders.create_order(draft).await?;
    let order = state
        .orders
        .get_order_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("order {} vanished after insert", id))?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    state
        .orders
        .get_order_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::order_not_found(id))
}

/// PUT /v1/orders/{id}
/// Order number and order date are fixed at creation. Status moves only
/// through `/advance` and `/revert`; a `status` field in the body is ignored.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let mut order = state
        .orders
        .get_order_by_id(id)
        .await?
        .ok_or_else(|| AppError::order_not_found(id))?;

    order.client_name = req.client_name.trim().to_string();
    order.product_description = req.product_description.trim().to_string();
    order.quantity = req.quantity;
    if let Some(priority) = req.priority.as_deref() {
        order.priority = Priority::from_label(priority);
    }
    order.deadline = req.deadline;
    match req.cost {
        Some(cost) => order.cost = cost,
        None if req.reprice => order.reprice(),
        None => {}
    }

    if !state.orders.update_order(order.clone()).await? {
        return Err(AppError::order_not_found(id));
    }
    Ok(Json(order))
}

/// DELETE /v1/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<StatusCode, AppError> {
    if state.orders.delete_order(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::order_not_found(id))
    }
}

/// POST /v1/orders/{id}/advance
pub async fn advance_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = state
        .orders
        .advance_status(id)
        .await?
        .ok_or_else(|| AppError::order_not_found(id))?;
    Ok(Json(StatusResponse::new(id, status)))
}

/// POST /v1/orders/{id}/revert
pub async fn revert_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = state
        .orders
        .revert_status(id)
        .await?
        .ok_or_else(|| AppError::order_not_found(id))?;
    Ok(Json(StatusResponse::new(id, status)))
}

/// GET /v1/orders/range?start=&end=
pub async fn orders_in_range(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    if range.start > range.end {
        return Err(AppError::ValidationError(format!(
            "Range start {} is after end {}",
            range.start, range.end
        )));
    }
    Ok(Json(
        state.orders.get_orders_by_date_range(range.start, range.end).await,
    ))
}

/// GET /v1/orders/cost-preview?quantity=&priority=
pub async fn cost_preview(
    State(state): State<AppState>,
    Query(query): Query<CostPreviewQuery>,
) -> Json<CostPreviewResponse> {
    let priority = query
        .priority
        .as_deref()
        .map(Priority::from_label)
        .unwrap_or_default();

    Json(CostPreviewResponse {
        quantity: query.quantity,
        priority,
        cost: state.orders.calculate_order_cost(query.quantity, priority),
    })
}

/// GET /v1/statistics?start=&end=
pub async fn statistics(
    State(state): State<AppState>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<OrderStatistics>, AppError> {
    let (start, end) = window.resolve(state.reporting.default_window_days, Utc::now())?;
    Ok(Json(state.orders.get_order_statistics(start, end).await))
}
