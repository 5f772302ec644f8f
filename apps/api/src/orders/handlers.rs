//! Axum route handlers for the Orders API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::order::{DesignFileRow, OrderRow, OrderStatus, PaymentMethod, PaymentRow};
use crate::orders::payments::{summarize, PaymentSummary};
use crate::orders::status::{is_cancelled, validate_transition};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub due_date: Option<NaiveDate>,
    pub total_price: i64,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub order: OrderRow,
    pub payments: Vec<PaymentRow>,
    pub designs: Vec<DesignFileRow>,
    pub payment_summary: PaymentSummary,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: i64,
    pub method: PaymentMethod,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentRow>,
    pub summary: PaymentSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/orders
pub async fn handle_create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Order title must not be empty".to_string(),
        ));
    }
    if req.quantity <= 0 {
        return Err(AppError::UnprocessableEntity(
            "Order quantity must be positive".to_string(),
        ));
    }
    if req.total_price < 0 {
        return Err(AppError::UnprocessableEntity(
            "Order total_price must not be negative".to_string(),
        ));
    }

    let order: OrderRow = sqlx::query_as(
        r#"
        INSERT INTO orders
            (id, customer_id, title, description, status, quantity, due_date,
             total_price, assigned_to, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.customer_id)
    .bind(req.title.trim())
    .bind(&req.description)
    .bind(OrderStatus::Pending)
    .bind(req.quantity)
    .bind(req.due_date)
    .bind(req.total_price)
    .bind(req.assigned_to)
    .fetch_one(&state.db)
    .await?;

    info!("Created order {} for customer {}", order.id, order.customer_id);
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/v1/orders
pub async fn handle_list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderRow>>, AppError> {
    let orders: Vec<OrderRow> = sqlx::query_as(
        r#"
        SELECT * FROM orders
        WHERE ($1::order_status IS NULL OR status = $1)
          AND ($2::uuid IS NULL OR customer_id = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(params.status)
    .bind(params.customer_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(orders))
}

/// GET /api/v1/orders/:id
pub async fn handle_get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let order = fetch_order(&state, id).await?;
    let payments = fetch_payments(&state, id).await?;
    let designs: Vec<DesignFileRow> =
        sqlx::query_as("SELECT * FROM design_files WHERE order_id = $1 ORDER BY created_at ASC")
            .bind(id)
            .fetch_all(&state.db)
            .await?;
    let payment_summary = summarize(order.total_price, &payments);

    Ok(Json(OrderDetailResponse {
        order,
        payments,
        designs,
        payment_summary,
    }))
}

/// PATCH /api/v1/orders/:id/status
pub async fn handle_change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<OrderRow>, AppError> {
    let order = fetch_order(&state, id).await?;

    validate_transition(order.status, req.status)
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    let updated: OrderRow = sqlx::query_as(
        "UPDATE orders SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(req.status)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Order {} moved {} -> {}",
        id, order.status, updated.status
    );
    Ok(Json(updated))
}

/// POST /api/v1/orders/:id/payments
pub async fn handle_record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentListResponse>), AppError> {
    if req.amount <= 0 {
        return Err(AppError::UnprocessableEntity(
            "Payment amount must be positive".to_string(),
        ));
    }

    let order = fetch_order(&state, id).await?;
    if is_cancelled(order.status) {
        return Err(AppError::Conflict(
            "Cannot record a payment against a cancelled order".to_string(),
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO payments (id, order_id, amount, method, note, paid_at)
        VALUES ($1, $2, $3, $4, $5, now())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(id)
    .bind(req.amount)
    .bind(req.method)
    .bind(&req.note)
    .execute(&state.db)
    .await?;

    let payments = fetch_payments(&state, id).await?;
    let summary = summarize(order.total_price, &payments);
    info!(
        "Recorded payment of {} on order {} (balance {})",
        req.amount, id, summary.balance
    );

    Ok((
        StatusCode::CREATED,
        Json(PaymentListResponse { payments, summary }),
    ))
}

/// GET /api/v1/orders/:id/payments
pub async fn handle_list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentListResponse>, AppError> {
    let order = fetch_order(&state, id).await?;
    let payments = fetch_payments(&state, id).await?;
    let summary = summarize(order.total_price, &payments);
    Ok(Json(PaymentListResponse { payments, summary }))
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn fetch_order(state: &AppState, id: Uuid) -> Result<OrderRow, AppError> {
    let order: Option<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    order.ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))
}

async fn fetch_payments(state: &AppState, order_id: Uuid) -> Result<Vec<PaymentRow>, AppError> {
    Ok(
        sqlx::query_as("SELECT * FROM payments WHERE order_id = $1 ORDER BY paid_at ASC")
            .bind(order_id)
            .fetch_all(&state.db)
            .await?,
    )
}
