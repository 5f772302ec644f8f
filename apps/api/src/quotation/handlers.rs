//! Axum route handlers for the Quotation API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::quotation::{QuotationRow, QuotationSnapshotRow};
use crate::orders::handlers::fetch_order;
use crate::quotation::builder::{issue_quotation, IssueParams, QuoteLineRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IssueQuotationRequest {
    pub lines: Vec<QuoteLineRequest>,
    pub margin_percent: Option<f64>,
    pub valid_until: Option<NaiveDate>,
    pub note: Option<String>,
}

/// POST /api/v1/orders/:id/quotations
pub async fn handle_issue_quotation(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<IssueQuotationRequest>,
) -> Result<(StatusCode, Json<QuotationRow>), AppError> {
    let order = fetch_order(&state, order_id).await?;
    let quotation = issue_quotation(
        &state,
        &order,
        IssueParams {
            lines: req.lines,
            margin_percent: req.margin_percent.unwrap_or(0.0),
            valid_until: req.valid_until,
            note: req.note,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

/// GET /api/v1/orders/:id/quotations
pub async fn handle_quotation_history(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<QuotationRow>>, AppError> {
    fetch_order(&state, order_id).await?;
    let history: Vec<QuotationRow> =
        sqlx::query_as("SELECT * FROM quotations WHERE order_id = $1 ORDER BY version ASC")
            .bind(order_id)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(history))
}

/// GET /api/v1/orders/:id/quotations/snapshots
pub async fn handle_snapshot_history(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<QuotationSnapshotRow>>, AppError> {
    fetch_order(&state, order_id).await?;
    let snapshots: Vec<QuotationSnapshotRow> = sqlx::query_as(
        "SELECT * FROM quotation_snapshots WHERE order_id = $1 ORDER BY version ASC",
    )
    .bind(order_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(snapshots))
}

/// GET /api/v1/quotations/:id
pub async fn handle_get_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuotationRow>, AppError> {
    let quotation: Option<QuotationRow> = sqlx::query_as("SELECT * FROM quotations WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    quotation
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Quotation {id} not found")))
}
