//! Axum route handlers for the Leads API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::leads::convert::convert_lead;
use crate::leads::dedup::{check_for_duplicates, ConflictWarning};
use crate::leads::funnel::{funnel_report, validate_transition, FunnelReport};
use crate::leads::intake::validate_intake;
use crate::models::customer::CustomerRow;
use crate::models::lead::{LeadRow, LeadSource, LeadStatus};
use crate::models::order::OrderRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub source: LeadSource,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateLeadResponse {
    pub lead: LeadRow,
    pub conflict_warnings: Vec<ConflictWarning>,
}

#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
}

#[derive(Debug, Deserialize)]
pub struct LeadStatusChangeRequest {
    pub status: LeadStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignLeadRequest {
    /// Pin a specific employee; otherwise the configured allocator decides.
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ConvertLeadResponse {
    pub customer: CustomerRow,
    pub order: OrderRow,
    pub reused_customer: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/leads
pub async fn handle_create_lead(
    State(state): State<AppState>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<CreateLeadResponse>), AppError> {
    let phone = validate_intake(&req.name, &req.phone)
        .map_err(|e| AppError::UnprocessableEntity(e.message))?;

    let existing: Vec<LeadRow> = sqlx::query_as("SELECT * FROM leads")
        .fetch_all(&state.db)
        .await?;
    let conflict_warnings =
        check_for_duplicates(&existing, &req.name, req.company.as_deref(), &phone);

    let lead: LeadRow = sqlx::query_as(
        r#"
        INSERT INTO leads
            (id, name, company, phone, source, status, note, assigned_to,
             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, now(), now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(&req.company)
    .bind(&phone)
    .bind(req.source)
    .bind(LeadStatus::New)
    .bind(&req.note)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Captured lead {} from {} ({} duplicate warning(s))",
        lead.id,
        lead.source,
        conflict_warnings.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateLeadResponse {
            lead,
            conflict_warnings,
        }),
    ))
}

/// GET /api/v1/leads
pub async fn handle_list_leads(
    State(state): State<AppState>,
    Query(params): Query<LeadListQuery>,
) -> Result<Json<Vec<LeadRow>>, AppError> {
    let leads: Vec<LeadRow> = sqlx::query_as(
        r#"
        SELECT * FROM leads
        WHERE ($1::lead_status IS NULL OR status = $1)
          AND ($2::lead_source IS NULL OR source = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(params.status)
    .bind(params.source)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(leads))
}

/// GET /api/v1/leads/funnel
pub async fn handle_funnel_report(
    State(state): State<AppState>,
) -> Result<Json<FunnelReport>, AppError> {
    let leads: Vec<LeadRow> = sqlx::query_as("SELECT * FROM leads")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(funnel_report(&leads)))
}

/// GET /api/v1/leads/:id
pub async fn handle_get_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeadRow>, AppError> {
    let lead = fetch_lead(&state, id).await?;
    Ok(Json(lead))
}

/// PATCH /api/v1/leads/:id/status
pub async fn handle_change_lead_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LeadStatusChangeRequest>,
) -> Result<Json<LeadRow>, AppError> {
    let lead = fetch_lead(&state, id).await?;

    validate_transition(lead.status, req.status)
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    let updated: LeadRow = sqlx::query_as(
        "UPDATE leads SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(req.status)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    info!("Lead {} moved {} -> {}", id, lead.status, updated.status);
    Ok(Json(updated))
}

/// POST /api/v1/leads/:id/assign
pub async fn handle_assign_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignLeadRequest>,
) -> Result<Json<LeadRow>, AppError> {
    let lead = fetch_lead(&state, id).await?;
    if lead.status == LeadStatus::Closed {
        return Err(AppError::Conflict(
            "A closed lead cannot be reassigned".to_string(),
        ));
    }

    let employee = match req.employee_id {
        Some(employee_id) => {
            crate::allocation::fetch_active_employee(&state.db, employee_id).await?
        }
        None => state.allocator.pick(&state.db).await?,
    };

    let updated: LeadRow = sqlx::query_as(
        "UPDATE leads SET assigned_to = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(employee.id)
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    info!("Assigned lead {} to {} ({})", id, employee.name, employee.id);
    Ok(Json(updated))
}

/// POST /api/v1/leads/:id/convert
pub async fn handle_convert_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ConvertLeadResponse>), AppError> {
    let lead = fetch_lead(&state, id).await?;
    let outcome = convert_lead(&state.db, &lead).await?;
    Ok((
        StatusCode::CREATED,
        Json(ConvertLeadResponse {
            customer: outcome.customer,
            order: outcome.order,
            reused_customer: outcome.reused_customer,
        }),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

async fn fetch_lead(state: &AppState, id: Uuid) -> Result<LeadRow, AppError> {
    let lead: Option<LeadRow> = sqlx::query_as("SELECT * FROM leads WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    lead.ok_or_else(|| AppError::NotFound(format!("Lead {id} not found")))
}
