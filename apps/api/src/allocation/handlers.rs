//! Axum route handlers for employees and the workload report.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::customer::EmployeeRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmployeeListQuery {
    pub active: Option<bool>,
}

/// Per-employee open work counts for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkloadRow {
    pub employee_id: Uuid,
    pub name: String,
    pub active: bool,
    pub open_leads: i64,
    pub open_orders: i64,
}

/// POST /api/v1/employees
pub async fn handle_create_employee(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Employee name must not be empty".to_string(),
        ));
    }

    let employee: EmployeeRow = sqlx::query_as(
        r#"
        INSERT INTO employees (id, name, phone, role, active, created_at)
        VALUES ($1, $2, $3, $4, TRUE, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(&req.phone)
    .bind(req.role.as_deref().unwrap_or("sales"))
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/v1/employees
pub async fn handle_list_employees(
    State(state): State<AppState>,
    Query(params): Query<EmployeeListQuery>,
) -> Result<Json<Vec<EmployeeRow>>, AppError> {
    let employees: Vec<EmployeeRow> = sqlx::query_as(
        r#"
        SELECT * FROM employees
        WHERE ($1::boolean IS NULL OR active = $1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(params.active)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(employees))
}

/// GET /api/v1/employees/workload
pub async fn handle_workload_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkloadRow>>, AppError> {
    let rows: Vec<WorkloadRow> = sqlx::query_as(
        r#"
        SELECT
            e.id AS employee_id,
            e.name,
            e.active,
            (SELECT COUNT(*) FROM leads l
              WHERE l.assigned_to = e.id
                AND l.status NOT IN ('closed', 'rejected')) AS open_leads,
            (SELECT COUNT(*) FROM orders o
              WHERE o.assigned_to = e.id
                AND o.status NOT IN ('delivered', 'cancelled')) AS open_orders
        FROM employees e
        ORDER BY e.created_at ASC
        "#,
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}
