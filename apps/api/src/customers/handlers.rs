//! Axum route handlers for the Customers API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::leads::intake::normalize_phone;
use crate::models::customer::CustomerRow;
use crate::models::order::OrderRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub email: Option<String>,
}

/// POST /api/v1/customers
pub async fn handle_create_customer(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Customer name must not be empty".to_string(),
        ));
    }
    let phone = normalize_phone(&req.phone).ok_or_else(|| {
        AppError::UnprocessableEntity(format!("'{}' is not a valid phone number", req.phone))
    })?;

    let customer: CustomerRow = sqlx::query_as(
        r#"
        INSERT INTO customers (id, name, company, phone, email, created_at)
        VALUES ($1, $2, $3, $4, $5, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(&req.company)
    .bind(&phone)
    .bind(&req.email)
    .fetch_one(&state.db)
    .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/v1/customers
pub async fn handle_list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerRow>>, AppError> {
    let customers: Vec<CustomerRow> =
        sqlx::query_as("SELECT * FROM customers ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(customers))
}

/// GET /api/v1/customers/:id
pub async fn handle_get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerRow>, AppError> {
    fetch_customer(&state, id).await.map(Json)
}

/// GET /api/v1/customers/:id/orders
pub async fn handle_customer_orders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<OrderRow>>, AppError> {
    fetch_customer(&state, id).await?;
    let orders: Vec<OrderRow> =
        sqlx::query_as("SELECT * FROM orders WHERE customer_id = $1 ORDER BY created_at DESC")
            .bind(id)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(orders))
}

async fn fetch_customer(state: &AppState, id: Uuid) -> Result<CustomerRow, AppError> {
    let customer: Option<CustomerRow> = sqlx::query_as("SELECT * FROM customers WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    customer.ok_or_else(|| AppError::NotFound(format!("Customer {id} not found")))
}
