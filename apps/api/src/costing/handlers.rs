//! Axum route handlers for the costing tables: materials, labor rates, products.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::costing::{LaborRateRow, MaterialRow, ProductKind, ProductRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Materials
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateMaterialRequest {
    pub name: String,
    pub sheet_width_mm: f64,
    pub sheet_height_mm: f64,
    pub cost_per_sheet: i64,
    pub gsm: i32,
}

#[derive(Debug, Deserialize)]
pub struct MaterialListQuery {
    pub active: Option<bool>,
}

/// Price and retirement updates. Materials referenced by products are
/// deactivated, never deleted.
#[derive(Debug, Deserialize)]
pub struct UpdateMaterialRequest {
    pub cost_per_sheet: Option<i64>,
    pub active: Option<bool>,
}

/// POST /api/v1/materials
pub async fn handle_create_material(
    State(state): State<AppState>,
    Json(req): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<MaterialRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Material name must not be empty".to_string(),
        ));
    }
    if req.sheet_width_mm <= 0.0 || req.sheet_height_mm <= 0.0 {
        return Err(AppError::UnprocessableEntity(
            "Sheet dimensions must be positive".to_string(),
        ));
    }
    if req.cost_per_sheet < 0 {
        return Err(AppError::UnprocessableEntity(
            "cost_per_sheet must not be negative".to_string(),
        ));
    }
    if req.gsm <= 0 {
        return Err(AppError::UnprocessableEntity(
            "gsm must be positive".to_string(),
        ));
    }

    let material: MaterialRow = sqlx::query_as(
        r#"
        INSERT INTO materials
            (id, name, sheet_width_mm, sheet_height_mm, cost_per_sheet, gsm, active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(req.sheet_width_mm)
    .bind(req.sheet_height_mm)
    .bind(req.cost_per_sheet)
    .bind(req.gsm)
    .fetch_one(&state.db)
    .await?;

    info!("Added material '{}' ({})", material.name, material.id);
    Ok((StatusCode::CREATED, Json(material)))
}

/// GET /api/v1/materials
pub async fn handle_list_materials(
    State(state): State<AppState>,
    Query(params): Query<MaterialListQuery>,
) -> Result<Json<Vec<MaterialRow>>, AppError> {
    let materials: Vec<MaterialRow> = sqlx::query_as(
        r#"
        SELECT * FROM materials
        WHERE ($1::boolean IS NULL OR active = $1)
        ORDER BY name ASC
        "#,
    )
    .bind(params.active)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(materials))
}

/// GET /api/v1/materials/:id
pub async fn handle_get_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaterialRow>, AppError> {
    let material: Option<MaterialRow> = sqlx::query_as("SELECT * FROM materials WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    material
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Material {id} not found")))
}

/// PATCH /api/v1/materials/:id
pub async fn handle_update_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMaterialRequest>,
) -> Result<Json<MaterialRow>, AppError> {
    if let Some(cost) = req.cost_per_sheet {
        if cost < 0 {
            return Err(AppError::UnprocessableEntity(
                "cost_per_sheet must not be negative".to_string(),
            ));
        }
    }

    let updated: Option<MaterialRow> = sqlx::query_as(
        r#"
        UPDATE materials
        SET cost_per_sheet = COALESCE($1, cost_per_sheet),
            active = COALESCE($2, active)
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(req.cost_per_sheet)
    .bind(req.active)
    .bind(id)
    .fetch_optional(&state.db)
    .await?;
    updated
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Material {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Labor rates
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateLaborRateRequest {
    pub name: String,
    pub hourly_rate: i64,
}

/// POST /api/v1/labor-rates
pub async fn handle_create_labor_rate(
    State(state): State<AppState>,
    Json(req): Json<CreateLaborRateRequest>,
) -> Result<(StatusCode, Json<LaborRateRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Labor rate name must not be empty".to_string(),
        ));
    }
    if req.hourly_rate < 0 {
        return Err(AppError::UnprocessableEntity(
            "hourly_rate must not be negative".to_string(),
        ));
    }

    let rate: LaborRateRow = sqlx::query_as(
        r#"
        INSERT INTO labor_rates (id, name, hourly_rate, created_at)
        VALUES ($1, $2, $3, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(req.hourly_rate)
    .fetch_one(&state.db)
    .await?;
    Ok((StatusCode::CREATED, Json(rate)))
}

/// GET /api/v1/labor-rates
pub async fn handle_list_labor_rates(
    State(state): State<AppState>,
) -> Result<Json<Vec<LaborRateRow>>, AppError> {
    let rates: Vec<LaborRateRow> = sqlx::query_as("SELECT * FROM labor_rates ORDER BY name ASC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rates))
}

// ────────────────────────────────────────────────────────────────────────────
// Products
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub kind: ProductKind,
    pub default_material_id: Option<Uuid>,
    pub base_setup_fee: Option<i64>,
}

/// POST /api/v1/products
pub async fn handle_create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductRow>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Product name must not be empty".to_string(),
        ));
    }

    if let Some(material_id) = req.default_material_id {
        let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM materials WHERE id = $1")
            .bind(material_id)
            .fetch_optional(&state.db)
            .await?;
        if exists.is_none() {
            return Err(AppError::UnprocessableEntity(format!(
                "Unknown material {material_id}"
            )));
        }
    }

    let product: ProductRow = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, kind, default_material_id, base_setup_fee, created_at)
        VALUES ($1, $2, $3, $4, $5, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(req.kind)
    .bind(req.default_material_id)
    .bind(req.base_setup_fee.unwrap_or(0))
    .fetch_one(&state.db)
    .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products
pub async fn handle_list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductRow>>, AppError> {
    let products: Vec<ProductRow> = sqlx::query_as("SELECT * FROM products ORDER BY name ASC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(products))
}

/// GET /api/v1/products/:id
pub async fn handle_get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductRow>, AppError> {
    let product: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    product
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
}
