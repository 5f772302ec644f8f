//! Axum route handlers for the design-asset library.
//!
//! Assets live on Google Drive; this service stores the link (file id +
//! thumbnail URL) and its request/result categorization, never the bytes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::drive::{parse_file_id, thumbnail_url, DriveError};
use crate::errors::AppError;
use crate::models::order::{DesignFileRow, DesignKind};
use crate::orders::handlers::fetch_order;
use crate::state::AppState;

const THUMBNAIL_WIDTH: u32 = 320;

#[derive(Debug, Deserialize)]
pub struct AttachDesignRequest {
    /// A Drive URL or bare file id.
    pub drive_link: String,
    pub kind: DesignKind,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DesignListQuery {
    pub kind: Option<DesignKind>,
}

#[derive(Debug, Deserialize)]
pub struct RecategorizeRequest {
    pub kind: DesignKind,
}

/// POST /api/v1/orders/:id/designs
pub async fn handle_attach_design(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<AttachDesignRequest>,
) -> Result<(StatusCode, Json<DesignFileRow>), AppError> {
    fetch_order(&state, order_id).await?;

    let file_id = parse_file_id(&req.drive_link).ok_or_else(|| {
        AppError::UnprocessableEntity(format!(
            "'{}' is not a Drive file id or share link",
            req.drive_link
        ))
    })?;

    if state.config.drive_probe_enabled {
        match state.drive.probe(&file_id).await {
            Ok(()) => {}
            Err(DriveError::NotFound { file_id }) => {
                return Err(AppError::UnprocessableEntity(format!(
                    "Drive file {file_id} does not resolve (missing or not shared)"
                )));
            }
            Err(e) => return Err(AppError::Drive(e.to_string())),
        }
    }

    let design: DesignFileRow = sqlx::query_as(
        r#"
        INSERT INTO design_files
            (id, order_id, drive_file_id, file_name, thumbnail_url, kind, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(&file_id)
    .bind(&req.file_name)
    .bind(thumbnail_url(&file_id, THUMBNAIL_WIDTH))
    .bind(req.kind)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Attached {} design {} to order {}",
        design.kind, file_id, order_id
    );
    Ok((StatusCode::CREATED, Json(design)))
}

/// GET /api/v1/orders/:id/designs
pub async fn handle_list_designs(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Query(params): Query<DesignListQuery>,
) -> Result<Json<Vec<DesignFileRow>>, AppError> {
    fetch_order(&state, order_id).await?;

    let designs: Vec<DesignFileRow> = sqlx::query_as(
        r#"
        SELECT * FROM design_files
        WHERE order_id = $1
          AND ($2::design_kind IS NULL OR kind = $2)
        ORDER BY created_at ASC
        "#,
    )
    .bind(order_id)
    .bind(params.kind)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(designs))
}

/// PATCH /api/v1/designs/:id
pub async fn handle_recategorize_design(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecategorizeRequest>,
) -> Result<Json<DesignFileRow>, AppError> {
    let updated: Option<DesignFileRow> =
        sqlx::query_as("UPDATE design_files SET kind = $1 WHERE id = $2 RETURNING *")
            .bind(req.kind)
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    updated
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Design file {id} not found")))
}

/// DELETE /api/v1/designs/:id
pub async fn handle_detach_design(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM design_files WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Design file {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
