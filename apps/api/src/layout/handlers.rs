//! Axum route handlers for the layout estimate API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::cost::{roll_up, CostBreakdown, CostInputs};
use crate::layout::dieline::{bag_footprint, box_footprint, BagSpec, BoxSpec};
use crate::layout::sheet::{plan_sheet, sheets_needed, Footprint, LayoutOptions, LayoutPlan, Sheet};
use crate::models::costing::{LaborRateRow, MaterialRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Material, labor, and imposition parameters shared by all estimate endpoints.
///
/// Material is either a `material_id` resolved from the costing tables or an
/// inline `sheet` + `cost_per_sheet`; labor likewise by id or inline rate.
#[derive(Debug, Deserialize)]
pub struct PricingParams {
    pub material_id: Option<Uuid>,
    pub sheet: Option<Sheet>,
    pub cost_per_sheet: Option<i64>,
    pub labor_hours: Option<f64>,
    pub labor_rate_id: Option<Uuid>,
    pub hourly_rate: Option<i64>,
    pub setup_fee: Option<i64>,
    pub margin_percent: Option<f64>,
    pub options: Option<LayoutOptions>,
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub footprint: Footprint,
    pub quantity: u32,
    #[serde(flatten)]
    pub pricing: PricingParams,
}

#[derive(Debug, Deserialize)]
pub struct BagEstimateRequest {
    pub bag: BagSpec,
    pub quantity: u32,
    #[serde(flatten)]
    pub pricing: PricingParams,
}

#[derive(Debug, Deserialize)]
pub struct BoxEstimateRequest {
    #[serde(rename = "box")]
    pub box_spec: BoxSpec,
    pub quantity: u32,
    #[serde(flatten)]
    pub pricing: PricingParams,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    /// The imposed footprint (for bag/box: the derived flat pattern).
    pub footprint: Footprint,
    pub sheet: Sheet,
    pub plan: LayoutPlan,
    pub quantity: u32,
    pub sheets: u32,
    pub cost: CostBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/layout/estimate
pub async fn handle_estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let response = estimate(&state, req.footprint, req.quantity, &req.pricing).await?;
    Ok(Json(response))
}

/// POST /api/v1/layout/bag
pub async fn handle_bag_estimate(
    State(state): State<AppState>,
    Json(req): Json<BagEstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let footprint =
        bag_footprint(&req.bag).map_err(|e| AppError::UnprocessableEntity(e.message))?;
    let response = estimate(&state, footprint, req.quantity, &req.pricing).await?;
    Ok(Json(response))
}

/// POST /api/v1/layout/box
pub async fn handle_box_estimate(
    State(state): State<AppState>,
    Json(req): Json<BoxEstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let footprint =
        box_footprint(&req.box_spec).map_err(|e| AppError::UnprocessableEntity(e.message))?;
    let response = estimate(&state, footprint, req.quantity, &req.pricing).await?;
    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Shared estimate pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs one footprint through plan → sheets → cost. Used by the three
/// endpoints above and by `quotation::builder` for per-line pricing.
pub async fn estimate(
    state: &AppState,
    footprint: Footprint,
    quantity: u32,
    pricing: &PricingParams,
) -> Result<EstimateResponse, AppError> {
    let (sheet, cost_per_sheet) = resolve_material(state, pricing).await?;
    let hourly_rate = resolve_hourly_rate(state, pricing).await?;
    let options = pricing.options.unwrap_or(state.layout_defaults);

    let plan = plan_sheet(footprint, sheet, options);
    let sheets = sheets_needed(plan.per_sheet, quantity).ok_or_else(|| {
        AppError::UnprocessableEntity(format!(
            "footprint {:.0}x{:.0}mm does not fit on sheet {:.0}x{:.0}mm in either orientation",
            footprint.width_mm, footprint.height_mm, sheet.width_mm, sheet.height_mm
        ))
    })?;

    let cost = roll_up(&CostInputs {
        sheets,
        cost_per_sheet,
        labor_hours: pricing.labor_hours.unwrap_or(0.0),
        hourly_rate,
        setup_fee: pricing.setup_fee.unwrap_or(0),
        margin_percent: pricing.margin_percent.unwrap_or(0.0),
    });

    Ok(EstimateResponse {
        footprint,
        sheet,
        plan,
        quantity,
        sheets,
        cost,
    })
}

async fn resolve_material(
    state: &AppState,
    pricing: &PricingParams,
) -> Result<(Sheet, i64), AppError> {
    if let Some(material_id) = pricing.material_id {
        let material: Option<MaterialRow> =
            sqlx::query_as("SELECT * FROM materials WHERE id = $1")
                .bind(material_id)
                .fetch_optional(&state.db)
                .await?;
        let material = material.ok_or_else(|| {
            AppError::UnprocessableEntity(format!("Unknown material {material_id}"))
        })?;
        if !material.active {
            return Err(AppError::UnprocessableEntity(format!(
                "Material '{}' is inactive",
                material.name
            )));
        }
        return Ok((
            Sheet::new(material.sheet_width_mm, material.sheet_height_mm),
            material.cost_per_sheet,
        ));
    }

    match (pricing.sheet, pricing.cost_per_sheet) {
        (Some(sheet), Some(cost)) => Ok((sheet, cost)),
        _ => Err(AppError::Validation(
            "Provide either material_id or both sheet and cost_per_sheet".to_string(),
        )),
    }
}

async fn resolve_hourly_rate(state: &AppState, pricing: &PricingParams) -> Result<i64, AppError> {
    if let Some(rate_id) = pricing.labor_rate_id {
        let rate: Option<LaborRateRow> = sqlx::query_as("SELECT * FROM labor_rates WHERE id = $1")
            .bind(rate_id)
            .fetch_optional(&state.db)
            .await?;
        let rate = rate
            .ok_or_else(|| AppError::UnprocessableEntity(format!("Unknown labor rate {rate_id}")))?;
        return Ok(rate.hourly_rate);
    }
    Ok(pricing.hourly_rate.unwrap_or(0))
}
