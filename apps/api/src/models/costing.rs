use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Paper stock priced per sheet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaterialRow {
    pub id: Uuid,
    pub name: String,
    pub sheet_width_mm: f64,
    pub sheet_height_mm: f64,
    /// Minor currency units per sheet.
    pub cost_per_sheet: i64,
    pub gsm: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LaborRateRow {
    pub id: Uuid,
    pub name: String,
    /// Minor currency units per hour.
    pub hourly_rate: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, EnumString, Display,
)]
#[sqlx(type_name = "product_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductKind {
    Bag,
    Box,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub kind: ProductKind,
    pub default_material_id: Option<Uuid>,
    /// Minor currency units.
    pub base_setup_fee: i64,
    pub created_at: DateTime<Utc>,
}
