use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One issued quotation version for an order. Rows are append-only: a revised
/// quote is a new version, never an UPDATE.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuotationRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub version: i32,
    /// Priced lines as JSON (`quotation::builder::PricedLine`).
    pub lines: Value,
    /// Minor currency units.
    pub subtotal: i64,
    pub margin_percent: f64,
    /// Minor currency units, margin applied.
    pub total: i64,
    pub valid_until: Option<NaiveDate>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Immutable rendered snapshot of a quotation version uploaded to S3.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuotationSnapshotRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub version: i32,
    pub s3_key: String,
    pub created_at: DateTime<Utc>,
}
