use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Production state of an order. Transitions are validated by `orders::status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, EnumString, Display,
)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Designing,
    Approved,
    Printing,
    Completed,
    Delivered,
    Cancelled,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, EnumString, Display,
)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: OrderStatus,
    pub quantity: i32,
    pub due_date: Option<NaiveDate>,
    /// Agreed price in minor currency units.
    pub total_price: i64,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Minor currency units.
    pub amount: i64,
    pub method: PaymentMethod,
    pub note: Option<String>,
    pub paid_at: DateTime<Utc>,
}

/// Reference to a design asset on Google Drive attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DesignFileRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub drive_file_id: String,
    pub file_name: Option<String>,
    pub thumbnail_url: String,
    pub kind: DesignKind,
    pub created_at: DateTime<Utc>,
}

/// Whether the asset was supplied by the client (request) or produced by the
/// studio (result).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, EnumString, Display,
)]
#[sqlx(type_name = "design_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DesignKind {
    Request,
    Result,
}
