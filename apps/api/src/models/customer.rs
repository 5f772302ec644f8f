use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sales employee eligible for lead/order allocation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
