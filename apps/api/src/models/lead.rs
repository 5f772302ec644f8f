use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Funnel position of a lead. Transitions are validated by `leads::funnel`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, EnumString, Display,
)]
#[sqlx(type_name = "lead_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeadStatus {
    New,
    Calling,
    Quoted,
    Closed,
    Rejected,
}

/// Marketing channel the lead came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, EnumString, Display,
)]
#[sqlx(type_name = "lead_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeadSource {
    Referral,
    Website,
    Instagram,
    WalkIn,
    Marketplace,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    /// Normalized: digits and a leading `+` only. See `leads::intake`.
    pub phone: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub note: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
