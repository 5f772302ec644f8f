//! Sales allocation — pluggable, trait-based choice of which active employee
//! receives a new lead.
//!
//! Default: `RoundRobinAllocator` (oldest last assignment first).
//! Alternative: `LeastLoadedAllocator` (fewest open leads first).
//!
//! `AppState` holds an `Arc<dyn Allocator>`, swapped at startup via
//! `ALLOCATION_STRATEGY`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::customer::EmployeeRow;

pub mod handlers;

/// The allocator trait. Implement this to swap strategies without touching
/// the endpoint, handler, or caller code.
#[async_trait]
pub trait Allocator: Send + Sync {
    /// Picks the active employee who should take the next lead.
    async fn pick(&self, pool: &PgPool) -> Result<EmployeeRow, AppError>;
}

/// Rotates through active employees: whoever was assigned a lead longest ago
/// (never-assigned employees first, then by seniority for a stable order).
pub struct RoundRobinAllocator;

#[async_trait]
impl Allocator for RoundRobinAllocator {
    async fn pick(&self, pool: &PgPool) -> Result<EmployeeRow, AppError> {
        let employee: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT e.*
            FROM employees e
            LEFT JOIN LATERAL (
                SELECT MAX(l.updated_at) AS last_assigned
                FROM leads l
                WHERE l.assigned_to = e.id
            ) la ON TRUE
            WHERE e.active
            ORDER BY la.last_assigned ASC NULLS FIRST, e.created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;
        employee.ok_or_else(no_active_employees)
    }
}

/// Picks the active employee with the fewest open (non-terminal) leads.
pub struct LeastLoadedAllocator;

#[async_trait]
impl Allocator for LeastLoadedAllocator {
    async fn pick(&self, pool: &PgPool) -> Result<EmployeeRow, AppError> {
        let employee: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT e.*
            FROM employees e
            WHERE e.active
            ORDER BY (
                SELECT COUNT(*)
                FROM leads l
                WHERE l.assigned_to = e.id
                  AND l.status NOT IN ('closed', 'rejected')
            ) ASC, e.created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;
        employee.ok_or_else(no_active_employees)
    }
}

fn no_active_employees() -> AppError {
    AppError::Conflict("No active employees to allocate".to_string())
}

/// Resolves the configured strategy name; unknown values fall back to
/// round-robin with a warning rather than failing startup.
pub fn allocator_from_config(strategy: &str) -> Arc<dyn Allocator> {
    match strategy {
        "least_loaded" => Arc::new(LeastLoadedAllocator),
        "round_robin" => Arc::new(RoundRobinAllocator),
        other => {
            warn!("Unknown ALLOCATION_STRATEGY '{other}', using round_robin");
            Arc::new(RoundRobinAllocator)
        }
    }
}

/// Fetches an explicitly pinned employee, rejecting unknown or inactive ones.
pub async fn fetch_active_employee(pool: &PgPool, id: Uuid) -> Result<EmployeeRow, AppError> {
    let employee: Option<EmployeeRow> = sqlx::query_as("SELECT * FROM employees WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let employee =
        employee.ok_or_else(|| AppError::UnprocessableEntity(format!("Unknown employee {id}")))?;
    if !employee.active {
        return Err(AppError::Conflict(format!(
            "Employee '{}' is inactive",
            employee.name
        )));
    }
    Ok(employee)
}
