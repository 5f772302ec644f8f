use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::customer::CustomerRow;
use crate::models::lead::{LeadRow, LeadStatus};
use crate::models::order::{OrderRow, OrderStatus};

pub struct ConversionOutcome {
    pub customer: CustomerRow,
    pub order: OrderRow,
    /// True when an existing customer matched the lead's phone.
    pub reused_customer: bool,
}

/// Converts a Quoted lead into a Customer + Pending Order and closes the lead.
///
/// CRITICAL: the three writes are one transaction — a half-converted lead
/// (customer without order, or order with a still-open lead) must be impossible.
pub async fn convert_lead(pool: &PgPool, lead: &LeadRow) -> Result<ConversionOutcome, AppError> {
    if lead.status != LeadStatus::Quoted {
        return Err(AppError::Conflict(format!(
            "Only a quoted lead can convert; lead {} is {}",
            lead.id, lead.status
        )));
    }

    let mut tx = pool.begin().await?;

    // Reuse the customer if the normalized phone already exists.
    let existing: Option<CustomerRow> = sqlx::query_as("SELECT * FROM customers WHERE phone = $1")
        .bind(&lead.phone)
        .fetch_optional(&mut *tx)
        .await?;

    let reused_customer = existing.is_some();
    let customer: CustomerRow = match existing {
        Some(c) => c,
        None => {
            sqlx::query_as(
                r#"
                INSERT INTO customers (id, name, company, phone, email, created_at)
                VALUES ($1, $2, $3, $4, NULL, now())
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&lead.name)
            .bind(&lead.company)
            .bind(&lead.phone)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    let order: OrderRow = sqlx::query_as(
        r#"
        INSERT INTO orders
            (id, customer_id, title, description, status, quantity, due_date,
             total_price, assigned_to, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, 1, NULL, 0, $6, now(), now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(customer.id)
    .bind(format!("Order for {}", lead.name))
    .bind(&lead.note)
    .bind(OrderStatus::Pending)
    .bind(lead.assigned_to)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE leads SET status = $1, updated_at = now() WHERE id = $2")
        .bind(LeadStatus::Closed)
        .bind(lead.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        "Converted lead {} into customer {} / order {} (reused customer: {})",
        lead.id, customer.id, order.id, reused_customer
    );

    Ok(ConversionOutcome {
        customer,
        order,
        reused_customer,
    })
}
