//! Quotation assembly: prices every line through the layout + cost pipeline,
//! stores the result append-only, and uploads a rendered markdown snapshot.

use aws_sdk_s3::primitives::ByteStream;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::cost::{round_half_up, CostBreakdown};
use crate::layout::handlers::{estimate, PricingParams};
use crate::layout::sheet::{Footprint, Sheet};
use crate::models::order::OrderRow;
use crate::models::quotation::QuotationRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// One requested quotation line, before pricing.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteLineRequest {
    pub description: String,
    pub footprint: Footprint,
    pub quantity: u32,
    pub material_id: Option<Uuid>,
    pub sheet: Option<Sheet>,
    pub cost_per_sheet: Option<i64>,
    pub labor_hours: Option<f64>,
    pub labor_rate_id: Option<Uuid>,
    pub hourly_rate: Option<i64>,
    pub setup_fee: Option<i64>,
}

/// One priced line as stored in `quotations.lines`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    pub description: String,
    pub footprint: Footprint,
    pub quantity: u32,
    pub per_sheet: u32,
    pub sheets: u32,
    pub utilization: f64,
    pub cost: CostBreakdown,
}

pub struct IssueParams {
    pub lines: Vec<QuoteLineRequest>,
    pub margin_percent: f64,
    pub valid_until: Option<NaiveDate>,
    pub note: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Issue flow
// ────────────────────────────────────────────────────────────────────────────

/// Prices the lines and commits a new quotation version for the order.
/// CRITICAL: quotations are append-only. A revision is `max(version)+1`,
/// never an UPDATE; the S3 snapshot uploads before the transaction commits so
/// the row and its snapshot cannot diverge.
pub async fn issue_quotation(
    state: &AppState,
    order: &OrderRow,
    params: IssueParams,
) -> Result<QuotationRow, AppError> {
    if params.lines.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "A quotation needs at least one line".to_string(),
        ));
    }
    if params.margin_percent < 0.0 {
        return Err(AppError::UnprocessableEntity(
            "margin_percent must not be negative".to_string(),
        ));
    }

    let mut priced = Vec::with_capacity(params.lines.len());
    for (index, line) in params.lines.iter().enumerate() {
        let pricing = line_pricing(line);
        let result = estimate(state, line.footprint, line.quantity, &pricing)
            .await
            .map_err(|e| match e {
                AppError::UnprocessableEntity(msg) => {
                    AppError::UnprocessableEntity(format!("line {}: {msg}", index + 1))
                }
                AppError::Validation(msg) => {
                    AppError::Validation(format!("line {}: {msg}", index + 1))
                }
                other => other,
            })?;
        priced.push(PricedLine {
            description: line.description.clone(),
            footprint: result.footprint,
            quantity: result.quantity,
            per_sheet: result.plan.per_sheet,
            sheets: result.sheets,
            utilization: result.plan.utilization,
            cost: result.cost,
        });
    }

    let subtotal: i64 = priced.iter().map(|l| l.cost.subtotal).sum();
    let margin = round_half_up(subtotal as f64 * params.margin_percent / 100.0);
    let total = subtotal + margin;
    let lines_json = serde_json::to_value(&priced).map_err(anyhow::Error::from)?;

    let mut tx = state.db.begin().await?;

    // 1. Determine next version for this order
    let current_max: Option<i32> =
        sqlx::query_scalar("SELECT MAX(version) FROM quotations WHERE order_id = $1")
            .bind(order.id)
            .fetch_one(&mut *tx)
            .await?;
    let new_version = current_max.unwrap_or(0) + 1;

    // 2. Append-only INSERT
    let quotation: QuotationRow = sqlx::query_as(
        r#"
        INSERT INTO quotations
            (id, order_id, version, lines, subtotal, margin_percent, total,
             valid_until, note, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(new_version)
    .bind(&lines_json)
    .bind(subtotal)
    .bind(params.margin_percent)
    .bind(total)
    .bind(params.valid_until)
    .bind(&params.note)
    .fetch_one(&mut *tx)
    .await?;

    // 3. Render the snapshot document
    let md_content = render_quotation_md(&quotation, &priced, &order.title);

    // 4. Upload markdown snapshot to S3 before committing
    let s3_key = format!("quotes/{}/v{}.md", order.id, new_version);
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(md_content.into_bytes()))
        .content_type("text/markdown")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Snapshot upload failed: {e}")))?;

    // 5. Record snapshot
    sqlx::query(
        r#"
        INSERT INTO quotation_snapshots (id, order_id, version, s3_key, created_at)
        VALUES ($1, $2, $3, $4, now())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(new_version)
    .bind(&s3_key)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Issued quotation v{} for order {} (total {})",
        new_version, order.id, total
    );

    Ok(quotation)
}

fn line_pricing(line: &QuoteLineRequest) -> PricingParams {
    PricingParams {
        material_id: line.material_id,
        sheet: line.sheet,
        cost_per_sheet: line.cost_per_sheet,
        labor_hours: line.labor_hours,
        labor_rate_id: line.labor_rate_id,
        hourly_rate: line.hourly_rate,
        setup_fee: line.setup_fee,
        // Margin applies once at the quotation level, not per line.
        margin_percent: Some(0.0),
        options: None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshot rendering
// ────────────────────────────────────────────────────────────────────────────

/// Formats minor currency units as a decimal string ("12345" → "123.45").
pub fn format_money(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Renders a quotation version as a structured markdown document.
pub fn render_quotation_md(
    quotation: &QuotationRow,
    lines: &[PricedLine],
    order_title: &str,
) -> String {
    let mut md = format!(
        "# Quotation v{} — {}\n\nOrder: {}\n",
        quotation.version, order_title, quotation.order_id
    );
    if let Some(valid_until) = quotation.valid_until {
        md.push_str(&format!("Valid until: {valid_until}\n"));
    }
    md.push('\n');

    md.push_str("| # | Item | Qty | Per sheet | Sheets | Line total |\n");
    md.push_str("|---|------|-----|-----------|--------|------------|\n");
    for (i, line) in lines.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {} ({:.0}x{:.0}mm) | {} | {} | {} | {} |\n",
            i + 1,
            line.description,
            line.footprint.width_mm,
            line.footprint.height_mm,
            line.quantity,
            line.per_sheet,
            line.sheets,
            format_money(line.cost.subtotal),
        ));
    }

    md.push_str(&format!(
        "\nSubtotal: {}\nMargin ({}%): {}\n**Total: {}**\n",
        format_money(quotation.subtotal),
        quotation.margin_percent,
        format_money(quotation.total - quotation.subtotal),
        format_money(quotation.total),
    ));

    if let Some(note) = &quotation.note {
        md.push_str(&format!("\n> {note}\n"));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_line(subtotal: i64) -> PricedLine {
        PricedLine {
            description: "Shopper bag".to_string(),
            footprint: Footprint::new(720.0, 470.0),
            quantity: 500,
            per_sheet: 2,
            sheets: 250,
            utilization: 0.84,
            cost: CostBreakdown {
                material: subtotal,
                labor: 0,
                setup_fee: 0,
                subtotal,
                margin: 0,
                total: subtotal,
            },
        }
    }

    fn make_quotation(lines: &[PricedLine], margin_percent: f64) -> QuotationRow {
        let subtotal: i64 = lines.iter().map(|l| l.cost.subtotal).sum();
        let margin = ((subtotal as f64 * margin_percent / 100.0) + 0.5).floor() as i64;
        QuotationRow {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            version: 2,
            lines: serde_json::to_value(lines).unwrap(),
            subtotal,
            margin_percent,
            total: subtotal + margin,
            valid_until: NaiveDate::from_ymd_opt(2026, 9, 30),
            note: Some("Delivery included".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0), "0.00");
        assert_eq!(format_money(5), "0.05");
        assert_eq!(format_money(12_345), "123.45");
        assert_eq!(format_money(-250), "-2.50");
    }

    #[test]
    fn test_render_contains_header_and_totals() {
        let lines = vec![make_line(30_000)];
        let q = make_quotation(&lines, 20.0);
        let md = render_quotation_md(&q, &lines, "500 shopper bags");

        assert!(md.starts_with("# Quotation v2 — 500 shopper bags"));
        assert!(md.contains("Valid until: 2026-09-30"));
        assert!(md.contains("| 1 | Shopper bag (720x470mm) | 500 | 2 | 250 | 300.00 |"));
        assert!(md.contains("Subtotal: 300.00"));
        assert!(md.contains("Margin (20%): 60.00"));
        assert!(md.contains("**Total: 360.00**"));
        assert!(md.contains("> Delivery included"));
    }

    #[test]
    fn test_render_without_optional_fields() {
        let lines = vec![make_line(10_000)];
        let mut q = make_quotation(&lines, 0.0);
        q.valid_until = None;
        q.note = None;
        let md = render_quotation_md(&q, &lines, "Flyers");
        assert!(!md.contains("Valid until"));
        assert!(!md.contains('>'));
        assert!(md.contains("**Total: 100.00**"));
    }
}
