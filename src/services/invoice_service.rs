use sqlx::PgPool;
use tracing::info;

use crate::dto::api_dto::InvoiceQuery;
use crate::dto::client_dto::CreateInvoicePayload;
use crate::error::{Error, Result};
use crate::models::invoice::Invoice;

const INVOICE_SELECT: &str = r#"
    SELECT i.id, i.brand_id, b.name AS brand_name, i.company_id, c.name AS company_name,
           i.invoice_date, i.total_amount, i.short_info, i.created_at
    FROM invoices i
    JOIN brands b ON b.id = i.brand_id
    JOIN companies c ON c.id = i.company_id
"#;

#[derive(Clone)]
pub struct InvoiceService {
    pool: PgPool,
}

impl InvoiceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateInvoicePayload) -> Result<Invoice> {
        let brand_company = sqlx::query_scalar::<_, i64>("SELECT company_id FROM brands WHERE id = $1")
            .bind(payload.brand_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::BadRequest(format!("Brand {} does not exist", payload.brand_id)))?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO invoices (brand_id, company_id, invoice_date, total_amount, short_info)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(payload.brand_id)
        .bind(payload.company_id.unwrap_or(brand_company))
        .bind(payload.invoice_date)
        .bind(payload.total_amount)
        .bind(payload.short_info)
        .fetch_one(&self.pool)
        .await?;

        info!(invoice_id = id, brand_id = payload.brand_id, "invoice created");
        self.get_by_id(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Invoice> {
        sqlx::query_as::<_, Invoice>(&format!("{} WHERE i.id = $1", INVOICE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Invoice not found".into()))
    }

    /// Newest invoice date first; undated invoices last.
    pub async fn list(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, Invoice>(&format!(
            r#"{}
            WHERE ($1::BIGINT IS NULL OR i.brand_id = $1)
              AND ($2::BIGINT IS NULL OR i.company_id = $2)
            ORDER BY i.invoice_date DESC NULLS LAST, i.id DESC"#,
            INVOICE_SELECT
        ))
        .bind(query.brand_id)
        .bind(query.company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
