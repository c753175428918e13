use sqlx::PgPool;
use tracing::info;

use crate::dto::client_dto::{CreateCompanyPayload, UpdateCompanyPayload};
use crate::error::{Error, Result};
use crate::models::brand::BrandRef;
use crate::models::company::Company;

#[derive(Clone)]
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCompanyPayload) -> Result<Company> {
        let status = payload.status.unwrap_or_else(|| "active".to_string());
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (
                name, vat_code, registration_number, address,
                bank_account, agency_fees, parent_company_id, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(blank_to_none(payload.vat_code))
        .bind(blank_to_none(payload.registration_number))
        .bind(payload.address)
        .bind(payload.bank_account)
        .bind(payload.agency_fees)
        .bind(payload.parent_company_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        info!(company_id = company.id, "company created");
        Ok(company)
    }

    pub async fn update(&self, id: i64, payload: UpdateCompanyPayload) -> Result<Company> {
        if payload.parent_company_id == Some(id) {
            return Err(Error::BadRequest("A company cannot be its own parent".into()));
        }

        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET
                name = COALESCE($2, name),
                vat_code = COALESCE($3, vat_code),
                registration_number = COALESCE($4, registration_number),
                address = COALESCE($5, address),
                bank_account = COALESCE($6, bank_account),
                agency_fees = COALESCE($7, agency_fees),
                parent_company_id = COALESCE($8, parent_company_id),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.map(|n| n.trim().to_string()))
        .bind(blank_to_none(payload.vat_code))
        .bind(blank_to_none(payload.registration_number))
        .bind(payload.address)
        .bind(payload.bank_account)
        .bind(payload.agency_fees)
        .bind(payload.parent_company_id)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Company not found".into()))?;

        info!(company_id = company.id, "company updated");
        Ok(company)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Company> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Company not found".into()))
    }

    pub async fn list_active(&self) -> Result<Vec<Company>> {
        let rows = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE status = 'active' ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn brands_of(&self, company_id: i64) -> Result<Vec<BrandRef>> {
        let rows = sqlx::query_as::<_, BrandRef>(
            "SELECT id, name FROM brands WHERE company_id = $1 ORDER BY name, id",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Empty optional identifiers are stored as NULL so they do not collide on
/// unique constraints.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::blank_to_none;

    #[test]
    fn blank_vat_codes_become_null() {
        assert_eq!(blank_to_none(Some("  ".into())), None);
        assert_eq!(blank_to_none(Some(" LT123 ".into())).as_deref(), Some("LT123"));
        assert_eq!(blank_to_none(None), None);
    }
}
