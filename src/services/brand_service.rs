use sqlx::PgPool;
use tracing::info;

use crate::dto::client_dto::{CreateBrandPayload, UpdateBrandPayload};
use crate::error::{Error, Result};
use crate::models::brand::Brand;
use crate::models::contact::Contact;

const BRAND_SELECT: &str = r#"
    SELECT b.id, b.name, b.company_id, c.name AS company_name,
           b.status, b.created_at, b.updated_at
    FROM brands b
    JOIN companies c ON c.id = b.company_id
"#;

#[derive(Clone)]
pub struct BrandService {
    pool: PgPool,
}

impl BrandService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateBrandPayload) -> Result<Brand> {
        self.ensure_company(payload.company_id).await?;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO brands (name, company_id, status) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(payload.name.trim())
        .bind(payload.company_id)
        .bind(payload.status.unwrap_or_else(|| "active".to_string()))
        .fetch_one(&self.pool)
        .await?;

        info!(brand_id = id, company_id = payload.company_id, "brand created");
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateBrandPayload) -> Result<Brand> {
        if let Some(company_id) = payload.company_id {
            self.ensure_company(company_id).await?;
        }
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE brands
            SET
                name = COALESCE($2, name),
                company_id = COALESCE($3, company_id),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(payload.name.map(|n| n.trim().to_string()))
        .bind(payload.company_id)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await?;
        if updated.is_none() {
            return Err(Error::NotFound("Brand not found".into()));
        }

        info!(brand_id = id, "brand updated");
        self.get_by_id(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Brand> {
        sqlx::query_as::<_, Brand>(&format!("{} WHERE b.id = $1", BRAND_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Brand not found".into()))
    }

    pub async fn list_active(&self) -> Result<Vec<Brand>> {
        let rows = sqlx::query_as::<_, Brand>(&format!(
            "{} WHERE b.status = 'active' ORDER BY c.name, b.name, b.id",
            BRAND_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn contacts_of(&self, brand_id: i64) -> Result<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(
            r#"
            SELECT cc.* FROM client_contacts cc
            JOIN contact_brands cb ON cb.contact_id = cc.id
            WHERE cb.brand_id = $1
            ORDER BY cc.last_name, cc.first_name, cc.id
            "#,
        )
        .bind(brand_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ensure_company(&self, company_id: i64) -> Result<()> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM companies WHERE id = $1")
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        match exists {
            Some(_) => Ok(()),
            None => Err(Error::BadRequest(format!("Company {} does not exist", company_id))),
        }
    }
}
