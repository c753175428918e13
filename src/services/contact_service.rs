use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::dto::client_dto::{normalize_linkedin_url, CreateContactPayload, UpdateContactPayload};
use crate::error::{Error, Result};
use crate::models::brand::BrandRef;
use crate::models::contact::{Contact, ContactBrandRow, ContactWithBrands};

#[derive(Clone)]
pub struct ContactService {
    pool: PgPool,
}

impl ContactService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateContactPayload) -> Result<ContactWithBrands> {
        let mut tx = self.pool.begin().await?;

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO client_contacts (
                first_name, last_name, email, phone, linkedin_url,
                birthday_month, birthday_day, responsibility_description,
                should_get_gift, receive_newsletter, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(payload.first_name.trim())
        .bind(payload.last_name.trim())
        .bind(payload.email.trim().to_lowercase())
        .bind(payload.phone)
        .bind(normalize_linkedin_url(payload.linkedin_url))
        .bind(payload.birthday_month)
        .bind(payload.birthday_day)
        .bind(payload.responsibility_description)
        .bind(payload.should_get_gift)
        .bind(payload.receive_newsletter)
        .bind(payload.status.unwrap_or_else(|| "active".to_string()))
        .fetch_one(&mut *tx)
        .await?;

        replace_brands(&mut *tx, contact.id, &payload.brand_ids).await?;
        tx.commit().await?;

        info!(contact_id = contact.id, brands = payload.brand_ids.len(), "contact created");
        self.get_with_brands(contact.id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateContactPayload) -> Result<ContactWithBrands> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE client_contacts
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                linkedin_url = COALESCE($6, linkedin_url),
                birthday_month = COALESCE($7, birthday_month),
                birthday_day = COALESCE($8, birthday_day),
                responsibility_description = COALESCE($9, responsibility_description),
                should_get_gift = COALESCE($10, should_get_gift),
                receive_newsletter = COALESCE($11, receive_newsletter),
                status = COALESCE($12, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(payload.first_name.map(|s| s.trim().to_string()))
        .bind(payload.last_name.map(|s| s.trim().to_string()))
        .bind(payload.email.map(|s| s.trim().to_lowercase()))
        .bind(payload.phone)
        .bind(normalize_linkedin_url(payload.linkedin_url))
        .bind(payload.birthday_month)
        .bind(payload.birthday_day)
        .bind(payload.responsibility_description)
        .bind(payload.should_get_gift)
        .bind(payload.receive_newsletter)
        .bind(payload.status)
        .fetch_optional(&mut *tx)
        .await?;
        if updated.is_none() {
            return Err(Error::NotFound("Contact not found".into()));
        }

        if let Some(brand_ids) = &payload.brand_ids {
            replace_brands(&mut *tx, id, brand_ids).await?;
        }
        tx.commit().await?;

        info!(contact_id = id, "contact updated");
        self.get_with_brands(id).await
    }

    pub async fn get_with_brands(&self, id: i64) -> Result<ContactWithBrands> {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM client_contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Contact not found".into()))?;

        let brands = sqlx::query_as::<_, BrandRef>(
            r#"
            SELECT b.id, b.name FROM brands b
            JOIN contact_brands cb ON cb.brand_id = b.id
            WHERE cb.contact_id = $1
            ORDER BY b.name, b.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ContactWithBrands { contact, brands })
    }

    /// Every contact regardless of status, each with its associated brands.
    pub async fn list_with_brands(&self) -> Result<Vec<ContactWithBrands>> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT * FROM client_contacts ORDER BY last_name, first_name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = contacts.iter().map(|c| c.id).collect();
        let rows = sqlx::query_as::<_, ContactBrandRow>(
            r#"
            SELECT cb.contact_id, b.id AS brand_id, b.name AS brand_name
            FROM contact_brands cb
            JOIN brands b ON b.id = cb.brand_id
            WHERE cb.contact_id = ANY($1)
            ORDER BY b.name, b.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_brands(contacts, rows))
    }
}

/// Swaps the brand set of `contact_id` for `brand_ids`. Unknown ids are ignored.
async fn replace_brands(conn: &mut PgConnection, contact_id: i64, brand_ids: &[i64]) -> Result<()> {
    sqlx::query("DELETE FROM contact_brands WHERE contact_id = $1")
        .bind(contact_id)
        .execute(&mut *conn)
        .await?;

    if brand_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO contact_brands (contact_id, brand_id)
        SELECT $1, id FROM brands WHERE id = ANY($2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(contact_id)
    .bind(brand_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn group_brands(contacts: Vec<Contact>, rows: Vec<ContactBrandRow>) -> Vec<ContactWithBrands> {
    let mut by_contact: HashMap<i64, Vec<BrandRef>> = HashMap::new();
    for row in rows {
        by_contact.entry(row.contact_id).or_default().push(BrandRef {
            id: row.brand_id,
            name: row.brand_name,
        });
    }

    contacts
        .into_iter()
        .map(|contact| {
            let brands = by_contact.remove(&contact.id).unwrap_or_default();
            ContactWithBrands { contact, brands }
        })
        .collect()
}
