use sqlx::PgPool;
use tracing::{info, warn};

use crate::dto::management_dto::{name_or_default, CreateApiKeyPayload, DEFAULT_API_KEY_NAME};
use crate::error::{Error, Result};
use crate::models::api_key::ApiKey;
use crate::utils::crypto::hash_api_key;
use crate::utils::token::generate_token;

#[derive(Clone)]
pub struct ApiKeyService {
    pool: PgPool,
}

impl ApiKeyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<ApiKey>> {
        let rows = sqlx::query_as::<_, ApiKey>(
            "SELECT * FROM api_keys WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Stores the hash of a fresh key and returns the raw key alongside the row.
    pub async fn create(&self, user_id: i64, payload: CreateApiKeyPayload) -> Result<(ApiKey, String)> {
        let raw = generate_token();
        let api_key = sqlx::query_as::<_, ApiKey>(
            "INSERT INTO api_keys (name, key_hash, user_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name_or_default(payload.name, DEFAULT_API_KEY_NAME))
        .bind(hash_api_key(&raw))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        info!(api_key_id = api_key.id, user_id, "api key created");
        Ok((api_key, raw))
    }

    pub async fn toggle(&self, user_id: i64, id: i64) -> Result<ApiKey> {
        let api_key = sqlx::query_as::<_, ApiKey>(
            r#"
            UPDATE api_keys SET is_active = NOT is_active
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("API key not found".into()))?;

        info!(api_key_id = id, active = api_key.is_active, "api key toggled");
        Ok(api_key)
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("API key not found".into()));
        }
        info!(api_key_id = id, "api key deleted");
        Ok(())
    }

    /// Looks up an active key by its raw value and records the use in the
    /// same statement.
    pub async fn authenticate(&self, raw: &str) -> Result<Option<ApiKey>> {
        let found = sqlx::query_as::<_, ApiKey>(
            r#"
            UPDATE api_keys
            SET last_used_at = NOW(), use_count = use_count + 1
            WHERE key_hash = $1 AND is_active = TRUE
            RETURNING *
            "#,
        )
        .bind(hash_api_key(raw))
        .fetch_optional(&self.pool)
        .await?;

        if found.is_none() {
            warn!("rejected unknown or inactive api key");
        }
        Ok(found)
    }
}
