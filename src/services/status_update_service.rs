use sqlx::PgPool;
use tracing::info;

use crate::dto::api_dto::StatusUpdateQuery;
use crate::dto::client_dto::CreateStatusUpdatePayload;
use crate::error::{Error, Result};
use crate::models::status_update::StatusUpdate;

const STATUS_UPDATE_SELECT: &str = r#"
    SELECT s.id, s.brand_id, b.name AS brand_name, s.date, s.comment, s.evaluation,
           s.created_by_id, (u.first_name || ' ' || u.last_name) AS created_by_name,
           s.created_at
    FROM status_updates s
    JOIN brands b ON b.id = s.brand_id
    JOIN users u ON u.id = s.created_by_id
"#;

#[derive(Clone)]
pub struct StatusUpdateService {
    pool: PgPool,
}

impl StatusUpdateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author_id: i64, payload: CreateStatusUpdatePayload) -> Result<StatusUpdate> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO status_updates (brand_id, date, comment, evaluation, created_by_id)
            SELECT b.id, COALESCE($2, CURRENT_DATE), $3, COALESCE($4, 'neutral'), $5
            FROM brands b WHERE b.id = $1
            RETURNING id
            "#,
        )
        .bind(payload.brand_id)
        .bind(payload.date)
        .bind(payload.comment.trim())
        .bind(payload.evaluation)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::BadRequest(format!("Brand {} does not exist", payload.brand_id)))?;

        info!(status_update_id = id, brand_id = payload.brand_id, author_id, "status update created");
        self.get_by_id(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<StatusUpdate> {
        sqlx::query_as::<_, StatusUpdate>(&format!("{} WHERE s.id = $1", STATUS_UPDATE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Status update not found".into()))
    }

    /// Most recent first, optionally narrowed to one brand.
    pub async fn list(&self, query: &StatusUpdateQuery) -> Result<Vec<StatusUpdate>> {
        let rows = sqlx::query_as::<_, StatusUpdate>(&format!(
            r#"{}
            WHERE ($1::BIGINT IS NULL OR s.brand_id = $1)
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT $2"#,
            STATUS_UPDATE_SELECT
        ))
        .bind(query.brand_id)
        .bind(query.effective_limit())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<StatusUpdate>> {
        let rows = sqlx::query_as::<_, StatusUpdate>(&format!(
            "{} ORDER BY s.created_at DESC, s.id DESC LIMIT $1",
            STATUS_UPDATE_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
