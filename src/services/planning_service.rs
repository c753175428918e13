use sqlx::PgPool;
use tracing::info;

use crate::dto::api_dto::PlanningInfoQuery;
use crate::dto::client_dto::CreatePlanningInfoPayload;
use crate::error::{Error, Result};
use crate::models::planning_info::PlanningInfo;

const PLANNING_SELECT: &str = r#"
    SELECT p.id, p.brand_id, b.name AS brand_name, p.budget, p.planning_period,
           p.planning_status, p.planning_info, p.created_by_id, p.created_at
    FROM planning_info p
    JOIN brands b ON b.id = p.brand_id
"#;

#[derive(Clone)]
pub struct PlanningService {
    pool: PgPool,
}

impl PlanningService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author_id: i64, payload: CreatePlanningInfoPayload) -> Result<PlanningInfo> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO planning_info (
                brand_id, budget, planning_period, planning_status, planning_info, created_by_id
            )
            SELECT b.id, $2, $3, $4, $5, $6 FROM brands b WHERE b.id = $1
            RETURNING id
            "#,
        )
        .bind(payload.brand_id)
        .bind(payload.budget)
        .bind(payload.planning_period)
        .bind(payload.planning_status)
        .bind(payload.planning_info)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::BadRequest(format!("Brand {} does not exist", payload.brand_id)))?;

        info!(planning_info_id = id, brand_id = payload.brand_id, "planning info created");
        sqlx::query_as::<_, PlanningInfo>(&format!("{} WHERE p.id = $1", PLANNING_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Planning info not found".into()))
    }

    pub async fn list(&self, query: &PlanningInfoQuery) -> Result<Vec<PlanningInfo>> {
        let rows = sqlx::query_as::<_, PlanningInfo>(&format!(
            r#"{}
            WHERE ($1::BIGINT IS NULL OR p.brand_id = $1)
            ORDER BY p.created_at DESC, p.id DESC"#,
            PLANNING_SELECT
        ))
        .bind(query.brand_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
