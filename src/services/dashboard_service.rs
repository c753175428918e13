use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::dto::api_dto::StatusUpdateResponse;
use crate::error::Result;
use crate::models::brand::BrandRef;
use crate::services::status_update_service::StatusUpdateService;

const RECENT_UPDATES: i64 = 10;
const RISK_BRANDS: i64 = 5;

#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct DashboardCounts {
    pub companies: i64,
    pub brands: i64,
    pub contacts: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    #[serde(flatten)]
    pub counts: DashboardCounts,
    pub recent_updates: Vec<StatusUpdateResponse>,
    pub risk_brands: Vec<BrandRef>,
}

#[derive(Clone)]
pub struct DashboardService {
    pool: PgPool,
    status_updates: StatusUpdateService,
}

impl DashboardService {
    pub fn new(pool: PgPool, status_updates: StatusUpdateService) -> Self {
        Self { pool, status_updates }
    }

    pub async fn summary(&self) -> Result<DashboardSummary> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM companies WHERE status = 'active') AS companies,
                (SELECT COUNT(*) FROM brands WHERE status = 'active') AS brands,
                (SELECT COUNT(*) FROM client_contacts WHERE status = 'active') AS contacts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let recent_updates = self
            .status_updates
            .recent(RECENT_UPDATES)
            .await?
            .into_iter()
            .map(StatusUpdateResponse::from)
            .collect();

        // Brands ranked by their latest risk evaluation.
        let risk_brands = sqlx::query_as::<_, BrandRef>(
            r#"
            SELECT b.id, b.name
            FROM status_updates s
            JOIN brands b ON b.id = s.brand_id
            WHERE s.evaluation = 'risk'
            GROUP BY b.id, b.name
            ORDER BY MAX(s.created_at) DESC, b.id
            LIMIT $1
            "#,
        )
        .bind(RISK_BRANDS)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardSummary {
            counts,
            recent_updates,
            risk_brands,
        })
    }
}
