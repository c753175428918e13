use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanningInfo {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub budget: Option<Decimal>,
    pub planning_period: Option<String>,
    pub planning_status: Option<String>,
    pub planning_info: Option<String>,
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
}
