use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusUpdate {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub date: NaiveDate,
    pub comment: String,
    pub evaluation: String,
    pub created_by_id: i64,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
}

pub const EVALUATIONS: [&str; 3] = ["good", "neutral", "risk"];
