use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub vat_code: Option<String>,
    pub registration_number: Option<String>,
    pub address: Option<String>,
    pub bank_account: Option<String>,
    pub agency_fees: Option<String>,
    pub parent_company_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
