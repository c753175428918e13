use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub company_id: i64,
    pub company_name: String,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub short_info: Option<String>,
    pub created_at: DateTime<Utc>,
}
