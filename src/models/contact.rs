use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::brand::BrandRef;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub birthday_month: Option<i16>,
    pub birthday_day: Option<i16>,
    pub responsibility_description: Option<String>,
    pub should_get_gift: bool,
    pub receive_newsletter: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactWithBrands {
    #[serde(flatten)]
    pub contact: Contact,
    pub brands: Vec<BrandRef>,
}

/// Row shape used when loading brand associations for many contacts at once.
#[derive(Debug, Clone, FromRow)]
pub struct ContactBrandRow {
    pub contact_id: i64,
    pub brand_id: i64,
    pub brand_name: String,
}
