use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::status_update::EVALUATIONS;

fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

fn validate_record_status(status: &str) -> Result<(), ValidationError> {
    one_of(status, &["active", "inactive"], "invalid_status")
}

fn validate_contact_status(status: &str) -> Result<(), ValidationError> {
    one_of(status, &["active", "passive"], "invalid_status")
}

fn validate_evaluation(evaluation: &str) -> Result<(), ValidationError> {
    one_of(evaluation, &EVALUATIONS, "invalid_evaluation")
}

/// Profile URLs are stored with a scheme; bare `linkedin.com/in/...` gets `https://`.
pub fn normalize_linkedin_url(raw: Option<String>) -> Option<String> {
    let url = raw?.trim().to_string();
    if url.is_empty() {
        None
    } else if url.starts_with("http://") || url.starts_with("https://") {
        Some(url)
    } else {
        Some(format!("https://{}", url))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 50))]
    pub vat_code: Option<String>,
    #[validate(length(max = 100))]
    pub registration_number: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub bank_account: Option<String>,
    pub agency_fees: Option<String>,
    pub parent_company_id: Option<i64>,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub vat_code: Option<String>,
    #[validate(length(max = 100))]
    pub registration_number: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub bank_account: Option<String>,
    pub agency_fees: Option<String>,
    pub parent_company_id: Option<i64>,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrandPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub company_id: i64,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBrandPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub company_id: Option<i64>,
    #[validate(custom(function = "validate_record_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContactPayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email, length(max = 120))]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub linkedin_url: Option<String>,
    #[validate(range(min = 1, max = 12))]
    pub birthday_month: Option<i16>,
    #[validate(range(min = 1, max = 31))]
    pub birthday_day: Option<i16>,
    pub responsibility_description: Option<String>,
    #[serde(default)]
    pub should_get_gift: bool,
    #[serde(default)]
    pub receive_newsletter: bool,
    #[validate(custom(function = "validate_contact_status"))]
    pub status: Option<String>,
    #[serde(default)]
    pub brand_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContactPayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 120))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub linkedin_url: Option<String>,
    #[validate(range(min = 1, max = 12))]
    pub birthday_month: Option<i16>,
    #[validate(range(min = 1, max = 31))]
    pub birthday_day: Option<i16>,
    pub responsibility_description: Option<String>,
    pub should_get_gift: Option<bool>,
    pub receive_newsletter: Option<bool>,
    #[validate(custom(function = "validate_contact_status"))]
    pub status: Option<String>,
    /// When present, replaces the whole brand set.
    pub brand_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoicePayload {
    pub brand_id: i64,
    /// Defaults to the company owning the brand.
    pub company_id: Option<i64>,
    pub invoice_date: Option<NaiveDate>,
    pub total_amount: Option<Decimal>,
    pub short_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStatusUpdatePayload {
    pub brand_id: i64,
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1))]
    pub comment: String,
    #[validate(custom(function = "validate_evaluation"))]
    pub evaluation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlanningInfoPayload {
    pub brand_id: i64,
    pub budget: Option<Decimal>,
    #[validate(length(max = 100))]
    pub planning_period: Option<String>,
    #[validate(length(max = 50))]
    pub planning_status: Option<String>,
    pub planning_info: Option<String>,
}
