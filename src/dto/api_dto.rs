use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::brand::{Brand, BrandRef};
use crate::models::company::Company;
use crate::models::contact::{Contact, ContactWithBrands};
use crate::models::invoice::Invoice;
use crate::models::planning_info::PlanningInfo;
use crate::models::status_update::StatusUpdate;
use crate::utils::time::date_to_iso;

pub const DEFAULT_STATUS_UPDATE_LIMIT: i64 = 50;
const MAX_STATUS_UPDATE_LIMIT: i64 = 1000;

/// Monetary amounts go out as plain JSON numbers; absent amounts as `0`.
pub fn amount_to_f64(amount: Option<Decimal>) -> f64 {
    amount.and_then(|a| a.to_f64()).unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceQuery {
    pub brand_id: Option<i64>,
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateQuery {
    pub brand_id: Option<i64>,
    pub limit: Option<i64>,
}

impl StatusUpdateQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_STATUS_UPDATE_LIMIT)
            .clamp(0, MAX_STATUS_UPDATE_LIMIT)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanningInfoQuery {
    pub brand_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyResponse {
    pub id: i64,
    pub name: String,
    pub vat_code: Option<String>,
    pub registration_number: Option<String>,
    pub address: Option<String>,
    pub agency_fees: Option<String>,
    pub parent_company_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            vat_code: c.vat_code,
            registration_number: c.registration_number,
            address: c.address,
            agency_fees: c.agency_fees,
            parent_company_id: c.parent_company_id,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetailResponse {
    #[serde(flatten)]
    pub company: CompanyResponse,
    pub brands: Vec<BrandRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandResponse {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Brand> for BrandResponse {
    fn from(b: Brand) -> Self {
        Self {
            id: b.id,
            name: b.name,
            company_id: b.company_id,
            company_name: b.company_name,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandContactSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<Contact> for BrandContactSummary {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone: c.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandDetailResponse {
    #[serde(flatten)]
    pub brand: BrandResponse,
    pub contacts: Vec<BrandContactSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub birthday_month: Option<i16>,
    pub birthday_day: Option<i16>,
    pub brands: Vec<BrandRef>,
    pub created_at: DateTime<Utc>,
}

impl From<ContactWithBrands> for ContactResponse {
    fn from(cwb: ContactWithBrands) -> Self {
        let c = cwb.contact;
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone: c.phone,
            linkedin_url: c.linkedin_url,
            birthday_month: c.birthday_month,
            birthday_day: c.birthday_day,
            brands: cwb.brands,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub company_id: i64,
    pub company_name: String,
    pub invoice_date: Option<String>,
    pub total_amount: f64,
    pub short_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(i: Invoice) -> Self {
        Self {
            id: i.id,
            brand_id: i.brand_id,
            brand_name: i.brand_name,
            company_id: i.company_id,
            company_name: i.company_name,
            invoice_date: date_to_iso(i.invoice_date),
            total_amount: amount_to_f64(i.total_amount),
            short_info: i.short_info,
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateResponse {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub update_text: String,
    pub evaluation: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<StatusUpdate> for StatusUpdateResponse {
    fn from(u: StatusUpdate) -> Self {
        Self {
            id: u.id,
            brand_id: u.brand_id,
            brand_name: u.brand_name,
            update_text: u.comment,
            evaluation: u.evaluation,
            created_by: u.created_by_name,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanningInfoResponse {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub budget: f64,
    pub planning_period: Option<String>,
    pub planning_status: Option<String>,
    pub planning_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PlanningInfo> for PlanningInfoResponse {
    fn from(p: PlanningInfo) -> Self {
        Self {
            id: p.id,
            brand_id: p.brand_id,
            brand_name: p.brand_name,
            budget: amount_to_f64(p.budget),
            planning_period: p.planning_period,
            planning_status: p.planning_status,
            planning_info: p.planning_info,
            created_at: p.created_at,
        }
    }
}
