use serde::Serialize;
use tracing::{error, info};

use crate::dto::api_dto::amount_to_f64;
use crate::dto::webhook_dto::{
    BrandEventPayload, CompanyEventPayload, ContactEventPayload, InvoiceEventPayload,
    StatusUpdateEventPayload,
};
use crate::models::brand::Brand;
use crate::models::company::Company;
use crate::models::contact::ContactWithBrands;
use crate::models::invoice::Invoice;
use crate::models::status_update::StatusUpdate;
use crate::models::webhook::WebhookEvent;
use crate::services::webhook_service::{DispatchSummary, WebhookService};
use crate::utils::time::{date_to_iso, now, to_isoformat};

/// Turns record mutations into outbound webhook events.
///
/// Delivery runs inline; failures are logged and never reach the caller.
#[derive(Clone)]
pub struct NotificationService {
    webhooks: WebhookService,
}

impl NotificationService {
    pub fn new(webhooks: WebhookService) -> Self {
        Self { webhooks }
    }

    pub async fn company_created(&self, company: &Company) -> Option<DispatchSummary> {
        let payload = CompanyEventPayload {
            id: company.id,
            name: company.name.clone(),
            vat_code: company.vat_code.clone(),
            registration_number: company.registration_number.clone(),
            created_at: Some(to_isoformat(company.created_at)),
            updated_at: None,
        };
        self.emit(WebhookEvent::CompanyCreated, &payload).await
    }

    pub async fn company_updated(&self, company: &Company) -> Option<DispatchSummary> {
        let payload = CompanyEventPayload {
            id: company.id,
            name: company.name.clone(),
            vat_code: company.vat_code.clone(),
            registration_number: company.registration_number.clone(),
            created_at: None,
            updated_at: Some(to_isoformat(company.updated_at)),
        };
        self.emit(WebhookEvent::CompanyUpdated, &payload).await
    }

    pub async fn brand_created(&self, brand: &Brand) -> Option<DispatchSummary> {
        let payload = BrandEventPayload {
            id: brand.id,
            name: brand.name.clone(),
            company_id: brand.company_id,
            company_name: brand.company_name.clone(),
            created_at: Some(to_isoformat(brand.created_at)),
        };
        self.emit(WebhookEvent::BrandCreated, &payload).await
    }

    pub async fn brand_updated(&self, brand: &Brand) -> Option<DispatchSummary> {
        let payload = BrandEventPayload {
            id: brand.id,
            name: brand.name.clone(),
            company_id: brand.company_id,
            company_name: brand.company_name.clone(),
            created_at: None,
        };
        self.emit(WebhookEvent::BrandUpdated, &payload).await
    }

    pub async fn contact_created(&self, contact: &ContactWithBrands) -> Option<DispatchSummary> {
        let mut payload = contact_payload(contact);
        payload.created_at = Some(to_isoformat(contact.contact.created_at));
        self.emit(WebhookEvent::ContactCreated, &payload).await
    }

    pub async fn contact_updated(&self, contact: &ContactWithBrands) -> Option<DispatchSummary> {
        let mut payload = contact_payload(contact);
        payload.updated_at = Some(to_isoformat(now()));
        self.emit(WebhookEvent::ContactUpdated, &payload).await
    }

    pub async fn invoice_created(&self, invoice: &Invoice) -> Option<DispatchSummary> {
        let payload = InvoiceEventPayload {
            id: invoice.id,
            brand_id: invoice.brand_id,
            brand_name: invoice.brand_name.clone(),
            company_id: invoice.company_id,
            company_name: invoice.company_name.clone(),
            invoice_date: date_to_iso(invoice.invoice_date),
            total_amount: amount_to_f64(invoice.total_amount),
            created_at: to_isoformat(invoice.created_at),
        };
        self.emit(WebhookEvent::InvoiceCreated, &payload).await
    }

    pub async fn status_update_created(&self, update: &StatusUpdate) -> Option<DispatchSummary> {
        let payload = StatusUpdateEventPayload {
            id: update.id,
            brand_id: update.brand_id,
            brand_name: update.brand_name.clone(),
            update_text: update.comment.clone(),
            created_by: update.created_by_name.clone(),
            created_at: to_isoformat(update.created_at),
        };
        self.emit(WebhookEvent::StatusUpdateCreated, &payload).await
    }

    async fn emit<T: Serialize>(&self, event: WebhookEvent, payload: &T) -> Option<DispatchSummary> {
        match self.webhooks.trigger(event, payload).await {
            Ok(summary) => {
                info!(
                    event = %event,
                    eligible = summary.eligible,
                    completed = summary.completed,
                    failed = summary.failed,
                    "webhook event dispatched"
                );
                Some(summary)
            }
            Err(e) => {
                error!(event = %event, error = ?e, "webhook dispatch aborted");
                None
            }
        }
    }
}

fn contact_payload(contact: &ContactWithBrands) -> ContactEventPayload {
    let c = &contact.contact;
    ContactEventPayload {
        id: c.id,
        first_name: c.first_name.clone(),
        last_name: c.last_name.clone(),
        email: c.email.clone(),
        phone: c.phone.clone(),
        brands: contact.brands.clone(),
        created_at: None,
        updated_at: None,
    }
}
