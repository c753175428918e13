pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    api_key_service::ApiKeyService, brand_service::BrandService,
    company_service::CompanyService, contact_service::ContactService,
    dashboard_service::DashboardService, invoice_service::InvoiceService,
    notification_service::NotificationService, planning_service::PlanningService,
    reconciliation_service::ReconciliationService,
    status_update_service::StatusUpdateService, user_service::UserService,
    webhook_service::WebhookService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub api_key_service: ApiKeyService,
    pub brand_service: BrandService,
    pub company_service: CompanyService,
    pub contact_service: ContactService,
    pub dashboard_service: DashboardService,
    pub invoice_service: InvoiceService,
    pub notifier: NotificationService,
    pub planning_service: PlanningService,
    pub reconciliation_service: ReconciliationService,
    pub status_update_service: StatusUpdateService,
    pub user_service: UserService,
    pub webhook_service: WebhookService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self> {
        let http_client = WebhookService::build_client()?;

        let webhook_service = WebhookService::new(pool.clone(), http_client);
        let status_update_service = StatusUpdateService::new(pool.clone());

        Ok(Self {
            config: Arc::new(config),
            api_key_service: ApiKeyService::new(pool.clone()),
            brand_service: BrandService::new(pool.clone()),
            company_service: CompanyService::new(pool.clone()),
            contact_service: ContactService::new(pool.clone()),
            dashboard_service: DashboardService::new(pool.clone(), status_update_service.clone()),
            invoice_service: InvoiceService::new(pool.clone()),
            notifier: NotificationService::new(webhook_service.clone()),
            planning_service: PlanningService::new(pool.clone()),
            reconciliation_service: ReconciliationService::new(pool.clone()),
            status_update_service,
            user_service: UserService::new(pool.clone()),
            webhook_service,
            pool,
        })
    }
}
