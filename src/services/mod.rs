pub mod api_key_service;
pub mod brand_service;
pub mod company_service;
pub mod contact_service;
pub mod dashboard_service;
pub mod invoice_service;
pub mod notification_service;
pub mod planning_service;
pub mod reconciliation_service;
pub mod status_update_service;
pub mod user_service;
pub mod webhook_service;
