pub mod api;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod inbound;
pub mod management;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::{require_api_key, require_bearer_auth},
    cors::api_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let base_routes = Router::new()
        .route("/health", get(health::health))
        .route("/api/inbound/webhook", post(inbound::receive));

    let read_api = Router::new()
        .route("/api/companies", get(api::list_companies))
        .route("/api/companies/:id", get(api::get_company))
        .route("/api/brands", get(api::list_brands))
        .route("/api/brands/:id", get(api::get_brand))
        .route("/api/contacts", get(api::list_contacts))
        .route("/api/invoices", get(api::list_invoices))
        .route("/api/status-updates", get(api::list_status_updates))
        .route("/api/planning-info", get(api::list_planning_info))
        .layer(from_fn_with_state(state.clone(), require_api_key))
        .layer(from_fn_with_state(
            RateLimiter::new(state.config.api_rps),
            rps_middleware,
        ));

    let management_api = Router::new()
        .route(
            "/api/keys",
            get(management::list_api_keys).post(management::create_api_key),
        )
        .route(
            "/api/keys/:id",
            axum::routing::delete(management::delete_api_key),
        )
        .route("/api/keys/:id/toggle", post(management::toggle_api_key))
        .route(
            "/api/webhooks",
            get(management::list_webhooks).post(management::create_webhook),
        )
        .route(
            "/api/webhooks/:id",
            axum::routing::delete(management::delete_webhook),
        )
        .route("/api/webhooks/:id/toggle", post(management::toggle_webhook))
        .route("/api/webhooks/:id/logs", get(management::list_webhook_logs))
        .route("/api/clients/companies", post(clients::create_company))
        .route("/api/clients/companies/:id", patch(clients::update_company))
        .route("/api/clients/brands", post(clients::create_brand))
        .route("/api/clients/brands/:id", patch(clients::update_brand))
        .route("/api/clients/contacts", post(clients::create_contact))
        .route("/api/clients/contacts/:id", patch(clients::update_contact))
        .route("/api/clients/invoices", post(clients::create_invoice))
        .route(
            "/api/clients/status-updates",
            post(clients::create_status_update),
        )
        .route(
            "/api/clients/planning-info",
            post(clients::create_planning_info),
        )
        .route("/api/dashboard", get(dashboard::summary))
        .layer(from_fn_with_state(state.clone(), require_bearer_auth))
        .layer(from_fn_with_state(
            RateLimiter::new(state.config.management_rps),
            rps_middleware,
        ));

    base_routes
        .merge(read_api)
        .merge(management_api)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
