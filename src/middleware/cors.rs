use axum::http::{header, HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

/// Any origin may call the API; the read API is authenticated by key, not cookie.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-api-key"),
            HeaderName::from_static("x-webhook-event"),
            HeaderName::from_static("x-webhook-signature"),
        ])
}
