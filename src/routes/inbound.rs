use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    dto::webhook_dto::InboundContact,
    error::Error,
    models::webhook::WebhookEvent,
    services::webhook_service::{EVENT_HEADER, SIGNATURE_HEADER},
    utils::crypto::verify_signature,
    AppState,
};

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Receives `contact.updated` pushes from the sibling CRM.
///
/// Signatures are checked only when an inbound secret is configured.
#[axum::debug_handler]
pub async fn receive(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let event = header(&headers, EVENT_HEADER).unwrap_or_default();
    if event != WebhookEvent::ContactUpdated.as_str() {
        warn!(event, "rejected inbound webhook with unknown event");
        return Error::BadRequest("Unknown event type".into()).into_response();
    }

    if let Some(secret) = state.config.inbound_webhook_secret.as_deref() {
        let signature = header(&headers, SIGNATURE_HEADER).unwrap_or_default();
        let payload = String::from_utf8_lossy(&body);
        if !verify_signature(&payload, signature, secret) {
            warn!("rejected inbound webhook with bad signature");
            return Error::Unauthorized("Invalid signature".into()).into_response();
        }
    }

    let incoming = match parse_contact(&body) {
        Ok(c) => c,
        Err(e) => return processing_failure(e),
    };

    match state.reconciliation_service.reconcile_contact(&incoming).await {
        Ok(outcome) => {
            info!(
                matched = outcome.matched(),
                contact_id = ?outcome.contact_id,
                brands = outcome.brand_ids.len(),
                unmatched = outcome.unmatched_labels.len(),
                "inbound contact.updated processed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "status": "received",
                    "matched": outcome.matched(),
                    "contact_id": outcome.contact_id,
                    "matched_by": outcome.matched_by,
                    "unmatched_brands": outcome.unmatched_labels,
                })),
            )
                .into_response()
        }
        Err(e) => processing_failure(e),
    }
}

fn parse_contact(body: &[u8]) -> Result<InboundContact, Error> {
    Ok(serde_json::from_slice(body)?)
}

/// Anything that goes wrong after the event is accepted is reported as a 500.
fn processing_failure(e: Error) -> Response {
    error!(error = ?e, "inbound contact.updated processing failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
        .into_response()
}
