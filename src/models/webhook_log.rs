use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Status recorded when the request never produced an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: i32 = 0;

pub const MAX_RESPONSE_BODY_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebhookLog {
    pub id: i64,
    pub webhook_id: i64,
    pub event: String,
    pub payload: Option<JsonValue>,
    pub response_status: i32,
    pub response_body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// First `MAX_RESPONSE_BODY_CHARS` characters of `text`.
pub fn truncate_body(text: &str) -> String {
    text.chars().take(MAX_RESPONSE_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        let long = "ž".repeat(1500);
        let cut = truncate_body(&long);
        assert_eq!(cut.chars().count(), MAX_RESPONSE_BODY_CHARS);
        assert_eq!(truncate_body("short"), "short");
    }
}
