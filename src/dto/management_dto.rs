use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::api_key::ApiKey;
use crate::models::webhook::Webhook;

pub const DEFAULT_API_KEY_NAME: &str = "Unnamed Key";
pub const DEFAULT_WEBHOOK_NAME: &str = "Unnamed Webhook";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateApiKeyPayload {
    #[validate(length(max = 100))]
    pub name: Option<String>,
}

/// Returned once, at creation. The raw key cannot be retrieved afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedApiKeyResponse {
    #[serde(flatten)]
    pub api_key: ApiKey,
    pub key: String,
    pub warning: &'static str,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWebhookPayload {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub url: String,
    #[serde(default)]
    pub events: Vec<String>,
}

/// Returned once, at creation. The raw secret cannot be retrieved afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedWebhookResponse {
    #[serde(flatten)]
    pub webhook: Webhook,
    pub secret: String,
    pub warning: &'static str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookLogQuery {
    pub limit: Option<i64>,
}

pub fn name_or_default(name: Option<String>, default: &str) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_fall_back_to_default() {
        assert_eq!(name_or_default(None, DEFAULT_API_KEY_NAME), "Unnamed Key");
        assert_eq!(
            name_or_default(Some("   ".into()), DEFAULT_WEBHOOK_NAME),
            "Unnamed Webhook"
        );
        assert_eq!(name_or_default(Some(" CI ".into()), DEFAULT_API_KEY_NAME), "CI");
    }
}
