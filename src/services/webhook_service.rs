use std::fmt::Display;
use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{error, info, warn};
use url::Url;

use crate::dto::management_dto::{name_or_default, CreateWebhookPayload, DEFAULT_WEBHOOK_NAME};
use crate::error::{Error, Result};
use crate::models::webhook::{eligible_for, EventSet, Webhook, WebhookEvent};
use crate::models::webhook_log::{truncate_body, WebhookLog, TRANSPORT_FAILURE_STATUS};
use crate::utils::crypto::sign_payload;
use crate::utils::token::generate_token;
use crate::utils::wire_json::to_wire_string;

pub const EVENT_HEADER: &str = "X-Webhook-Event";
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_LOG_LIMIT: i64 = 100;

/// Result of a single POST to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub status: i32,
    pub body: String,
    /// The request produced an HTTP response, whatever its status.
    pub completed: bool,
}

impl DeliveryOutcome {
    pub fn response(status: u16, body: &str) -> Self {
        Self {
            status: i32::from(status),
            body: truncate_body(body),
            completed: true,
        }
    }

    pub fn transport_failure(err: &impl Display) -> Self {
        Self {
            status: TRANSPORT_FAILURE_STATUS,
            body: truncate_body(&err.to_string()),
            completed: false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub eligible: usize,
    pub completed: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct WebhookService {
    pool: PgPool,
    client: Client,
}

impl WebhookService {
    pub fn new(pool: PgPool, client: Client) -> Self {
        Self { pool, client }
    }

    pub fn build_client() -> Result<Client> {
        Ok(Client::builder().timeout(DELIVERY_TIMEOUT).build()?)
    }

    /// Delivers `payload` to every active subscription listening to `event`.
    ///
    /// Deliveries run one after another. Each attempt gets exactly one log row;
    /// a failing subscriber never stops the remaining ones.
    pub async fn trigger<T>(&self, event: WebhookEvent, payload: &T) -> Result<DispatchSummary>
    where
        T: ?Sized + Serialize,
    {
        let body = to_wire_string(payload)?;
        let payload_value: JsonValue = serde_json::to_value(payload)?;

        let active = self.list_active().await?;
        let targets = eligible_for(&active, event.as_str());
        info!(event = %event, subscribers = targets.len(), "dispatching webhook event");

        let mut summary = DispatchSummary {
            eligible: targets.len(),
            ..Default::default()
        };

        for webhook in targets {
            let outcome = self.deliver(webhook, event, &body).await;
            if outcome.completed {
                summary.completed += 1;
                info!(
                    webhook_id = webhook.id,
                    status = outcome.status,
                    "webhook delivered"
                );
            } else {
                summary.failed += 1;
                warn!(
                    webhook_id = webhook.id,
                    url = %webhook.url,
                    error = %outcome.body,
                    "webhook delivery failed"
                );
            }

            if let Err(e) = self.record(webhook, event, &payload_value, &outcome).await {
                error!(webhook_id = webhook.id, error = ?e, "failed to record webhook delivery");
            }
        }

        Ok(summary)
    }

    async fn deliver(&self, webhook: &Webhook, event: WebhookEvent, body: &str) -> DeliveryOutcome {
        let signature = sign_payload(&webhook.secret, body);
        let res = self
            .client
            .post(&webhook.url)
            .header(CONTENT_TYPE, "application/json")
            .header(EVENT_HEADER, event.as_str())
            .header(SIGNATURE_HEADER, signature)
            .body(body.to_owned())
            .send()
            .await;

        match res {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let text = resp.text().await.unwrap_or_default();
                DeliveryOutcome::response(status, &text)
            }
            Err(err) => DeliveryOutcome::transport_failure(&err),
        }
    }

    async fn record(
        &self,
        webhook: &Webhook,
        event: WebhookEvent,
        payload: &JsonValue,
        outcome: &DeliveryOutcome,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO webhook_logs (webhook_id, event, payload, response_status, response_body)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(webhook.id)
        .bind(event.as_str())
        .bind(payload)
        .bind(outcome.status)
        .bind(&outcome.body)
        .execute(&mut *tx)
        .await?;

        if outcome.completed {
            sqlx::query("UPDATE webhooks SET last_triggered_at = NOW() WHERE id = $1")
                .bind(webhook.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_active(&self) -> Result<Vec<Webhook>> {
        let rows = sqlx::query_as::<_, Webhook>(
            "SELECT * FROM webhooks WHERE is_active = TRUE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Webhook>> {
        let rows = sqlx::query_as::<_, Webhook>(
            "SELECT * FROM webhooks WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Creates a subscription and returns it together with the raw secret,
    /// which is not retrievable afterwards through the API.
    pub async fn create(&self, user_id: i64, payload: CreateWebhookPayload) -> Result<(Webhook, String)> {
        let url = validate_target_url(&payload.url)?;
        let events = parse_events(&payload.events)?;
        let name = name_or_default(payload.name, DEFAULT_WEBHOOK_NAME);
        let secret = generate_token();

        let webhook = sqlx::query_as::<_, Webhook>(
            r#"
            INSERT INTO webhooks (name, url, secret, events, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&name)
        .bind(url.as_str())
        .bind(&secret)
        .bind(sqlx::types::Json(&events))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        info!(webhook_id = webhook.id, user_id, events = events.len(), "webhook created");
        Ok((webhook, secret))
    }

    pub async fn toggle(&self, user_id: i64, id: i64) -> Result<Webhook> {
        let webhook = sqlx::query_as::<_, Webhook>(
            r#"
            UPDATE webhooks SET is_active = NOT is_active
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Webhook not found".into()))?;

        info!(webhook_id = id, active = webhook.is_active, "webhook toggled");
        Ok(webhook)
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM webhooks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Webhook not found".into()));
        }
        info!(webhook_id = id, "webhook deleted");
        Ok(())
    }

    pub async fn logs(&self, user_id: i64, id: i64, limit: Option<i64>) -> Result<Vec<WebhookLog>> {
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM webhooks WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        if owned.is_none() {
            return Err(Error::NotFound("Webhook not found".into()));
        }

        let logs = sqlx::query_as::<_, WebhookLog>(
            r#"
            SELECT * FROM webhook_logs
            WHERE webhook_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(id)
        .bind(limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, 1000))
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }
}

fn validate_target_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|_| Error::BadRequest("Webhook URL is not a valid URL".into()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::BadRequest(
            "Only HTTP and HTTPS webhook URLs are allowed".into(),
        ));
    }
    Ok(url)
}

fn parse_events(raw: &[String]) -> Result<EventSet> {
    let events = raw
        .iter()
        .map(|name| {
            name.trim()
                .parse::<WebhookEvent>()
                .map_err(Error::BadRequest)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(EventSet::from(events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_truncates_response_body() {
        let outcome = DeliveryOutcome::response(500, &"x".repeat(5000));
        assert_eq!(outcome.status, 500);
        assert_eq!(outcome.body.len(), 1000);
        assert!(outcome.completed);
    }

    #[test]
    fn transport_failure_uses_zero_status() {
        let outcome = DeliveryOutcome::transport_failure(&"connection refused");
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.body, "connection refused");
        assert!(!outcome.completed);
    }

    #[test]
    fn target_url_must_be_http() {
        assert!(validate_target_url("https://hooks.example.com/in").is_ok());
        assert!(validate_target_url("ftp://example.com").is_err());
        assert!(validate_target_url("not a url").is_err());
    }

    #[test]
    fn unknown_event_names_are_rejected() {
        let ok = parse_events(&["contact.updated".into(), "brand.created".into()]).unwrap();
        assert!(ok.contains("contact.updated"));
        assert!(parse_events(&["contact.*".into()]).is_err());
        assert!(parse_events(&[]).unwrap().is_empty());
    }
}
