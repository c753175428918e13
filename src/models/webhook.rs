use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Domain occurrences that can be pushed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WebhookEvent {
    CompanyCreated,
    CompanyUpdated,
    BrandCreated,
    BrandUpdated,
    ContactCreated,
    ContactUpdated,
    InvoiceCreated,
    StatusUpdateCreated,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 8] = [
        WebhookEvent::CompanyCreated,
        WebhookEvent::CompanyUpdated,
        WebhookEvent::BrandCreated,
        WebhookEvent::BrandUpdated,
        WebhookEvent::ContactCreated,
        WebhookEvent::ContactUpdated,
        WebhookEvent::InvoiceCreated,
        WebhookEvent::StatusUpdateCreated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::CompanyCreated => "company.created",
            WebhookEvent::CompanyUpdated => "company.updated",
            WebhookEvent::BrandCreated => "brand.created",
            WebhookEvent::BrandUpdated => "brand.updated",
            WebhookEvent::ContactCreated => "contact.created",
            WebhookEvent::ContactUpdated => "contact.updated",
            WebhookEvent::InvoiceCreated => "invoice.created",
            WebhookEvent::StatusUpdateCreated => "status_update.created",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebhookEvent::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown event: {}", s))
    }
}

/// Event names a subscription listens to. Persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventSet(BTreeSet<String>);

impl EventSet {
    pub fn contains(&self, event: &str) -> bool {
        self.0.contains(event)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<WebhookEvent>> for EventSet {
    fn from(events: Vec<WebhookEvent>) -> Self {
        EventSet(events.into_iter().map(|e| e.as_str().to_string()).collect())
    }
}

impl<'a> FromIterator<&'a str> for EventSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        EventSet(iter.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Webhook {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub events: Json<EventSet>,
    pub is_active: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl Webhook {
    /// Literal membership only: no wildcards, no prefix matching.
    pub fn is_subscribed_to(&self, event: &str) -> bool {
        self.is_active && self.events.0.contains(event)
    }
}

/// Subscriptions from `webhooks` that should receive `event`, in store order.
pub fn eligible_for<'a>(webhooks: &'a [Webhook], event: &str) -> Vec<&'a Webhook> {
    webhooks
        .iter()
        .filter(|w| w.is_subscribed_to(event))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook(id: i64, active: bool, events: &[&str]) -> Webhook {
        Webhook {
            id,
            name: format!("hook-{}", id),
            url: format!("http://localhost/{}", id),
            secret: "s".into(),
            events: Json(events.iter().copied().collect()),
            is_active: active,
            user_id: 1,
            created_at: Utc::now(),
            last_triggered_at: None,
        }
    }

    #[test]
    fn event_names_round_trip_through_from_str() {
        for event in WebhookEvent::ALL {
            assert_eq!(event.as_str().parse::<WebhookEvent>(), Ok(event));
        }
        assert!("contact.*".parse::<WebhookEvent>().is_err());
    }

    #[test]
    fn only_exact_event_names_are_eligible() {
        let hooks = vec![
            webhook(1, true, &["contact.updated"]),
            webhook(2, true, &["contact"]),
            webhook(3, true, &["contact.*", "company.created"]),
            webhook(4, false, &["contact.updated"]),
            webhook(5, true, &["brand.created", "contact.updated"]),
        ];
        let ids: Vec<i64> = eligible_for(&hooks, "contact.updated")
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn event_set_serializes_as_json_array() {
        let set = EventSet::from(vec![WebhookEvent::ContactUpdated, WebhookEvent::BrandCreated]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["brand.created","contact.updated"]"#);
        let back: EventSet = serde_json::from_str(r#"["a.b","a.b","c.d"]"#).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.contains("c.d"));
    }
}
