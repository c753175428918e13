mod common;

use std::sync::Arc;

use agency_crm::dto::management_dto::CreateWebhookPayload;
use agency_crm::models::webhook::WebhookEvent;
use agency_crm::utils::crypto::sign_payload;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    event: String,
    signature: String,
    body: String,
}

type Inbox = Arc<Mutex<Vec<Captured>>>;

async fn capture(
    State(inbox): State<Inbox>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    inbox.lock().await.push(Captured {
        path: path.clone(),
        event: header("x-webhook-event"),
        signature: header("x-webhook-signature"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    if path == "fail" {
        (StatusCode::INTERNAL_SERVER_ERROR, "subscriber exploded")
    } else {
        (StatusCode::OK, "ok")
    }
}

async fn spawn_receiver() -> (String, Inbox) {
    let inbox: Inbox = Arc::default();
    let app = Router::new()
        .route("/:path", post(capture))
        .with_state(inbox.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), inbox)
}

async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/gone", addr)
}

fn subscription(url: String, events: &[&str]) -> CreateWebhookPayload {
    CreateWebhookPayload {
        name: None,
        url,
        events: events.iter().map(|e| e.to_string()).collect(),
    }
}

#[tokio::test]
async fn dispatch_logs_one_row_per_eligible_subscription() {
    let Some((state, pool)) = common::setup().await else {
        return;
    };
    let user_id = common::seed_user(&pool).await;
    let (base, inbox) = spawn_receiver().await;
    let service = &state.webhook_service;

    let (ok_hook, ok_secret) = service
        .create(user_id, subscription(format!("{}/ok", base), &["contact.created"]))
        .await
        .unwrap();
    let (fail_hook, _) = service
        .create(
            user_id,
            subscription(format!("{}/fail", base), &["contact.created", "brand.created"]),
        )
        .await
        .unwrap();
    let (other_hook, _) = service
        .create(user_id, subscription(format!("{}/other", base), &["brand.created"]))
        .await
        .unwrap();
    let (dead_hook, _) = service
        .create(user_id, subscription(closed_port_url().await, &["contact.created"]))
        .await
        .unwrap();
    let (paused_hook, _) = service
        .create(user_id, subscription(format!("{}/paused", base), &["contact.created"]))
        .await
        .unwrap();
    service.toggle(user_id, paused_hook.id).await.unwrap();

    let payload = json!({"id": 1, "first_name": "Žydrūnė", "brands": []});
    let summary = service
        .trigger(WebhookEvent::ContactCreated, &payload)
        .await
        .unwrap();
    assert!(summary.eligible >= 3);
    assert!(summary.failed >= 1);

    let received = inbox.lock().await.clone();
    let mut paths: Vec<&str> = received.iter().map(|c| c.path.as_str()).collect();
    paths.sort();
    assert_eq!(paths, vec!["fail", "ok"]);

    let ok = received.iter().find(|c| c.path == "ok").unwrap();
    assert_eq!(ok.event, "contact.created");
    assert_eq!(ok.signature, sign_payload(&ok_secret, &ok.body));
    assert!(ok.body.contains(r#""first_name": "\u017dydr\u016bn\u0117""#));

    let logs = |id| {
        let service = service.clone();
        async move { service.logs(user_id, id, None).await.unwrap() }
    };

    let ok_logs = logs(ok_hook.id).await;
    assert_eq!(ok_logs.len(), 1);
    assert_eq!(ok_logs[0].response_status, 200);
    assert_eq!(ok_logs[0].event, "contact.created");

    let fail_logs = logs(fail_hook.id).await;
    assert_eq!(fail_logs.len(), 1);
    assert_eq!(fail_logs[0].response_status, 500);
    assert_eq!(fail_logs[0].response_body.as_deref(), Some("subscriber exploded"));

    let dead_logs = logs(dead_hook.id).await;
    assert_eq!(dead_logs.len(), 1);
    assert_eq!(dead_logs[0].response_status, 0);
    assert!(!dead_logs[0].response_body.clone().unwrap_or_default().is_empty());

    assert!(logs(other_hook.id).await.is_empty());
    assert!(logs(paused_hook.id).await.is_empty());

    let triggered: Vec<(i64, bool)> = sqlx::query_as(
        "SELECT id, last_triggered_at IS NOT NULL FROM webhooks WHERE id = ANY($1) ORDER BY id",
    )
    .bind(vec![ok_hook.id, fail_hook.id, dead_hook.id])
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(
        triggered,
        vec![(ok_hook.id, true), (fail_hook.id, true), (dead_hook.id, false)]
    );

    for hook in [ok_hook.id, fail_hook.id, other_hook.id, dead_hook.id, paused_hook.id] {
        service.delete(user_id, hook).await.unwrap();
    }
}

#[tokio::test]
async fn webhooks_are_scoped_to_their_owner() {
    let Some((state, pool)) = common::setup().await else {
        return;
    };
    let owner = common::seed_user(&pool).await;
    let stranger = common::seed_user(&pool).await;
    let service = &state.webhook_service;

    let (hook, secret) = service
        .create(owner, subscription("https://hooks.example.com/in".into(), &["invoice.created"]))
        .await
        .unwrap();
    assert_eq!(hook.name, "Unnamed Webhook");
    assert_eq!(secret.len(), 43);

    assert!(service.toggle(stranger, hook.id).await.is_err());
    assert!(service.logs(stranger, hook.id, None).await.is_err());
    assert!(service.delete(stranger, hook.id).await.is_err());

    let toggled = service.toggle(owner, hook.id).await.unwrap();
    assert!(!toggled.is_active);
    service.delete(owner, hook.id).await.unwrap();
}
