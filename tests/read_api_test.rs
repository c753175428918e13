mod common;

use agency_crm::dto::management_dto::CreateApiKeyPayload;
use agency_crm::routes;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

fn get(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn read_api_requires_a_valid_key() {
    let Some((state, pool)) = common::setup().await else {
        return;
    };
    let user_id = common::seed_user(&pool).await;
    let (api_key, raw) = state
        .api_key_service
        .create(user_id, CreateApiKeyPayload::default())
        .await
        .unwrap();
    assert_eq!(api_key.name, "Unnamed Key");
    assert_eq!(api_key.use_count, 0);
    let app = routes::app(state.clone());

    let resp = app.clone().oneshot(get("/api/companies", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::read_json(resp).await, json!({"error": "No API key provided"}));

    let resp = app
        .clone()
        .oneshot(get("/api/companies", Some("definitely-not-a-key")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::read_json(resp).await, json!({"error": "Invalid API key"}));

    let resp = app
        .clone()
        .oneshot(get("/api/companies", Some(&raw)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/brands?api_key={}", raw), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let keys = state.api_key_service.list_for_user(user_id).await.unwrap();
    let used = keys.iter().find(|k| k.id == api_key.id).unwrap();
    assert_eq!(used.use_count, 2);
    assert!(used.last_used_at.is_some());

    state.api_key_service.toggle(user_id, api_key.id).await.unwrap();
    let resp = app
        .clone()
        .oneshot(get("/api/companies", Some(&raw)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn read_api_serves_records_and_filters() {
    let Some((state, pool)) = common::setup().await else {
        return;
    };
    let user_id = common::seed_user(&pool).await;
    let (_, raw) = state
        .api_key_service
        .create(user_id, CreateApiKeyPayload { name: Some("reader".into()) })
        .await
        .unwrap();
    let app = routes::app(state);

    let tag = common::unique();
    let company_id = common::seed_company(&pool, &format!("Vilnius{}", tag)).await;
    let brand_id = common::seed_brand(&pool, &format!("Amber{}", tag), company_id).await;
    let contact_id =
        common::seed_contact(&pool, "Egle", &tag, &format!("egle_{}@example.com", tag)).await;
    sqlx::query("INSERT INTO contact_brands (contact_id, brand_id) VALUES ($1, $2)")
        .bind(contact_id)
        .bind(brand_id)
        .execute(&pool)
        .await
        .unwrap();
    for (date, amount) in [("2024-01-15", "100.00"), ("2024-03-01", "250.50")] {
        sqlx::query(
            "INSERT INTO invoices (brand_id, company_id, invoice_date, total_amount) VALUES ($1, $2, $3::DATE, $4::NUMERIC)",
        )
        .bind(brand_id)
        .bind(company_id)
        .bind(date)
        .bind(amount)
        .execute(&pool)
        .await
        .unwrap();
    }

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/companies/{}", company_id), Some(&raw)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let company = common::read_json(resp).await;
    assert_eq!(company["brands"], json!([{"id": brand_id, "name": format!("Amber{}", tag)}]));

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/brands/{}", brand_id), Some(&raw)))
        .await
        .unwrap();
    let brand = common::read_json(resp).await;
    assert_eq!(brand["company_name"], format!("Vilnius{}", tag));
    assert_eq!(brand["contacts"][0]["id"], contact_id);

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/invoices?brand_id={}", brand_id), Some(&raw)))
        .await
        .unwrap();
    let invoices = common::read_json(resp).await;
    assert_eq!(invoices.as_array().unwrap().len(), 2);
    assert_eq!(invoices[0]["invoice_date"], "2024-03-01");
    assert_eq!(invoices[0]["total_amount"], 250.5);

    let resp = app
        .clone()
        .oneshot(get("/api/companies/999999999", Some(&raw)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(get("/api/status-updates?limit=1", Some(&raw)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::read_json(resp).await.as_array().unwrap().len() <= 1);

    sqlx::query("UPDATE client_contacts SET status = 'passive' WHERE id = $1")
        .bind(contact_id)
        .execute(&pool)
        .await
        .unwrap();
    let resp = app
        .clone()
        .oneshot(get("/api/contacts", Some(&raw)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let contacts = common::read_json(resp).await;
    let listed = contacts
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == contact_id)
        .expect("passive contact is listed");
    assert_eq!(listed["brands"][0]["id"], brand_id);
}
