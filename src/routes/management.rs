use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::management_dto::{
        CreateApiKeyPayload, CreateWebhookPayload, CreatedApiKeyResponse, CreatedWebhookResponse,
        WebhookLogQuery,
    },
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

const KEY_WARNING: &str = "Store this key now. It will not be shown again.";
const SECRET_WARNING: &str = "Store this secret now. It will not be shown again.";

#[axum::debug_handler]
pub async fn list_api_keys(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let keys = state.api_key_service.list_for_user(user.id).await?;
    Ok(Json(keys))
}

#[axum::debug_handler]
pub async fn create_api_key(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateApiKeyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (api_key, key) = state.api_key_service.create(user.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedApiKeyResponse {
            api_key,
            key,
            warning: KEY_WARNING,
        }),
    ))
}

#[axum::debug_handler]
pub async fn toggle_api_key(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let api_key = state.api_key_service.toggle(user.id, id).await?;
    Ok(Json(api_key))
}

#[axum::debug_handler]
pub async fn delete_api_key(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.api_key_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_webhooks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let webhooks = state.webhook_service.list_for_user(user.id).await?;
    Ok(Json(webhooks))
}

#[axum::debug_handler]
pub async fn create_webhook(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateWebhookPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (webhook, secret) = state.webhook_service.create(user.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedWebhookResponse {
            webhook,
            secret,
            warning: SECRET_WARNING,
        }),
    ))
}

#[axum::debug_handler]
pub async fn toggle_webhook(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let webhook = state.webhook_service.toggle(user.id, id).await?;
    Ok(Json(webhook))
}

#[axum::debug_handler]
pub async fn delete_webhook(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.webhook_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_webhook_logs(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<WebhookLogQuery>,
) -> Result<impl IntoResponse> {
    let logs = state.webhook_service.logs(user.id, id, query.limit).await?;
    Ok(Json(logs))
}
