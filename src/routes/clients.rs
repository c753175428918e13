//! Record mutations. Every successful write notifies subscribers before responding.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::api_dto::{InvoiceResponse, PlanningInfoResponse, StatusUpdateResponse},
    dto::client_dto::{
        CreateBrandPayload, CreateCompanyPayload, CreateContactPayload, CreateInvoicePayload,
        CreatePlanningInfoPayload, CreateStatusUpdatePayload, UpdateBrandPayload,
        UpdateCompanyPayload, UpdateContactPayload,
    },
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

#[axum::debug_handler]
pub async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.create(payload).await?;
    state.notifier.company_created(&company).await;
    Ok((StatusCode::CREATED, Json(company)))
}

#[axum::debug_handler]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state.company_service.update(id, payload).await?;
    state.notifier.company_updated(&company).await;
    Ok(Json(company))
}

#[axum::debug_handler]
pub async fn create_brand(
    State(state): State<AppState>,
    Json(payload): Json<CreateBrandPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let brand = state.brand_service.create(payload).await?;
    state.notifier.brand_created(&brand).await;
    Ok((StatusCode::CREATED, Json(brand)))
}

#[axum::debug_handler]
pub async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBrandPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let brand = state.brand_service.update(id, payload).await?;
    state.notifier.brand_updated(&brand).await;
    Ok(Json(brand))
}

#[axum::debug_handler]
pub async fn create_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let contact = state.contact_service.create(payload).await?;
    state.notifier.contact_created(&contact).await;
    Ok((StatusCode::CREATED, Json(contact)))
}

#[axum::debug_handler]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateContactPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let contact = state.contact_service.update(id, payload).await?;
    state.notifier.contact_updated(&contact).await;
    Ok(Json(contact))
}

#[axum::debug_handler]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let invoice = state.invoice_service.create(payload).await?;
    state.notifier.invoice_created(&invoice).await;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

#[axum::debug_handler]
pub async fn create_status_update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateStatusUpdatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let update = state.status_update_service.create(user.id, payload).await?;
    state.notifier.status_update_created(&update).await;
    Ok((StatusCode::CREATED, Json(StatusUpdateResponse::from(update))))
}

#[axum::debug_handler]
pub async fn create_planning_info(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreatePlanningInfoPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let info = state.planning_service.create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(PlanningInfoResponse::from(info))))
}
