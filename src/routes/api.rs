//! API-key gated read endpoints.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::api_dto::{
        BrandContactSummary, BrandDetailResponse, BrandResponse, CompanyDetailResponse,
        CompanyResponse, ContactResponse, InvoiceQuery, InvoiceResponse, PlanningInfoQuery,
        PlanningInfoResponse, StatusUpdateQuery, StatusUpdateResponse,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "Active companies"),
        (status = 401, description = "Missing or invalid API key")
    )
)]
#[axum::debug_handler]
pub async fn list_companies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let companies = state.company_service.list_active().await?;
    Ok(Json(
        companies
            .into_iter()
            .map(CompanyResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(("id" = i64, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company with its brands"),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let company = state.company_service.get_by_id(id).await?;
    let brands = state.company_service.brands_of(id).await?;
    Ok(Json(CompanyDetailResponse {
        company: CompanyResponse::from(company),
        brands,
    }))
}

#[utoipa::path(
    get,
    path = "/api/brands",
    responses(
        (status = 200, description = "Active brands with company names"),
        (status = 401, description = "Missing or invalid API key")
    )
)]
#[axum::debug_handler]
pub async fn list_brands(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let brands = state.brand_service.list_active().await?;
    Ok(Json(
        brands.into_iter().map(BrandResponse::from).collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    params(("id" = i64, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand with its contacts"),
        (status = 404, description = "Brand not found")
    )
)]
#[axum::debug_handler]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let brand = state.brand_service.get_by_id(id).await?;
    let contacts = state.brand_service.contacts_of(id).await?;
    Ok(Json(BrandDetailResponse {
        brand: BrandResponse::from(brand),
        contacts: contacts.into_iter().map(BrandContactSummary::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "All contacts with their brands"),
        (status = 401, description = "Missing or invalid API key")
    )
)]
#[axum::debug_handler]
pub async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let contacts = state.contact_service.list_with_brands().await?;
    Ok(Json(
        contacts
            .into_iter()
            .map(ContactResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/invoices",
    params(
        ("brand_id" = Option<i64>, Query, description = "Only invoices for this brand"),
        ("company_id" = Option<i64>, Query, description = "Only invoices for this company")
    ),
    responses((status = 200, description = "Invoices, newest invoice date first"))
)]
#[axum::debug_handler]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Result<impl IntoResponse> {
    let invoices = state.invoice_service.list(&query).await?;
    Ok(Json(
        invoices
            .into_iter()
            .map(InvoiceResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/status-updates",
    params(
        ("brand_id" = Option<i64>, Query, description = "Only updates for this brand"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, default 50")
    ),
    responses((status = 200, description = "Status updates, newest first"))
)]
#[axum::debug_handler]
pub async fn list_status_updates(
    State(state): State<AppState>,
    Query(query): Query<StatusUpdateQuery>,
) -> Result<impl IntoResponse> {
    let updates = state.status_update_service.list(&query).await?;
    Ok(Json(
        updates
            .into_iter()
            .map(StatusUpdateResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/planning-info",
    params(("brand_id" = Option<i64>, Query, description = "Only records for this brand")),
    responses((status = 200, description = "Planning records, newest first"))
)]
#[axum::debug_handler]
pub async fn list_planning_info(
    State(state): State<AppState>,
    Query(query): Query<PlanningInfoQuery>,
) -> Result<impl IntoResponse> {
    let rows = state.planning_service.list(&query).await?;
    Ok(Json(
        rows.into_iter()
            .map(PlanningInfoResponse::from)
            .collect::<Vec<_>>(),
    ))
}
