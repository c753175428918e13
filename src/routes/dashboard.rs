use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{error::Result, AppState};

#[axum::debug_handler]
pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let summary = state.dashboard_service.summary().await?;
    Ok(Json(summary))
}
