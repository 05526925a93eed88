use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use app_api::{AdWeeksRequest, AppContext, CohortSummaryRequest, RangeRequest, SettingsPutRequest};
use cohort_app::Result;

use crate::{errors::HttpError, state::HttpState};

/// Runs sqlite-bound work off the async runtime.
async fn blocking<T, F>(state: HttpState, work: F) -> std::result::Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&AppContext) -> Result<T> + Send + 'static,
{
    let context = state.context;
    Ok(tokio::task::spawn_blocking(move || work(&context)).await??)
}

pub async fn healthz() -> impl IntoResponse {
    Json(app_api::ok())
}

pub async fn ad_weeks(
    State(state): State<HttpState>,
    Json(req): Json<AdWeeksRequest>,
) -> std::result::Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::ad_weeks(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn build(
    State(state): State<HttpState>,
    Json(req): Json<RangeRequest>,
) -> std::result::Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::build(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn cohort_summary(
    State(state): State<HttpState>,
    Json(req): Json<CohortSummaryRequest>,
) -> std::result::Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::cohort_summary(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn cohort_grid(
    State(state): State<HttpState>,
    Json(_): Json<app_api::EmptyRequest>,
) -> std::result::Result<impl IntoResponse, HttpError> {
    let response = blocking(state, app_api::cohort_grid).await?;
    Ok(Json(response))
}

pub async fn ingest(
    State(state): State<HttpState>,
    Json(_): Json<app_api::EmptyRequest>,
) -> std::result::Result<impl IntoResponse, HttpError> {
    let stats = blocking(state, app_api::ingest).await?;
    Ok(Json(stats))
}

pub async fn settings_get(
    State(state): State<HttpState>,
    Json(_): Json<app_api::EmptyRequest>,
) -> std::result::Result<impl IntoResponse, HttpError> {
    let response = blocking(state, app_api::settings_get).await?;
    Ok(Json(response))
}

pub async fn settings_put(
    State(state): State<HttpState>,
    Json(req): Json<SettingsPutRequest>,
) -> std::result::Result<impl IntoResponse, HttpError> {
    let response = blocking(state, move |ctx| app_api::settings_put(ctx, req)).await?;
    Ok(Json(response))
}

pub async fn not_found() -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        "route not found",
        Some("not_found".to_string()),
    )
}
