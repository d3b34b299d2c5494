use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use shopfloor_order::Report;

use crate::error::AppError;
use crate::state::AppState;
use crate::window::WindowQuery;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/reports/{kind}", get(get_report))
        .route("/v1/reports/{kind}/text", get(get_report_text))
}

async fn build_report(state: &AppState, kind: &str, window: &WindowQuery) -> Result<Report, AppError> {
    let (start, end) = window.resolve(state.reporting.default_window_days, Utc::now())?;

    Ok(state.reports.generate_named_report(kind, start, end).await)
}

/// GET /v1/reports/{kind}
/// `kind` is a slug (`by-status`) or display label (`Orders by Status`).
/// Unrecognized kinds answer with an `unknown` report rather than an error.
pub async fn get_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<Report>, AppError> {
    Ok(Json(build_report(&state, &kind, &window).await?))
}

/// GET /v1/reports/{kind}/text
pub async fn get_report_text(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<String, AppError> {
    Ok(build_report(&state, &kind, &window).await?.to_string())
}
