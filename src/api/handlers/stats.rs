//! Personal statistics and heat-map handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{HeatPointDto, HeatmapResponse, StatsResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /stats` — Personal rollup statistics.
///
/// Recomputed from a fresh snapshot on every call; an empty store
/// yields the all-zero shape rather than an error.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Stats",
    summary = "Personal statistics",
    description = "Overall tip rate and average tip plus per-platform and per-time-bucket breakdowns, recomputed on read.",
    responses(
        (status = 200, description = "Rollup statistics", body = StatsResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn personal_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let stats = state.log_service.personal_stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// `GET /heatmap` — Personal heat map with blended intensity.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure or non-finite stored data.
#[utoipa::path(
    get,
    path = "/api/v1/heatmap",
    tag = "Stats",
    summary = "Personal heat map",
    description = "One blended-intensity point per populated grid cell across all recorded deliveries.",
    responses(
        (status = 200, description = "Heat points", body = HeatmapResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn personal_heatmap(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let points = state.log_service.personal_heat().await?;
    Ok(Json(HeatmapResponse {
        points: points.into_iter().map(HeatPointDto::from).collect(),
    }))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(personal_stats))
        .route("/heatmap", get(personal_heatmap))
}
