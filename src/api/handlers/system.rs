//! System endpoints: health check and catalog metadata.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::{Platform, TimeBucket};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Platform catalog entry.
#[derive(Debug, Serialize, ToSchema)]
struct PlatformInfo {
    platform: &'static str,
    label: &'static str,
}

/// `GET /config/platforms` — List supported delivery platforms.
#[utoipa::path(
    get,
    path = "/config/platforms",
    tag = "System",
    summary = "List delivery platforms",
    description = "Returns the wire name and display label for every supported platform.",
    responses(
        (status = 200, description = "Platform catalog", body = Vec<PlatformInfo>),
    )
)]
pub async fn platforms_handler() -> impl IntoResponse {
    let platforms: Vec<PlatformInfo> = Platform::ALL
        .iter()
        .map(|p| PlatformInfo {
            platform: p.as_str(),
            label: p.label(),
        })
        .collect();
    (StatusCode::OK, Json(platforms))
}

/// Time-bucket catalog entry.
#[derive(Debug, Serialize, ToSchema)]
struct TimeBucketInfo {
    time_bucket: &'static str,
    label: &'static str,
    start_hour: u32,
    end_hour: u32,
}

/// `GET /config/time-buckets` — List time-of-day buckets.
#[utoipa::path(
    get,
    path = "/config/time-buckets",
    tag = "System",
    summary = "List time buckets",
    description = "Returns the wire name, display label, and hour range for every time-of-day bucket. The late_night range wraps midnight.",
    responses(
        (status = 200, description = "Time bucket catalog", body = Vec<TimeBucketInfo>),
    )
)]
pub async fn time_buckets_handler() -> impl IntoResponse {
    let buckets: Vec<TimeBucketInfo> = TimeBucket::ALL
        .iter()
        .map(|b| {
            let (start_hour, end_hour) = b.hour_range();
            TimeBucketInfo {
                time_bucket: b.as_str(),
                label: b.label(),
                start_hour,
                end_hour,
            }
        })
        .collect();
    (StatusCode::OK, Json(buckets))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/platforms", get(platforms_handler))
        .route("/config/time-buckets", get(time_buckets_handler))
}
