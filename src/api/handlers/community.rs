//! Community heat query: bounded, subscription-gated, aggregate-only.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CommunityHeatParams, CommunityHeatResponse, CommunityPointDto};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// Header carrying the caller identity set by the upstream auth proxy.
pub const CALLER_ID_HEADER: &str = "x-caller-id";

/// Enforces the paywall: extracts the caller id and consults the gate.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthorized`] when no caller id is present
/// and [`GatewayError::SubscriptionRequired`] when the gate refuses.
pub async fn require_subscriber(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(), GatewayError> {
    let caller_id = headers
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::Unauthorized)?;

    if state.access_gate.is_authorized(caller_id).await? {
        Ok(())
    } else {
        tracing::debug!(caller_id, "community access refused");
        Err(GatewayError::SubscriptionRequired)
    }
}

/// `GET /community/heat` — Aggregated tip rates per grid cell.
///
/// Never returns raw rows: the response is one `{lat, lng, tipRate,
/// count}` per populated cell inside the viewport. The viewport is
/// validated before the store or the engine is touched, and the paywall
/// check runs before either.
///
/// # Errors
///
/// Returns [`GatewayError`] for missing identity, refused access, or an
/// invalid/oversized viewport.
#[utoipa::path(
    get,
    path = "/api/v1/community/heat",
    tag = "Community",
    summary = "Community tip-rate aggregate",
    description = "Returns per-grid-cell tip rate and count for the requested viewport (max 2x2 degrees), optionally filtered by platform and time bucket. Requires an active subscription (x-caller-id header).",
    params(CommunityHeatParams),
    responses(
        (status = 200, description = "Per-cell aggregates", body = CommunityHeatResponse),
        (status = 400, description = "Invalid or oversized viewport", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Subscription required", body = ErrorResponse),
    )
)]
pub async fn community_heat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CommunityHeatParams>,
) -> Result<impl IntoResponse, GatewayError> {
    require_subscriber(&state, &headers).await?;

    let bounds = params.bounds()?;
    let cells = state
        .log_service
        .community_heat(&bounds, params.platform, params.time_bucket)
        .await?;

    Ok(Json(CommunityHeatResponse {
        points: cells.into_iter().map(CommunityPointDto::from).collect(),
    }))
}

/// Community routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/community/heat", get(community_heat))
}
