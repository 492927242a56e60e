//! Delivery log handlers: create, list, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};

use crate::api::dto::{CreateLogRequest, LogDto, LogListResponse};
use crate::api::handlers::community::require_subscriber;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /logs` — Record a delivery.
///
/// Coordinates are snapped server-side before storage regardless of
/// what the client submitted.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure or for callers
/// without an active subscription.
#[utoipa::path(
    post,
    path = "/api/v1/logs",
    tag = "Logs",
    summary = "Record a delivery",
    description = "Validates the entry, snaps its coordinates to the privacy grid, and stores it. Requires an active subscription (x-caller-id header).",
    request_body = CreateLogRequest,
    responses(
        (status = 201, description = "Log recorded", body = LogDto),
        (status = 400, description = "Invalid entry", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse),
        (status = 403, description = "Subscription required", body = ErrorResponse),
    )
)]
pub async fn create_log(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<CreateLogRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    require_subscriber(&state, &headers).await?;

    let input = req.into_input()?;
    let log = state.log_service.add_log(input).await?;

    Ok((StatusCode::CREATED, Json(LogDto::from(log))))
}

/// `GET /logs` — List the driver's logs, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/logs",
    tag = "Logs",
    summary = "List logs",
    description = "Returns every recorded delivery, newest first.",
    responses(
        (status = 200, description = "Log list", body = LogListResponse),
    )
)]
pub async fn list_logs(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let logs = state.log_service.list_logs().await?;
    Ok(Json(LogListResponse {
        logs: logs.into_iter().map(LogDto::from).collect(),
    }))
}

/// `DELETE /logs/:id` — Remove a delivery log.
///
/// # Errors
///
/// Returns [`GatewayError::LogNotFound`] if the log does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/logs/{id}",
    tag = "Logs",
    summary = "Delete a log",
    description = "Removes a single delivery log by id.",
    params(
        ("id" = uuid::Uuid, Path, description = "Log UUID"),
    ),
    responses(
        (status = 204, description = "Log deleted"),
        (status = 404, description = "Log not found", body = ErrorResponse),
    )
)]
pub async fn delete_log(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .log_service
        .remove_log(crate::domain::LogId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Log management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/logs", post(create_log).get(list_logs))
        .route("/logs/{id}", delete(delete_log))
}
