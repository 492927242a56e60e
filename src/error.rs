//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: tipAmount requires tipped = true",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                |
/// |-----------|-------------------|----------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request            |
/// | 2000–2999 | State / Access    | 404 / 401 / 403            |
/// | 3000–3999 | Server            | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A numeric input that must be finite was NaN or infinite. The
    /// aggregation core fails fast on these rather than emitting
    /// NaN-poisoned output.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Requested viewport exceeds the allowed span on at least one axis.
    #[error("viewport too large: spans are limited to {max_span} degrees")]
    ViewportTooLarge {
        /// Maximum allowed span per axis, in degrees.
        max_span: f64,
    },

    /// Delivery log with the given ID was not found.
    #[error("log not found: {0}")]
    LogNotFound(uuid::Uuid),

    /// No caller identity was supplied on a gated endpoint.
    #[error("missing caller identity")]
    Unauthorized,

    /// Caller is identified but has no active subscription.
    #[error("active subscription required")]
    SubscriptionRequired,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidInput(_) => 1002,
            Self::ViewportTooLarge { .. } => 1003,
            Self::LogNotFound(_) => 2001,
            Self::Unauthorized => 2100,
            Self::SubscriptionRequired => 2101,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidInput(_) | Self::ViewportTooLarge { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::LogNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::SubscriptionRequired => StatusCode::FORBIDDEN,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
