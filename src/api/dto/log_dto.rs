//! DTOs for creating and listing delivery logs.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DeliveryLog, LogId, LogInput, Platform, TimeBucket};
use crate::error::GatewayError;

/// Maximum length of a note, in characters.
pub const NOTES_MAX_CHARS: usize = 140;

/// Street-address shapes ("123 Main St", "42 Oak Avenue", ...).
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b\d+\s+\w+\s+(st|street|ave|avenue|blvd|boulevard|rd|road|dr|drive|ln|lane|way|ct|court|pl|place)\b",
    )
});

/// Honorific followed by a capitalized name ("Mr. Smith", "Dr Jones").
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?:Mr|Mrs|Ms|Miss|Dr|mr|mrs|ms|miss|dr)\b\.?\s+[A-Z][a-z]+"));

#[allow(clippy::unwrap_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Request body for `POST /api/v1/logs`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLogRequest {
    /// Raw latitude; snapped server-side.
    pub lat: f64,
    /// Raw longitude; snapped server-side.
    pub lng: f64,
    /// Time-of-day bucket.
    pub time_bucket: TimeBucket,
    /// Delivery platform.
    pub platform: Platform,
    /// Tip outcome.
    pub tipped: bool,
    /// Tip amount in dollars; only valid when `tipped` is true.
    #[serde(default)]
    pub tip_amount: Option<f64>,
    /// Calendar date of the delivery, `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Optional note, screened for address- and name-like content.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateLogRequest {
    /// Screens the request and converts it into a domain [`LogInput`].
    ///
    /// Numeric range checks live in [`DeliveryLog::create`]
    /// (`crate::domain::DeliveryLog::create`); this layer owns the
    /// free-text screening, which storage must never see fail.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the note is too
    /// long or contains a street address or personal name.
    pub fn into_input(self) -> Result<LogInput, GatewayError> {
        if let Some(notes) = self.notes.as_deref() {
            if notes.chars().count() > NOTES_MAX_CHARS {
                return Err(GatewayError::InvalidRequest(format!(
                    "notes must be {NOTES_MAX_CHARS} characters or fewer"
                )));
            }
            if ADDRESS_PATTERN.is_match(notes) {
                return Err(GatewayError::InvalidRequest(
                    "notes may not contain street addresses".to_string(),
                ));
            }
            if NAME_PATTERN.is_match(notes) {
                return Err(GatewayError::InvalidRequest(
                    "notes may not contain personal names".to_string(),
                ));
            }
        }

        Ok(LogInput {
            lat: self.lat,
            lng: self.lng,
            time_bucket: self.time_bucket,
            platform: self.platform,
            tipped: self.tipped,
            tip_amount: self.tip_amount,
            date: self.date,
            notes: self.notes,
        })
    }
}

/// A stored delivery log as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogDto {
    /// Log identifier.
    pub id: LogId,
    /// Snapped latitude.
    pub lat: f64,
    /// Snapped longitude.
    pub lng: f64,
    /// Time-of-day bucket.
    pub time_bucket: TimeBucket,
    /// Delivery platform.
    pub platform: Platform,
    /// Tip outcome.
    pub tipped: bool,
    /// Tip amount, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_amount: Option<f64>,
    /// Calendar date of the delivery.
    pub date: NaiveDate,
    /// Optional note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<DeliveryLog> for LogDto {
    fn from(log: DeliveryLog) -> Self {
        Self {
            id: log.id,
            lat: log.lat,
            lng: log.lng,
            time_bucket: log.time_bucket,
            platform: log.platform,
            tipped: log.tipped,
            tip_amount: log.tip_amount,
            date: log.date,
            notes: log.notes,
            created_at: log.created_at,
        }
    }
}

/// Response body for the personal log list.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogListResponse {
    /// Logs, newest first.
    pub logs: Vec<LogDto>,
}
