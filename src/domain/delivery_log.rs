//! The delivery log record and its validated constructor.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::geo::snap_coord;
use super::{LogId, Platform, TimeBucket};
use crate::error::GatewayError;

/// Allowed tip amount range in dollars.
pub const TIP_AMOUNT_MIN: f64 = 0.01;
/// Upper bound on a plausible tip amount.
pub const TIP_AMOUNT_MAX: f64 = 99.99;

/// One recorded delivery. Immutable once created; owned by the store.
///
/// Coordinates are ALWAYS snapped to the privacy grid before the record
/// exists — [`DeliveryLog::create`] is the only constructor and applies
/// [`snap_coord`] to both axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryLog {
    /// Unique identifier, assigned at creation, never reused.
    pub id: LogId,
    /// Snapped latitude.
    pub lat: f64,
    /// Snapped longitude.
    pub lng: f64,
    /// Time-of-day bucket the delivery fell into.
    pub time_bucket: TimeBucket,
    /// Delivery platform.
    pub platform: Platform,
    /// Whether the delivery was tipped.
    pub tipped: bool,
    /// Tip amount in dollars; present only when `tipped` is true.
    pub tip_amount: Option<f64>,
    /// Calendar date the delivery occurred (independent of `created_at`).
    pub date: NaiveDate,
    /// Optional short free-text note. Content screening happens at the
    /// API boundary before this record is built.
    pub notes: Option<String>,
    /// Creation timestamp. Used only for ordering, never for business
    /// logic.
    pub created_at: DateTime<Utc>,
}

/// Validated-at-the-boundary input for creating a [`DeliveryLog`].
#[derive(Debug, Clone)]
pub struct LogInput {
    /// Raw latitude, snapped during creation.
    pub lat: f64,
    /// Raw longitude, snapped during creation.
    pub lng: f64,
    /// Time-of-day bucket.
    pub time_bucket: TimeBucket,
    /// Delivery platform.
    pub platform: Platform,
    /// Tip outcome.
    pub tipped: bool,
    /// Tip amount, only meaningful when `tipped` is true.
    pub tip_amount: Option<f64>,
    /// Calendar date of the delivery.
    pub date: NaiveDate,
    /// Optional note.
    pub notes: Option<String>,
}

impl DeliveryLog {
    /// Builds a new log entry: validates numeric ranges, snaps both
    /// coordinates, and assigns the identifier and creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for non-finite coordinates
    /// or tip amounts, and [`GatewayError::InvalidRequest`] for
    /// out-of-range coordinates, a tip amount without `tipped = true`,
    /// or a tip amount outside `0.01..=99.99`.
    pub fn create(input: LogInput) -> Result<Self, GatewayError> {
        if !input.lat.is_finite() || !input.lng.is_finite() {
            return Err(GatewayError::InvalidInput(
                "coordinates must be finite numbers".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&input.lat) {
            return Err(GatewayError::InvalidRequest(format!(
                "latitude out of range: {}",
                input.lat
            )));
        }
        if !(-180.0..=180.0).contains(&input.lng) {
            return Err(GatewayError::InvalidRequest(format!(
                "longitude out of range: {}",
                input.lng
            )));
        }
        if let Some(amount) = input.tip_amount {
            if !input.tipped {
                return Err(GatewayError::InvalidRequest(
                    "tipAmount requires tipped = true".to_string(),
                ));
            }
            if !amount.is_finite() {
                return Err(GatewayError::InvalidInput(
                    "tip amount must be a finite number".to_string(),
                ));
            }
            if !(TIP_AMOUNT_MIN..=TIP_AMOUNT_MAX).contains(&amount) {
                return Err(GatewayError::InvalidRequest(format!(
                    "tip amount out of range: {amount}"
                )));
            }
        }

        Ok(Self {
            id: LogId::new(),
            lat: snap_coord(input.lat),
            lng: snap_coord(input.lng),
            time_bucket: input.time_bucket,
            platform: input.platform,
            tipped: input.tipped,
            tip_amount: input.tip_amount,
            date: input.date,
            notes: input.notes,
            created_at: Utc::now(),
        })
    }
}
