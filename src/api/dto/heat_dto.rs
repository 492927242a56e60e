//! DTOs for the personal heat map and the community heat query.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Bounds, CommunityCell, HeatPoint, Platform, TimeBucket};
use crate::error::GatewayError;

/// Query parameters for `GET /api/v1/community/heat`.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityHeatParams {
    /// Southern viewport edge (required).
    pub min_lat: f64,
    /// Northern viewport edge (required).
    pub max_lat: f64,
    /// Western viewport edge (required).
    pub min_lng: f64,
    /// Eastern viewport edge (required).
    pub max_lng: f64,
    /// Optional platform filter.
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Optional time-bucket filter.
    #[serde(default)]
    pub time_bucket: Option<TimeBucket>,
}

impl CommunityHeatParams {
    /// Validates the viewport, rejecting non-finite edges, inverted
    /// rectangles, and spans over the 2-degree limit.
    ///
    /// # Errors
    ///
    /// See [`Bounds::new`].
    pub fn bounds(&self) -> Result<Bounds, GatewayError> {
        Bounds::new(self.min_lat, self.max_lat, self.min_lng, self.max_lng)
    }
}

/// One personal heat-map cell.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct HeatPointDto {
    /// Snapped cell latitude.
    pub lat: f64,
    /// Snapped cell longitude.
    pub lng: f64,
    /// Blended intensity in `[0, 1]`.
    pub intensity: f64,
}

impl From<HeatPoint> for HeatPointDto {
    fn from(point: HeatPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
            intensity: point.intensity,
        }
    }
}

/// Response body for `GET /api/v1/heatmap`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HeatmapResponse {
    /// One point per populated grid cell.
    pub points: Vec<HeatPointDto>,
}

/// One community heat cell: rate and count only, never row-level data.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPointDto {
    /// Snapped cell latitude.
    pub lat: f64,
    /// Snapped cell longitude.
    pub lng: f64,
    /// Fraction of deliveries in the cell that were tipped.
    pub tip_rate: f64,
    /// Number of deliveries in the cell.
    pub count: u64,
}

impl From<CommunityCell> for CommunityPointDto {
    fn from(cell: CommunityCell) -> Self {
        Self {
            lat: cell.lat,
            lng: cell.lng,
            tip_rate: cell.tip_rate,
            count: cell.count,
        }
    }
}

/// Response body for `GET /api/v1/community/heat`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommunityHeatResponse {
    /// One aggregate per populated grid cell; order is not significant.
    pub points: Vec<CommunityPointDto>,
}
