//! Coordinate privacy filter and viewport geometry.
//!
//! [`snap_coord`] is the single mechanism by which no exact address is
//! ever persisted or transmitted: every coordinate is rounded onto a
//! 3-decimal grid (~111 m of latitude) before storage, and re-applied by
//! the PostgreSQL store before any write that crosses the trust boundary.

use serde::Serialize;

use crate::error::GatewayError;

/// Snap resolution as a multiplier: 3 decimal places, ~111 m of latitude
/// at the equator (coarser for longitude away from it).
const SNAP_SCALE: f64 = 1000.0;

/// Maximum viewport span per axis, in degrees. Queries wider than this
/// are rejected before any aggregation runs.
pub const MAX_VIEWPORT_SPAN_DEGREES: f64 = 2.0;

/// Mean Earth radius in meters, used by [`haversine_distance`].
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Snaps a coordinate to the privacy grid (3 decimal places).
///
/// Deterministic and idempotent: `snap_coord(snap_coord(x)) ==
/// snap_coord(x)` for all finite `x`. Assumes finite input; non-finite
/// values are rejected upstream.
#[must_use]
pub fn snap_coord(value: f64) -> f64 {
    (value * SNAP_SCALE).round() / SNAP_SCALE
}

/// Great-circle distance between two coordinates, in meters.
#[must_use]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Rectangular lat/lng viewport for bounded community queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl Bounds {
    /// Builds a validated viewport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] for non-finite edges,
    /// [`GatewayError::InvalidRequest`] for an inverted rectangle, and
    /// [`GatewayError::ViewportTooLarge`] when either span exceeds
    /// [`MAX_VIEWPORT_SPAN_DEGREES`].
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Result<Self, GatewayError> {
        let edges = [min_lat, max_lat, min_lng, max_lng];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(GatewayError::InvalidInput(
                "viewport edges must be finite numbers".to_string(),
            ));
        }
        if min_lat > max_lat || min_lng > max_lng {
            return Err(GatewayError::InvalidRequest(
                "viewport min edges must not exceed max edges".to_string(),
            ));
        }
        if max_lat - min_lat > MAX_VIEWPORT_SPAN_DEGREES
            || max_lng - min_lng > MAX_VIEWPORT_SPAN_DEGREES
        {
            return Err(GatewayError::ViewportTooLarge {
                max_span: MAX_VIEWPORT_SPAN_DEGREES,
            });
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Returns `true` if the coordinate lies inside the viewport
    /// (edges inclusive).
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_three_decimals() {
        assert_eq!(snap_coord(37.774_912), 37.775);
        assert_eq!(snap_coord(-122.419_416), -122.419);
        assert_eq!(snap_coord(0.0), 0.0);
    }

    #[test]
    fn snap_is_idempotent() {
        for raw in [37.774_912, -122.419_416, 0.000_4, -0.000_5, 89.999_9] {
            let once = snap_coord(raw);
            assert_eq!(snap_coord(once), once, "snap not idempotent for {raw}");
        }
    }

    #[test]
    fn snap_distinguishes_cells_a_grid_step_apart() {
        let a = snap_coord(37.774_0);
        let b = snap_coord(37.775_0);
        assert_ne!(a, b);
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        assert_eq!(haversine_distance(37.775, -122.419, 37.775, -122.419), 0.0);
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km everywhere.
        let d = haversine_distance(37.0, -122.0, 38.0, -122.0);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn bounds_accepts_small_viewport() {
        let bounds = Bounds::new(37.0, 38.0, -123.0, -122.0);
        assert!(bounds.is_ok());
    }

    #[test]
    fn bounds_rejects_wide_spans() {
        let lat_wide = Bounds::new(37.0, 39.5, -123.0, -122.0);
        assert!(matches!(
            lat_wide,
            Err(GatewayError::ViewportTooLarge { .. })
        ));

        let lng_wide = Bounds::new(37.0, 38.0, -125.0, -122.0);
        assert!(matches!(
            lng_wide,
            Err(GatewayError::ViewportTooLarge { .. })
        ));
    }

    #[test]
    fn bounds_rejects_non_finite_and_inverted() {
        assert!(Bounds::new(f64::NAN, 38.0, -123.0, -122.0).is_err());
        assert!(Bounds::new(37.0, f64::INFINITY, -123.0, -122.0).is_err());
        assert!(Bounds::new(38.0, 37.0, -123.0, -122.0).is_err());
    }

    #[test]
    fn bounds_containment_is_edge_inclusive() {
        let Ok(bounds) = Bounds::new(37.0, 38.0, -123.0, -122.0) else {
            panic!("valid bounds");
        };
        assert!(bounds.contains(37.0, -123.0));
        assert!(bounds.contains(38.0, -122.0));
        assert!(bounds.contains(37.5, -122.5));
        assert!(!bounds.contains(36.999, -122.5));
        assert!(!bounds.contains(37.5, -121.999));
    }
}
