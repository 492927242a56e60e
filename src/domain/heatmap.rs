//! Heat-map aggregation over grid cells.
//!
//! Events are grouped by their exact snapped coordinates, so the privacy
//! snap resolution directly controls heat-map cell size. Two variants
//! exist: the personal heat map with a blended intensity score, and the
//! bounded community variant that emits ONLY per-cell rate + count so no
//! row-level record can be reconstructed from its output.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DeliveryLog, Platform, TimeBucket};
use crate::error::GatewayError;

/// Tip amounts at or above this ceiling saturate the normalized
/// magnitude component at 1.0. Fixed policy constant.
pub const TIP_NORMALIZATION_CEILING: f64 = 10.0;

/// Weight of the tip-rate component in the intensity blend. The blend
/// favors reliability ("will I get tipped here") over magnitude.
pub const TIP_RATE_WEIGHT: f64 = 0.6;

/// Weight of the normalized average-tip component in the intensity blend.
pub const AVG_TIP_WEIGHT: f64 = 0.4;

/// One heat-map cell with blended `[0, 1]` intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    /// Snapped cell latitude.
    pub lat: f64,
    /// Snapped cell longitude.
    pub lng: f64,
    /// Blended intensity in `[0, 1]`.
    pub intensity: f64,
}

/// One community heat cell: grouped rate and count only, never per-row
/// data and never an average amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommunityCell {
    /// Snapped cell latitude.
    pub lat: f64,
    /// Snapped cell longitude.
    pub lng: f64,
    /// Fraction of deliveries in the cell that were tipped.
    pub tip_rate: f64,
    /// Number of deliveries in the cell.
    pub count: u64,
}

/// Per-cell accumulator, keyed by integer millidegrees. Ephemeral:
/// rebuilt from scratch on every aggregation call.
#[derive(Debug, Default)]
struct Cell {
    total: u64,
    tipped: u64,
    tip_sum: f64,
    tip_samples: u64,
}

/// Grouping key for a snapped coordinate pair. Snapped values are exact
/// multiples of 1e-3, so integer millidegrees are an exact, hashable
/// stand-in for the float pair: two logs share a cell iff their snapped
/// coordinates are identical.
#[allow(clippy::cast_possible_truncation)]
fn cell_key(lat: f64, lng: f64) -> (i64, i64) {
    ((lat * 1000.0).round() as i64, (lng * 1000.0).round() as i64)
}

/// Recovers the snapped coordinate pair from a cell key.
fn key_coords(key: (i64, i64)) -> (f64, f64) {
    (key.0 as f64 / 1000.0, key.1 as f64 / 1000.0)
}

/// Groups logs into cells, failing fast on non-finite coordinates.
fn group_cells<'a, I>(logs: I) -> Result<BTreeMap<(i64, i64), Cell>, GatewayError>
where
    I: IntoIterator<Item = &'a DeliveryLog>,
{
    let mut cells: BTreeMap<(i64, i64), Cell> = BTreeMap::new();
    for log in logs {
        if !log.lat.is_finite() || !log.lng.is_finite() {
            return Err(GatewayError::InvalidInput(format!(
                "non-finite coordinates on log {}",
                log.id
            )));
        }
        let cell = cells.entry(cell_key(log.lat, log.lng)).or_default();
        cell.total += 1;
        if log.tipped {
            cell.tipped += 1;
            if let Some(amount) = log.tip_amount {
                cell.tip_sum += amount;
                cell.tip_samples += 1;
            }
        }
    }
    Ok(cells)
}

/// Aggregates a snapshot of logs into heat points with blended intensity.
///
/// Per cell: `tip_rate = tipped / total`, `avg_tip` = mean of present
/// amounts (0 when none), then
/// `intensity = tip_rate * 0.6 + min(avg_tip / 10, 1) * 0.4`.
/// Empty input yields empty output. Output order is deterministic
/// regardless of input order.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] if any log carries a
/// non-finite coordinate.
pub fn heat_points(logs: &[DeliveryLog]) -> Result<Vec<HeatPoint>, GatewayError> {
    let cells = group_cells(logs)?;

    let mut points = Vec::with_capacity(cells.len());
    for (key, cell) in cells {
        let (lat, lng) = key_coords(key);
        let tip_rate = cell.tipped as f64 / cell.total as f64;
        let avg_tip = if cell.tip_samples > 0 {
            cell.tip_sum / cell.tip_samples as f64
        } else {
            0.0
        };
        let normalized = (avg_tip / TIP_NORMALIZATION_CEILING).min(1.0);
        let intensity = tip_rate * TIP_RATE_WEIGHT + normalized * AVG_TIP_WEIGHT;
        points.push(HeatPoint {
            lat,
            lng,
            intensity,
        });
    }
    Ok(points)
}

/// Aggregates a bounds-filtered snapshot for the community endpoint.
///
/// The snapshot is expected to be pre-filtered to a viewport by the
/// store; this function applies the optional platform and time-bucket
/// filters, then emits one `{lat, lng, tip_rate, count}` per populated
/// cell. Deliberately no `avg_tip` and no per-row data: the output must
/// never allow reconstruction of any single input record.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] if any log carries a
/// non-finite coordinate.
pub fn community_cells(
    logs: &[DeliveryLog],
    platform: Option<Platform>,
    time_bucket: Option<TimeBucket>,
) -> Result<Vec<CommunityCell>, GatewayError> {
    let filtered = logs.iter().filter(|log| {
        platform.is_none_or(|p| log.platform == p)
            && time_bucket.is_none_or(|b| log.time_bucket == b)
    });
    let cells = group_cells(filtered)?;

    let mut out = Vec::with_capacity(cells.len());
    for (key, cell) in cells {
        let (lat, lng) = key_coords(key);
        out.push(CommunityCell {
            lat,
            lng,
            tip_rate: cell.tipped as f64 / cell.total as f64,
            count: cell.total,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::{LogInput, TimeBucket};
    use chrono::NaiveDate;

    fn log(lat: f64, lng: f64, tipped: bool, amount: Option<f64>) -> DeliveryLog {
        log_on(lat, lng, tipped, amount, Platform::Doordash, TimeBucket::Dinner)
    }

    fn log_on(
        lat: f64,
        lng: f64,
        tipped: bool,
        amount: Option<f64>,
        platform: Platform,
        bucket: TimeBucket,
    ) -> DeliveryLog {
        let input = LogInput {
            lat,
            lng,
            time_bucket: bucket,
            platform,
            tipped,
            tip_amount: amount,
            date: NaiveDate::from_ymd_opt(2026, 8, 25).unwrap_or_default(),
            notes: None,
        };
        let Ok(log) = DeliveryLog::create(input) else {
            panic!("valid log input");
        };
        log
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let points = heat_points(&[]);
        assert_eq!(points.ok().map(|p| p.len()), Some(0));
    }

    #[test]
    fn same_cell_logs_collapse_to_one_point() {
        // Both raw coordinates snap onto the same cell.
        let logs = vec![
            log(37.774_912, -122.419_416, true, Some(5.0)),
            log(37.775_101, -122.419_301, false, None),
        ];
        let Ok(points) = heat_points(&logs) else {
            panic!("aggregation failed");
        };
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].lat, 37.775);
        assert_eq!(points[0].lng, -122.419);
    }

    #[test]
    fn distinct_cells_stay_distinct() {
        let logs = vec![
            log(37.775, -122.419, true, Some(5.0)),
            log(37.776, -122.419, true, Some(5.0)),
        ];
        let Ok(points) = heat_points(&logs) else {
            panic!("aggregation failed");
        };
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn intensity_blend_example() {
        // One tipped $5 delivery: rate 1.0, normalized 0.5,
        // intensity = 1.0 * 0.6 + 0.5 * 0.4 = 0.8.
        let logs = vec![log(37.775, -122.419, true, Some(5.0))];
        let Ok(points) = heat_points(&logs) else {
            panic!("aggregation failed");
        };
        assert!((points[0].intensity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn large_tips_saturate_at_the_ceiling() {
        let logs = vec![log(37.775, -122.419, true, Some(99.0))];
        let Ok(points) = heat_points(&logs) else {
            panic!("aggregation failed");
        };
        assert!((points[0].intensity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn group_without_amounts_uses_rate_only() {
        let logs = vec![
            log(37.775, -122.419, true, None),
            log(37.775, -122.419, false, None),
        ];
        let Ok(points) = heat_points(&logs) else {
            panic!("aggregation failed");
        };
        // rate 0.5, avg 0 => intensity 0.3
        assert!((points[0].intensity - 0.3).abs() < 1e-12);
    }

    #[test]
    fn intensity_stays_within_unit_interval() {
        // Pseudo-random logs from a seeded LCG; blend must stay in [0, 1].
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move || {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            (state >> 33) as f64 / f64::from(u32::MAX)
        };
        let mut logs = Vec::new();
        for _ in 0..500 {
            let lat = 37.0 + next();
            let lng = -123.0 + next();
            let tipped = next() > 0.4;
            let amount = if tipped && next() > 0.3 {
                Some((next() * 99.0).max(0.01))
            } else {
                None
            };
            logs.push(log(lat, lng, tipped, amount));
        }
        let Ok(points) = heat_points(&logs) else {
            panic!("aggregation failed");
        };
        for point in points {
            assert!(point.intensity >= 0.0 && point.intensity <= 1.0);
        }
    }

    #[test]
    fn single_event_cells_are_valid() {
        let logs = vec![log(37.775, -122.419, false, None)];
        let Ok(points) = heat_points(&logs) else {
            panic!("aggregation failed");
        };
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].intensity, 0.0);
    }

    #[test]
    fn output_is_deterministic_regardless_of_input_order() {
        let a = log(37.775, -122.419, true, Some(4.0));
        let b = log(37.776, -122.420, false, None);
        let c = log(37.775, -122.419, false, None);

        let Ok(fwd) = heat_points(&[a.clone(), b.clone(), c.clone()]) else {
            panic!("aggregation failed");
        };
        let Ok(rev) = heat_points(&[c, b, a]) else {
            panic!("aggregation failed");
        };
        assert_eq!(fwd, rev);
    }

    #[test]
    fn community_cells_never_expose_rows() {
        // Five logs in one cell must yield exactly one output row with
        // count and rate only.
        let logs: Vec<_> = (0..5)
            .map(|i| log(37.775, -122.419, i % 2 == 0, None))
            .collect();
        let Ok(cells) = community_cells(&logs, None, None) else {
            panic!("aggregation failed");
        };
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].count, 5);
        assert!((cells[0].tip_rate - 0.6).abs() < 1e-12);
    }

    #[test]
    fn community_cells_apply_filters() {
        let logs = vec![
            log_on(37.775, -122.419, true, None, Platform::Doordash, TimeBucket::Dinner),
            log_on(37.775, -122.419, false, None, Platform::UberEats, TimeBucket::Dinner),
            log_on(37.775, -122.419, false, None, Platform::Doordash, TimeBucket::Lunch),
        ];

        let Ok(by_platform) = community_cells(&logs, Some(Platform::Doordash), None) else {
            panic!("aggregation failed");
        };
        assert_eq!(by_platform[0].count, 2);

        let Ok(by_both) =
            community_cells(&logs, Some(Platform::Doordash), Some(TimeBucket::Dinner))
        else {
            panic!("aggregation failed");
        };
        assert_eq!(by_both[0].count, 1);
        assert_eq!(by_both[0].tip_rate, 1.0);

        let Ok(none) = community_cells(&logs, Some(Platform::Shipt), None) else {
            panic!("aggregation failed");
        };
        assert!(none.is_empty());
    }
}
