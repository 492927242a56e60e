//! DTOs for personal rollup statistics.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::stats::{PlatformStats, TimeBucketStats};
use crate::domain::{Platform, Stats, TimeBucket};

/// Per-platform breakdown entry.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsDto {
    /// Number of deliveries on the platform.
    pub total: u64,
    /// Number of tipped deliveries.
    pub tipped: u64,
    /// Average tip amount where present; 0 when none.
    pub avg_tip: f64,
}

/// Per-time-bucket breakdown entry.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct TimeBucketStatsDto {
    /// Number of deliveries in the bucket.
    pub total: u64,
    /// Number of tipped deliveries.
    pub tipped: u64,
}

/// Response body for `GET /api/v1/stats`.
///
/// Breakdown maps carry only the categories observed in the data, keyed
/// by their snake_case wire names.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Count of all deliveries.
    pub total: u64,
    /// Fraction of deliveries that were tipped.
    pub tip_rate: f64,
    /// Mean tip amount over tipped deliveries with an amount.
    pub avg_tip: f64,
    /// Breakdown by platform.
    pub by_platform: BTreeMap<Platform, PlatformStatsDto>,
    /// Breakdown by time bucket.
    pub by_time_bucket: BTreeMap<TimeBucket, TimeBucketStatsDto>,
}

impl From<PlatformStats> for PlatformStatsDto {
    fn from(stats: PlatformStats) -> Self {
        Self {
            total: stats.total,
            tipped: stats.tipped,
            avg_tip: stats.avg_tip,
        }
    }
}

impl From<TimeBucketStats> for TimeBucketStatsDto {
    fn from(stats: TimeBucketStats) -> Self {
        Self {
            total: stats.total,
            tipped: stats.tipped,
        }
    }
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            total: stats.total,
            tip_rate: stats.tip_rate,
            avg_tip: stats.avg_tip,
            by_platform: stats
                .by_platform
                .into_iter()
                .map(|(platform, s)| (platform, s.into()))
                .collect(),
            by_time_bucket: stats
                .by_time_bucket
                .into_iter()
                .map(|(bucket, s)| (bucket, s.into()))
                .collect(),
        }
    }
}
