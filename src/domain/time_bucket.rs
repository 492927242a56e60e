//! Time-of-day classification.
//!
//! Maps an hour of the day onto one of seven fixed, non-overlapping
//! buckets used as a grouping dimension throughout the aggregation
//! engine. `late_night` wraps across midnight (23:00–05:00).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// One of seven fixed time-of-day buckets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    /// 05:00–09:00.
    EarlyMorning,
    /// 09:00–12:00.
    Morning,
    /// 12:00–14:00.
    Lunch,
    /// 14:00–17:00.
    Afternoon,
    /// 17:00–20:00.
    Dinner,
    /// 20:00–23:00.
    Evening,
    /// 23:00–05:00, wraps midnight.
    LateNight,
}

impl TimeBucket {
    /// All buckets, in chronological order starting from early morning.
    pub const ALL: [Self; 7] = [
        Self::EarlyMorning,
        Self::Morning,
        Self::Lunch,
        Self::Afternoon,
        Self::Dinner,
        Self::Evening,
        Self::LateNight,
    ];

    /// Classifies an hour of the day (`0..=23`) into its bucket.
    ///
    /// Hours outside `0..=23` are treated modulo 24 so a caller passing
    /// an already-wrapped value cannot land outside the classification.
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=8 => Self::EarlyMorning,
            9..=11 => Self::Morning,
            12..=13 => Self::Lunch,
            14..=16 => Self::Afternoon,
            17..=19 => Self::Dinner,
            20..=22 => Self::Evening,
            _ => Self::LateNight,
        }
    }

    /// Human-readable display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EarlyMorning => "Early Morning",
            Self::Morning => "Morning",
            Self::Lunch => "Lunch",
            Self::Afternoon => "Afternoon",
            Self::Dinner => "Dinner",
            Self::Evening => "Evening",
            Self::LateNight => "Late Night",
        }
    }

    /// Half-open `[start, end)` hour range covered by the bucket.
    /// `LateNight` returns `(23, 5)`, wrapping midnight.
    #[must_use]
    pub const fn hour_range(&self) -> (u32, u32) {
        match self {
            Self::EarlyMorning => (5, 9),
            Self::Morning => (9, 12),
            Self::Lunch => (12, 14),
            Self::Afternoon => (14, 17),
            Self::Dinner => (17, 20),
            Self::Evening => (20, 23),
            Self::LateNight => (23, 5),
        }
    }

    /// Wire name (snake_case), matching the serde representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EarlyMorning => "early_morning",
            Self::Morning => "morning",
            Self::Lunch => "lunch",
            Self::Afternoon => "afternoon",
            Self::Dinner => "dinner",
            Self::Evening => "evening",
            Self::LateNight => "late_night",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBucket {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "early_morning" => Ok(Self::EarlyMorning),
            "morning" => Ok(Self::Morning),
            "lunch" => Ok(Self::Lunch),
            "afternoon" => Ok(Self::Afternoon),
            "dinner" => Ok(Self::Dinner),
            "evening" => Ok(Self::Evening),
            "late_night" => Ok(Self::LateNight),
            other => Err(GatewayError::InvalidRequest(format!(
                "unknown time bucket: {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    /// `true` if `hour` falls inside the bucket's range, honoring the
    /// late-night wrap across midnight.
    fn range_contains(bucket: TimeBucket, hour: u32) -> bool {
        let (start, end) = bucket.hour_range();
        if start < end {
            hour >= start && hour < end
        } else {
            hour >= start || hour < end
        }
    }

    #[test]
    fn every_hour_maps_into_its_buckets_range() {
        for hour in 0..24 {
            let bucket = TimeBucket::from_hour(hour);
            assert!(
                range_contains(bucket, hour),
                "hour {hour} classified as {bucket} but outside its range"
            );
        }
    }

    #[test]
    fn buckets_partition_the_day() {
        // Each hour belongs to exactly one bucket's range.
        for hour in 0..24 {
            let owners = TimeBucket::ALL
                .iter()
                .filter(|b| range_contains(**b, hour))
                .count();
            assert_eq!(owners, 1, "hour {hour} owned by {owners} buckets");
        }
    }

    #[test]
    fn boundary_hours() {
        assert_eq!(TimeBucket::from_hour(5), TimeBucket::EarlyMorning);
        assert_eq!(TimeBucket::from_hour(9), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(12), TimeBucket::Lunch);
        assert_eq!(TimeBucket::from_hour(14), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(17), TimeBucket::Dinner);
        assert_eq!(TimeBucket::from_hour(20), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(23), TimeBucket::LateNight);
    }

    #[test]
    fn late_night_wraps_midnight() {
        for hour in [23, 0, 1, 2, 3, 4] {
            assert_eq!(TimeBucket::from_hour(hour), TimeBucket::LateNight);
        }
        assert_ne!(TimeBucket::from_hour(5), TimeBucket::LateNight);
    }

    #[test]
    fn wire_name_round_trip() {
        for bucket in TimeBucket::ALL {
            let parsed = TimeBucket::from_str(bucket.as_str());
            assert_eq!(parsed.ok(), Some(bucket));
        }
        assert!(TimeBucket::from_str("brunch").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TimeBucket::LateNight).ok();
        assert_eq!(json.as_deref(), Some("\"late_night\""));
        let back: Option<TimeBucket> = serde_json::from_str("\"early_morning\"").ok();
        assert_eq!(back, Some(TimeBucket::EarlyMorning));
    }
}
