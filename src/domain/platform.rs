//! Gig-delivery platform enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// The delivery platform a log entry belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Uber Eats.
    UberEats,
    /// DoorDash.
    Doordash,
    /// Instacart.
    Instacart,
    /// Grubhub.
    Grubhub,
    /// Amazon Flex.
    AmazonFlex,
    /// Shipt.
    Shipt,
    /// Anything else.
    Other,
}

impl Platform {
    /// All platforms, in display order.
    pub const ALL: [Self; 7] = [
        Self::UberEats,
        Self::Doordash,
        Self::Instacart,
        Self::Grubhub,
        Self::AmazonFlex,
        Self::Shipt,
        Self::Other,
    ];

    /// Human-readable display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UberEats => "Uber Eats",
            Self::Doordash => "DoorDash",
            Self::Instacart => "Instacart",
            Self::Grubhub => "Grubhub",
            Self::AmazonFlex => "Amazon Flex",
            Self::Shipt => "Shipt",
            Self::Other => "Other",
        }
    }

    /// Wire name (snake_case), matching the serde representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UberEats => "uber_eats",
            Self::Doordash => "doordash",
            Self::Instacart => "instacart",
            Self::Grubhub => "grubhub",
            Self::AmazonFlex => "amazon_flex",
            Self::Shipt => "shipt",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uber_eats" => Ok(Self::UberEats),
            "doordash" => Ok(Self::Doordash),
            "instacart" => Ok(Self::Instacart),
            "grubhub" => Ok(Self::Grubhub),
            "amazon_flex" => Ok(Self::AmazonFlex),
            "shipt" => Ok(Self::Shipt),
            "other" => Ok(Self::Other),
            other => Err(GatewayError::InvalidRequest(format!(
                "unknown platform: {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_round_trip() {
        for platform in Platform::ALL {
            let parsed = Platform::from_str(platform.as_str());
            assert_eq!(parsed.ok(), Some(platform));
        }
        assert!(Platform::from_str("postmates").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Platform::UberEats).ok();
        assert_eq!(json.as_deref(), Some("\"uber_eats\""));
        let back: Option<Platform> = serde_json::from_str("\"amazon_flex\"").ok();
        assert_eq!(back, Some(Platform::AmazonFlex));
    }

    #[test]
    fn labels_are_distinct() {
        use std::collections::HashSet;
        let labels: HashSet<_> = Platform::ALL.iter().map(Platform::label).collect();
        assert_eq!(labels.len(), Platform::ALL.len());
    }
}
