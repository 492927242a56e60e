//! Paywall / subscription checks for the community endpoints.
//!
//! Single source of truth for access decisions: no handler re-implements
//! this logic. The aggregation core itself is policy-free — handlers
//! consult the [`AccessGate`] before the engine ever runs.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Billing state of a caller, as reported by the payments collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid and current.
    Active,
    /// Payment failed, in grace period.
    PastDue,
    /// Subscription ended.
    Canceled,
    /// Never subscribed.
    Inactive,
}

impl FromStr for SubscriptionStatus {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "past_due" => Ok(Self::PastDue),
            "canceled" => Ok(Self::Canceled),
            "inactive" => Ok(Self::Inactive),
            other => Err(GatewayError::Internal(format!(
                "unknown subscription status: {other}"
            ))),
        }
    }
}

/// Resolves a caller id to its subscription status, if known.
#[async_trait]
pub trait SubscriptionLookup: Send + Sync + fmt::Debug {
    /// Returns the caller's status, or `None` for unknown callers.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn status_for(&self, caller_id: &str)
    -> Result<Option<SubscriptionStatus>, GatewayError>;
}

/// Fixed-map lookup for development and tests.
#[derive(Debug, Default)]
pub struct StaticLookup {
    statuses: HashMap<String, SubscriptionStatus>,
}

impl StaticLookup {
    /// Creates an empty lookup (every caller unknown).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a caller with the given status.
    #[must_use]
    pub fn with(mut self, caller_id: &str, status: SubscriptionStatus) -> Self {
        self.statuses.insert(caller_id.to_string(), status);
        self
    }
}

#[async_trait]
impl SubscriptionLookup for StaticLookup {
    async fn status_for(
        &self,
        caller_id: &str,
    ) -> Result<Option<SubscriptionStatus>, GatewayError> {
        Ok(self.statuses.get(caller_id).copied())
    }
}

/// Looks up `profiles.stripe_status` in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresLookup {
    pool: PgPool,
}

impl PostgresLookup {
    /// Creates a lookup backed by the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionLookup for PostgresLookup {
    async fn status_for(
        &self,
        caller_id: &str,
    ) -> Result<Option<SubscriptionStatus>, GatewayError> {
        let row = sqlx::query_scalar::<_, Option<String>>(
            "SELECT stripe_status FROM profiles WHERE id = $1",
        )
        .bind(caller_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        match row.flatten() {
            Some(status) => Ok(Some(SubscriptionStatus::from_str(&status)?)),
            None => Ok(None),
        }
    }
}

/// Decides whether a caller may read community aggregates.
///
/// Order of checks: global bypass switch, then the dev-bypass id list,
/// then the lookup backend (authorized iff `active`).
#[derive(Debug, Clone)]
pub struct AccessGate {
    bypass_paywall: bool,
    dev_bypass_ids: HashSet<String>,
    lookup: Arc<dyn SubscriptionLookup>,
}

impl AccessGate {
    /// Creates a gate with explicit settings.
    #[must_use]
    pub fn new(
        bypass_paywall: bool,
        dev_bypass_ids: impl IntoIterator<Item = String>,
        lookup: Arc<dyn SubscriptionLookup>,
    ) -> Self {
        Self {
            bypass_paywall,
            dev_bypass_ids: dev_bypass_ids.into_iter().collect(),
            lookup,
        }
    }

    /// Creates a gate from configuration plus a lookup backend.
    #[must_use]
    pub fn from_config(config: &GatewayConfig, lookup: Arc<dyn SubscriptionLookup>) -> Self {
        Self::new(
            config.bypass_paywall,
            config.dev_bypass_ids.iter().cloned(),
            lookup,
        )
    }

    /// Returns `true` if the caller may read community aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the lookup backend
    /// fails.
    pub async fn is_authorized(&self, caller_id: &str) -> Result<bool, GatewayError> {
        if self.bypass_paywall {
            return Ok(true);
        }
        if self.dev_bypass_ids.contains(caller_id) {
            return Ok(true);
        }
        let status = self.lookup.status_for(caller_id).await?;
        Ok(status == Some(SubscriptionStatus::Active))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn gate(bypass: bool, dev_ids: &[&str], lookup: StaticLookup) -> AccessGate {
        AccessGate::new(
            bypass,
            dev_ids.iter().map(|s| (*s).to_string()),
            Arc::new(lookup),
        )
    }

    #[tokio::test]
    async fn bypass_waves_everyone_through() {
        let gate = gate(true, &[], StaticLookup::new());
        assert_eq!(gate.is_authorized("anyone").await.ok(), Some(true));
    }

    #[tokio::test]
    async fn dev_ids_are_always_authorized() {
        let gate = gate(false, &["dev@example.com"], StaticLookup::new());
        assert_eq!(gate.is_authorized("dev@example.com").await.ok(), Some(true));
        assert_eq!(gate.is_authorized("stranger").await.ok(), Some(false));
    }

    #[tokio::test]
    async fn only_active_status_is_authorized() {
        let lookup = StaticLookup::new()
            .with("paying", SubscriptionStatus::Active)
            .with("lapsed", SubscriptionStatus::PastDue)
            .with("gone", SubscriptionStatus::Canceled)
            .with("never", SubscriptionStatus::Inactive);
        let gate = gate(false, &[], lookup);

        assert_eq!(gate.is_authorized("paying").await.ok(), Some(true));
        assert_eq!(gate.is_authorized("lapsed").await.ok(), Some(false));
        assert_eq!(gate.is_authorized("gone").await.ok(), Some(false));
        assert_eq!(gate.is_authorized("never").await.ok(), Some(false));
        assert_eq!(gate.is_authorized("unknown").await.ok(), Some(false));
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!(
            SubscriptionStatus::from_str("active").ok(),
            Some(SubscriptionStatus::Active)
        );
        assert_eq!(
            SubscriptionStatus::from_str("past_due").ok(),
            Some(SubscriptionStatus::PastDue)
        );
        assert!(SubscriptionStatus::from_str("trialing").is_err());
    }
}
