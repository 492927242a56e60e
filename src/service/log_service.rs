//! Log service: orchestrates store access and aggregation.

use std::sync::Arc;

use crate::domain::{
    Bounds, CommunityCell, DeliveryLog, HeatPoint, LogId, LogInput, Platform, Stats, TimeBucket,
    heatmap, stats,
};
use crate::error::GatewayError;
use crate::storage::LogStore;

/// Orchestration layer for all log operations.
///
/// Stateless coordinator: owns a handle to the injected [`LogStore`]
/// and recomputes every aggregate from a fresh snapshot on each read.
/// There is no cross-call cache and no event model — presentation
/// re-invokes these methods after a mutation.
#[derive(Debug, Clone)]
pub struct LogService {
    store: Arc<dyn LogStore>,
}

impl LogService {
    /// Creates a new `LogService` over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Validates, snaps, and persists a new delivery log.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on invalid input or store failure.
    pub async fn add_log(&self, input: LogInput) -> Result<DeliveryLog, GatewayError> {
        let log = DeliveryLog::create(input)?;
        let log = self.store.insert(log).await?;
        tracing::info!(id = %log.id, platform = %log.platform, "log recorded");
        Ok(log)
    }

    /// Deletes a delivery log by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::LogNotFound`] if no such log exists.
    pub async fn remove_log(&self, id: LogId) -> Result<(), GatewayError> {
        self.store.delete(id).await?;
        tracing::info!(%id, "log removed");
        Ok(())
    }

    /// Returns every log, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure.
    pub async fn list_logs(&self) -> Result<Vec<DeliveryLog>, GatewayError> {
        self.store.fetch_all().await
    }

    /// Recomputes personal rollup statistics from a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure.
    pub async fn personal_stats(&self) -> Result<Stats, GatewayError> {
        let logs = self.store.fetch_all().await?;
        Ok(stats::compute(&logs))
    }

    /// Recomputes the personal heat map from a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure or non-finite data.
    pub async fn personal_heat(&self) -> Result<Vec<HeatPoint>, GatewayError> {
        let logs = self.store.fetch_all().await?;
        heatmap::heat_points(&logs)
    }

    /// Computes the bounded community aggregate. The caller is expected
    /// to have passed the access gate and viewport validation already.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure or non-finite data.
    pub async fn community_heat(
        &self,
        bounds: &Bounds,
        platform: Option<Platform>,
        time_bucket: Option<TimeBucket>,
    ) -> Result<Vec<CommunityCell>, GatewayError> {
        let logs = self.store.fetch_in_bounds(bounds).await?;
        let cells = heatmap::community_cells(&logs, platform, time_bucket)?;
        tracing::debug!(
            rows = logs.len(),
            cells = cells.len(),
            "community aggregate computed"
        );
        Ok(cells)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::MemoryLogStore;
    use chrono::NaiveDate;

    fn make_service() -> LogService {
        LogService::new(Arc::new(MemoryLogStore::new()))
    }

    fn input(lat: f64, lng: f64, tipped: bool, amount: Option<f64>) -> LogInput {
        LogInput {
            lat,
            lng,
            time_bucket: TimeBucket::Dinner,
            platform: Platform::Doordash,
            tipped,
            tip_amount: amount,
            date: NaiveDate::from_ymd_opt(2026, 8, 25).unwrap_or_default(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn add_log_snaps_before_storing() {
        let service = make_service();
        let Ok(log) = service
            .add_log(input(37.774_912, -122.419_416, true, Some(5.0)))
            .await
        else {
            panic!("add failed");
        };
        assert_eq!(log.lat, 37.775);
        assert_eq!(log.lng, -122.419);

        let Ok(stored) = service.list_logs().await else {
            panic!("list failed");
        };
        assert_eq!(stored[0].lat, 37.775);
    }

    #[tokio::test]
    async fn add_log_rejects_invalid_input() {
        let service = make_service();
        let result = service.add_log(input(f64::NAN, -122.4, false, None)).await;
        assert!(result.is_err());

        let result = service.add_log(input(37.8, -122.4, false, Some(5.0))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn remove_log_round_trip() {
        let service = make_service();
        let Ok(log) = service.add_log(input(37.775, -122.419, false, None)).await else {
            panic!("add failed");
        };
        assert!(service.remove_log(log.id).await.is_ok());
        assert!(matches!(
            service.remove_log(log.id).await,
            Err(GatewayError::LogNotFound(_))
        ));
    }

    #[tokio::test]
    async fn personal_stats_recompute_on_read() {
        let service = make_service();
        let Ok(empty) = service.personal_stats().await else {
            panic!("stats failed");
        };
        assert_eq!(empty.total, 0);

        let _ = service.add_log(input(37.775, -122.419, true, Some(5.0))).await;
        let _ = service.add_log(input(37.775, -122.419, true, Some(15.0))).await;
        let _ = service.add_log(input(37.775, -122.419, false, None)).await;

        let Ok(stats) = service.personal_stats().await else {
            panic!("stats failed");
        };
        assert_eq!(stats.total, 3);
        assert!((stats.tip_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats.avg_tip - 10.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn personal_heat_groups_snapped_cells() {
        let service = make_service();
        let _ = service
            .add_log(input(37.774_912, -122.419_416, true, Some(5.0)))
            .await;
        let _ = service
            .add_log(input(37.775_101, -122.419_301, false, None))
            .await;

        let Ok(points) = service.personal_heat().await else {
            panic!("heat failed");
        };
        assert_eq!(points.len(), 1);
    }

    #[tokio::test]
    async fn community_heat_respects_bounds_and_filters() {
        let service = make_service();
        let _ = service.add_log(input(37.775, -122.419, true, None)).await;
        let _ = service.add_log(input(39.5, -122.419, true, None)).await; // outside

        let Ok(bounds) = Bounds::new(37.0, 38.0, -123.0, -122.0) else {
            panic!("valid bounds");
        };
        let Ok(cells) = service.community_heat(&bounds, None, None).await else {
            panic!("community failed");
        };
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].count, 1);

        let Ok(filtered) = service
            .community_heat(&bounds, Some(Platform::Shipt), None)
            .await
        else {
            panic!("community failed");
        };
        assert!(filtered.is_empty());
    }
}
