//! PostgreSQL implementation of the log store (shared community data).

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::LogStore;
use crate::domain::geo::snap_coord;
use crate::domain::{Bounds, DeliveryLog, LogId, Platform, TimeBucket};
use crate::error::GatewayError;

/// Row shape for the `delivery_logs` table.
type LogRow = (
    Uuid,
    f64,
    f64,
    String,
    String,
    bool,
    Option<f64>,
    NaiveDate,
    Option<String>,
    DateTime<Utc>,
);

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Inserts re-snap coordinates server-side: records crossing this trust
/// boundary can never carry unsnapped coordinates into the shared
/// store, no matter what the client submitted.
#[derive(Debug, Clone)]
pub struct PostgresLogStore {
    pool: PgPool,
}

impl PostgresLogStore {
    /// Creates a store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_log(row: LogRow) -> Result<DeliveryLog, GatewayError> {
        let (id, lat, lng, time_bucket, platform, tipped, tip_amount, date, notes, created_at) =
            row;
        Ok(DeliveryLog {
            id: LogId::from_uuid(id),
            lat,
            lng,
            time_bucket: TimeBucket::from_str(&time_bucket)
                .map_err(|_| GatewayError::PersistenceError(format!(
                    "unknown time_bucket in row {id}: {time_bucket}"
                )))?,
            platform: Platform::from_str(&platform).map_err(|_| {
                GatewayError::PersistenceError(format!("unknown platform in row {id}: {platform}"))
            })?,
            tipped,
            tip_amount,
            date,
            notes,
            created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, lat, lng, time_bucket, platform, tipped, tip_amount, \
     report_date, notes, created_at";

#[async_trait]
impl LogStore for PostgresLogStore {
    async fn fetch_all(&self) -> Result<Vec<DeliveryLog>, GatewayError> {
        let rows = sqlx::query_as::<_, LogRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM delivery_logs ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(Self::row_to_log).collect()
    }

    async fn fetch_in_bounds(&self, bounds: &Bounds) -> Result<Vec<DeliveryLog>, GatewayError> {
        let rows = sqlx::query_as::<_, LogRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM delivery_logs \
             WHERE lat >= $1 AND lat <= $2 AND lng >= $3 AND lng <= $4"
        ))
        .bind(bounds.min_lat)
        .bind(bounds.max_lat)
        .bind(bounds.min_lng)
        .bind(bounds.max_lng)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        rows.into_iter().map(Self::row_to_log).collect()
    }

    async fn insert(&self, log: DeliveryLog) -> Result<DeliveryLog, GatewayError> {
        // Defensive re-snap at the trust boundary.
        let lat = snap_coord(log.lat);
        let lng = snap_coord(log.lng);

        sqlx::query(
            "INSERT INTO delivery_logs \
             (id, lat, lng, time_bucket, platform, tipped, tip_amount, report_date, notes, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(log.id.as_uuid())
        .bind(lat)
        .bind(lng)
        .bind(log.time_bucket.as_str())
        .bind(log.platform.as_str())
        .bind(log.tipped)
        .bind(log.tip_amount)
        .bind(log.date)
        .bind(&log.notes)
        .bind(log.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(DeliveryLog { lat, lng, ..log })
    }

    async fn delete(&self, id: LogId) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM delivery_logs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::LogNotFound(*id.as_uuid()));
        }
        Ok(())
    }
}
