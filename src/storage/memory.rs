//! In-memory log store for single-driver and test deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::LogStore;
use crate::domain::{Bounds, DeliveryLog, LogId};
use crate::error::GatewayError;

/// `RwLock<HashMap>`-backed store. Concurrent reads are cheap; writes
/// serialize on the outer lock, which is fine at single-driver volume.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    logs: RwLock<HashMap<LogId, DeliveryLog>>,
}

impl MemoryLogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored logs.
    pub async fn len(&self) -> usize {
        self.logs.read().await.len()
    }

    /// Returns `true` if the store holds no logs.
    pub async fn is_empty(&self) -> bool {
        self.logs.read().await.is_empty()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn fetch_all(&self) -> Result<Vec<DeliveryLog>, GatewayError> {
        let map = self.logs.read().await;
        let mut logs: Vec<DeliveryLog> = map.values().cloned().collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }

    async fn fetch_in_bounds(&self, bounds: &Bounds) -> Result<Vec<DeliveryLog>, GatewayError> {
        let map = self.logs.read().await;
        Ok(map
            .values()
            .filter(|log| bounds.contains(log.lat, log.lng))
            .cloned()
            .collect())
    }

    async fn insert(&self, log: DeliveryLog) -> Result<DeliveryLog, GatewayError> {
        let mut map = self.logs.write().await;
        map.insert(log.id, log.clone());
        Ok(log)
    }

    async fn delete(&self, id: LogId) -> Result<(), GatewayError> {
        let mut map = self.logs.write().await;
        map.remove(&id)
            .map(|_| ())
            .ok_or(GatewayError::LogNotFound(*id.as_uuid()))
    }
}
