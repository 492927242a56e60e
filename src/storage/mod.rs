//! Storage collaborator: the injected log store.
//!
//! The aggregation core never touches storage directly — it borrows a
//! snapshot fetched through [`LogStore`]. The trait is object-safe so
//! the service can hold `Arc<dyn LogStore>` and tests can inject the
//! in-memory implementation.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Bounds, DeliveryLog, LogId};
use crate::error::GatewayError;

pub use memory::MemoryLogStore;
pub use postgres::PostgresLogStore;

/// Collection-query capability over delivery logs.
#[async_trait]
pub trait LogStore: Send + Sync + std::fmt::Debug {
    /// Returns every log, newest first by creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn fetch_all(&self) -> Result<Vec<DeliveryLog>, GatewayError>;

    /// Returns the logs whose coordinates lie inside the viewport
    /// (edges inclusive).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn fetch_in_bounds(&self, bounds: &Bounds) -> Result<Vec<DeliveryLog>, GatewayError>;

    /// Persists a log entry, returning it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on backend failure.
    async fn insert(&self, log: DeliveryLog) -> Result<DeliveryLog, GatewayError>;

    /// Deletes a log entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::LogNotFound`] if no such log exists and
    /// [`GatewayError::PersistenceError`] on backend failure.
    async fn delete(&self, id: LogId) -> Result<(), GatewayError>;
}
