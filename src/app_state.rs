//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::LogService;
use crate::subscription::AccessGate;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Log service for all business logic.
    pub log_service: Arc<LogService>,
    /// Paywall gate for the community endpoints.
    pub access_gate: Arc<AccessGate>,
}
