//! REST endpoint handlers organized by resource.

pub mod community;
pub mod logs;
pub mod stats;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(logs::routes())
        .merge(stats::routes())
        .merge(community::routes())
}
