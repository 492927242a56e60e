//! tipmap-gateway server entry point.
//!
//! Starts the Axum HTTP server with the log, stats, and community
//! endpoints, backed by either the in-memory store or PostgreSQL.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tipmap_gateway::api;
use tipmap_gateway::app_state::AppState;
use tipmap_gateway::config::GatewayConfig;
use tipmap_gateway::service::LogService;
use tipmap_gateway::storage::{LogStore, MemoryLogStore, PostgresLogStore};
use tipmap_gateway::subscription::{AccessGate, PostgresLookup, StaticLookup, SubscriptionLookup};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting tipmap-gateway");

    // Build storage + subscription lookup
    let (store, lookup): (Arc<dyn LogStore>, Arc<dyn SubscriptionLookup>) =
        if config.persistence_enabled {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
                .connect(&config.database_url)
                .await?;
            tracing::info!("connected to PostgreSQL store");
            (
                Arc::new(PostgresLogStore::new(pool.clone())),
                Arc::new(PostgresLookup::new(pool)),
            )
        } else {
            tracing::info!("persistence disabled, using in-memory store");
            (Arc::new(MemoryLogStore::new()), Arc::new(StaticLookup::new()))
        };

    // Build application state
    let app_state = AppState {
        log_service: Arc::new(LogService::new(store)),
        access_gate: Arc::new(AccessGate::from_config(&config, lookup)),
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
