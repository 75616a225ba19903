//! Application setup and initialization
//!
//! Everything main.rs needs to go from a loaded `Config` to a running router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::{Config, MetadataStoreBackend};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_json())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        metadata_store = %config.metadata_store(),
        "Configuration loaded and validated successfully"
    );

    let pool = match config.metadata_store() {
        MetadataStoreBackend::Postgres => Some(database::setup_database(&config).await?),
        MetadataStoreBackend::Memory => None,
    };
    let videos = tubely_db::create_video_store(&config, pool)
        .map_err(|e| anyhow::anyhow!("Failed to create video store: {}", e))?;

    let (thumbnail_sink, video_sink) = storage::setup_storage(&config).await?;

    let state = AppState::new(config, videos, thumbnail_sink, video_sink);
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
