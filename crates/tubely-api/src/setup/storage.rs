//! Storage setup: one sink per asset kind.

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_thumbnail_sink, create_video_sink, AssetSink};

/// Returns `(thumbnail_sink, video_sink)`.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn AssetSink>, Arc<dyn AssetSink>)> {
    let thumbnail_sink = create_thumbnail_sink(config)
        .await
        .context("Failed to initialize thumbnail storage")?;
    tracing::info!(
        assets_root = %config.assets_root().display(),
        backend = thumbnail_sink.backend_name(),
        "Thumbnail storage ready"
    );

    let video_sink = create_video_sink(config).context("Failed to initialize video storage")?;
    tracing::info!(
        staging_dir = ?config.staging_dir(),
        backend = video_sink.backend_name(),
        "Video storage ready"
    );

    Ok((thumbnail_sink, video_sink))
}
