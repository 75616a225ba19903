//! Application state.
//!
//! One `AppState` is built at startup and shared behind an `Arc`. Sinks and the
//! store are trait objects so tests can substitute them.

use std::sync::Arc;

use tubely_core::{AssetKind, Config};
use tubely_db::VideoStore;
use tubely_storage::AssetSink;

/// Sinks and size ceilings for the two asset kinds.
#[derive(Clone)]
pub struct UploadConfig {
    pub thumbnail_sink: Arc<dyn AssetSink>,
    pub video_sink: Arc<dyn AssetSink>,
    pub max_thumbnail_bytes: u64,
    pub max_video_bytes: u64,
}

impl UploadConfig {
    pub fn sink_for(&self, kind: AssetKind) -> Arc<dyn AssetSink> {
        match kind {
            AssetKind::Thumbnail => self.thumbnail_sink.clone(),
            AssetKind::Video => self.video_sink.clone(),
        }
    }

    pub fn max_bytes_for(&self, kind: AssetKind) -> u64 {
        match kind {
            AssetKind::Thumbnail => self.max_thumbnail_bytes,
            AssetKind::Video => self.max_video_bytes,
        }
    }
}

pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub uploads: UploadConfig,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoStore>,
        thumbnail_sink: Arc<dyn AssetSink>,
        video_sink: Arc<dyn AssetSink>,
    ) -> Arc<Self> {
        let uploads = UploadConfig {
            thumbnail_sink,
            video_sink,
            max_thumbnail_bytes: config.max_thumbnail_size_bytes(),
            max_video_bytes: config.max_video_size_bytes(),
        };

        Arc::new(AppState {
            config,
            videos,
            uploads,
        })
    }
}
