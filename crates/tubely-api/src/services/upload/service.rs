//! Asset upload pipeline
//!
//! authorize → decode → validate → name → store → record
//!
//! Each stage short-circuits on failure. Nothing is written to storage before
//! the caller is known to own the record and the declared type is accepted,
//! and the record is only updated after the asset has been stored.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Multipart;
use tubely_core::models::Video;
use tubely_core::{resolve_format, AppError, AssetKind};
use tubely_db::VideoStore;
use tubely_storage::{generate_storage_key, AssetSink};
use uuid::Uuid;

use super::decoder::{multipart_error, UploadDecoder};
use crate::state::AppState;

/// Runs one upload of a given asset kind.
pub struct AssetUploadService {
    kind: AssetKind,
    videos: Arc<dyn VideoStore>,
    sink: Arc<dyn AssetSink>,
    max_bytes: u64,
}

impl AssetUploadService {
    pub fn new(state: &AppState, kind: AssetKind) -> Self {
        Self {
            kind,
            videos: state.videos.clone(),
            sink: state.uploads.sink_for(kind),
            max_bytes: state.uploads.max_bytes_for(kind),
        }
    }

    /// Complete upload workflow. Returns the updated record.
    #[tracing::instrument(skip(self, multipart), fields(kind = %self.kind, video_id = %video_id, user_id = %user_id))]
    pub async fn upload(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        multipart: Multipart,
    ) -> Result<Video, AppError> {
        let start = Instant::now();

        // 1. Ownership
        let mut video = self.authorize(video_id, user_id).await?;

        // 2-5. Decode, validate, name, store
        let url = self.store_asset(multipart).await?;

        // 6. Record the URL
        self.record_url(&mut video, url).await?;

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset upload complete"
        );

        Ok(video)
    }

    /// Load the record and confirm the caller owns it.
    async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            tracing::debug!(owner_id = %video.user_id, "Upload refused: caller is not the owner");
            return Err(AppError::Unauthorized("User is not video owner".to_string()));
        }

        Ok(video)
    }

    /// Find the file part, validate its type and stream it into the sink.
    async fn store_asset(&self, mut multipart: Multipart) -> Result<String, AppError> {
        let decoder = UploadDecoder::new(self.kind, self.max_bytes);

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if !decoder.matches(&field) {
                continue;
            }

            let content_type = decoder.content_type(&field);
            let format = resolve_format(&content_type, self.kind)?;
            let key = generate_storage_key(format.extension)?;

            tracing::debug!(
                key = %key,
                content_type = %format.mime_type,
                backend = self.sink.backend_name(),
                "Storing asset"
            );

            let mut reader = decoder.reader(field);
            let url = self
                .sink
                .store(&key, format.mime_type, &mut reader)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, key = %key, "Asset storage failed");
                    AppError::from(e)
                })?;

            return Ok(url);
        }

        Err(decoder.missing_field())
    }

    /// Point the record at the stored asset. The asset stays orphaned if this
    /// fails.
    async fn record_url(&self, video: &mut Video, url: String) -> Result<(), AppError> {
        video.set_asset_url(self.kind, url);

        self.videos.update_video(video).await.map_err(|e| {
            tracing::error!(error = %e, video_id = %video.id, "Failed to update video record");
            match e {
                AppError::NotFound(msg) => AppError::Internal(msg),
                other => other,
            }
        })
    }
}
