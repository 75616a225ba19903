#[cfg(feature = "storage-local")]
use crate::LocalAssetSink;
#[cfg(feature = "storage-s3")]
use crate::{ObjectStoreClient, StagedObjectSink};
use crate::{AssetSink, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Create the thumbnail sink: local files served under `/assets`.
pub async fn create_thumbnail_sink(config: &Config) -> StorageResult<Arc<dyn AssetSink>> {
    #[cfg(feature = "storage-local")]
    {
        let base_url = format!(
            "{}/assets",
            config.public_base_url().trim_end_matches('/')
        );
        let sink = LocalAssetSink::new(config.assets_root(), base_url).await?;
        Ok(Arc::new(sink))
    }

    #[cfg(not(feature = "storage-local"))]
    {
        let _ = config;
        Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        ))
    }
}

/// Create the video sink: staged locally, then transferred to S3.
pub fn create_video_sink(config: &Config) -> StorageResult<Arc<dyn AssetSink>> {
    #[cfg(feature = "storage-s3")]
    {
        if config.s3_bucket().is_empty() {
            return Err(StorageError::ConfigError(
                "S3_BUCKET not configured".to_string(),
            ));
        }

        let client = ObjectStoreClient::s3(
            config.s3_bucket().to_string(),
            config.s3_region().to_string(),
            config.s3_endpoint().map(String::from),
        )?;
        let staging_dir = config.staging_dir().map(|dir| dir.to_path_buf());

        tracing::info!(
            bucket = %config.s3_bucket(),
            region = %config.s3_region(),
            endpoint = ?config.s3_endpoint(),
            "Video sink configured"
        );

        Ok(Arc::new(StagedObjectSink::new(Arc::new(client), staging_dir)))
    }

    #[cfg(not(feature = "storage-s3"))]
    {
        let _ = config;
        Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        ))
    }
}
