use crate::copy::copy_body;
use crate::keys::validate_key;
use crate::traits::{AssetSink, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncRead;

/// Direct-write sink for thumbnails.
///
/// Files land at `<root>/<key>` and are served back under `<base_url>/<key>`.
/// Nothing is staged, so a failed write can leave a partial file behind; the
/// caller never records its URL in that case.
#[derive(Clone)]
pub struct LocalAssetSink {
    root: PathBuf,
    base_url: String,
}

impl LocalAssetSink {
    /// Create a new sink, creating the asset root if it does not exist yet.
    ///
    /// # Arguments
    /// * `root` - Directory assets are written to (e.g., "./assets")
    /// * `base_url` - URL prefix the directory is served under (e.g., "http://localhost:8091/assets")
    pub async fn new(root: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create assets directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalAssetSink { root, base_url })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl AssetSink for LocalAssetSink {
    async fn store(
        &self,
        key: &str,
        _content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let destination = path.display().to_string();
        let bytes_written = copy_body(reader, &mut file, &destination).await?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = bytes_written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local asset write successful"
        );

        Ok(self.generate_url(key))
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
