//! Storage and store doubles that fail on purpose.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::{InMemoryVideoStore, VideoStore};
use tubely_storage::{ObjectClient, StorageError, StorageResult};
use uuid::Uuid;

/// Reads the staged file, then refuses it like an unreachable bucket would.
pub struct FailingObjectClient;

#[async_trait]
impl ObjectClient for FailingObjectClient {
    async fn put(
        &self,
        _key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        _content_length: u64,
        _content_type: &str,
    ) -> StorageResult<()> {
        let mut drained = Vec::new();
        reader.read_to_end(&mut drained).await?;
        Err(StorageError::UploadFailed(
            "dispatch failure: connection refused".to_string(),
        ))
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://unreachable.invalid/{}", key)
    }
}

/// Reads work, every update fails.
pub struct FailingUpdateStore {
    inner: InMemoryVideoStore,
}

impl FailingUpdateStore {
    pub fn new(inner: InMemoryVideoStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl VideoStore for FailingUpdateStore {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        self.inner.create_video(video).await
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.inner.get_video(id).await
    }

    async fn update_video(&self, _video: &Video) -> Result<(), AppError> {
        Err(AppError::Internal("metadata store is read-only".to_string()))
    }
}
