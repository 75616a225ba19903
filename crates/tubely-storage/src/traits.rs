//! Storage abstraction traits
//!
//! `AssetSink` is what the upload pipeline writes to. `ObjectClient` is the
//! narrower seam the staging sink uses to push a finished file to an object
//! store, so tests can swap the remote side without touching the staging logic.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading the client's upload body failed (truncated, oversized, aborted).
    #[error("Failed to read upload body: {0}")]
    BodyRead(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::BodyRead(msg) => AppError::BadRequest(msg),
            StorageError::KeyGeneration(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Destination for one uploaded asset.
///
/// A sink consumes `reader` until EOF, persists the bytes under `key` and
/// returns the public URL of the stored asset. Sinks run their own copy loop so
/// they can tell a broken upload body (`BodyRead`) apart from a failing
/// destination (`UploadFailed`).
#[async_trait]
pub trait AssetSink: Send + Sync {
    async fn store(
        &self,
        key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Object-store side of the stage-then-transfer sink.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Upload `content_length` bytes from `reader` to `key` with the given
    /// content type.
    async fn put(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        content_length: u64,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Public URL of the object stored under `key`.
    fn object_url(&self, key: &str) -> String;
}
