use crate::copy::copy_body;
use crate::keys::validate_key;
use crate::traits::{AssetSink, ObjectClient, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncSeekExt};

const STAGING_PREFIX: &str = "tubely-upload";

/// Stage-then-transfer sink for videos.
///
/// The whole upload is written to a private temporary file first, then handed
/// to the object client. The temporary file is a `NamedTempFile` guard, so it
/// is removed on every exit path, including a dropped request future.
#[derive(Clone)]
pub struct StagedObjectSink {
    client: Arc<dyn ObjectClient>,
    staging_dir: Option<PathBuf>,
}

impl StagedObjectSink {
    /// `staging_dir` of `None` stages in the OS temp directory.
    pub fn new(client: Arc<dyn ObjectClient>, staging_dir: Option<PathBuf>) -> Self {
        StagedObjectSink {
            client,
            staging_dir,
        }
    }

    fn create_staging_file(&self, extension: &str) -> StorageResult<tempfile::NamedTempFile> {
        let suffix = format!(".{}", extension);
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX).suffix(&suffix);

        let staged = match self.staging_dir {
            Some(ref dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };

        staged.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create staging file: {}", e))
        })
    }
}

#[async_trait]
impl AssetSink for StagedObjectSink {
    async fn store(
        &self,
        key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String> {
        validate_key(key)?;
        let start = std::time::Instant::now();
        let extension = key.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin");

        let staged = self.create_staging_file(extension)?;
        let handle = staged.as_file().try_clone().map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open staging file: {}", e))
        })?;
        let mut file = tokio::fs::File::from_std(handle);

        let destination = staged.path().display().to_string();
        let size = copy_body(reader, &mut file, &destination).await?;

        tracing::debug!(
            key = %key,
            size_bytes = size,
            staging_path = %destination,
            "Upload staged"
        );

        file.seek(SeekFrom::Start(0)).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to rewind staging file: {}", e))
        })?;

        self.client.put(key, &mut file, size, content_type).await?;

        drop(file);
        if let Err(e) = staged.close() {
            tracing::warn!(error = %e, key = %key, "Failed to remove staging file");
        }

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Staged upload transferred"
        );

        Ok(self.client.object_url(key))
    }

    fn backend_name(&self) -> &'static str {
        "object-store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectStoreClient;
    use object_store::memory::InMemory;
    use object_store::path::Path;
    use object_store::{GetOptions, ObjectStore};
    use std::io;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::task::{Context, Poll};
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, ReadBuf};

    /// Hands out some bytes, then fails like a client that hung up.
    struct TruncatedBody {
        remaining: usize,
    }

    impl AsyncRead for TruncatedBody {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.remaining == 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed mid-body",
                )));
            }
            let n = self.remaining.min(buf.remaining()).min(4096);
            buf.put_slice(&vec![9u8; n]);
            self.remaining -= n;
            Poll::Ready(Ok(()))
        }
    }

    /// Object client that reads everything and then refuses it.
    struct RejectingClient {
        saw_staged_file: AtomicBool,
        staging_dir: PathBuf,
    }

    #[async_trait]
    impl ObjectClient for RejectingClient {
        async fn put(
            &self,
            _key: &str,
            reader: &mut (dyn AsyncRead + Send + Unpin),
            _content_length: u64,
            _content_type: &str,
        ) -> StorageResult<()> {
            let staged = std::fs::read_dir(&self.staging_dir).unwrap().count();
            self.saw_staged_file.store(staged == 1, Ordering::SeqCst);
            let mut sink = Vec::new();
            reader.read_to_end(&mut sink).await?;
            Err(StorageError::UploadFailed("bucket unavailable".to_string()))
        }

        fn object_url(&self, key: &str) -> String {
            format!("https://unused/{}", key)
        }
    }

    fn entries(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_transfers_bytes_and_cleans_up() {
        let staging = tempdir().unwrap();
        let memory = Arc::new(InMemory::new());
        let client = ObjectStoreClient::new(
            memory.clone(),
            "tubely-12345".to_string(),
            "us-east-2".to_string(),
            None,
        );
        let sink = StagedObjectSink::new(Arc::new(client), Some(staging.path().to_path_buf()));

        let data = vec![42u8; 300 * 1024];
        let mut reader: &[u8] = &data;
        let url = sink.store("clip.mp4", "video/mp4", &mut reader).await.unwrap();

        assert_eq!(url, "https://tubely-12345.s3.us-east-2.amazonaws.com/clip.mp4");
        let stored = memory
            .get_opts(&Path::from("clip.mp4"), GetOptions::default())
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(stored.as_ref(), data.as_slice());
        assert_eq!(entries(staging.path()), 0);
    }

    #[tokio::test]
    async fn test_transfer_failure_cleans_up() {
        let staging = tempdir().unwrap();
        let client = Arc::new(RejectingClient {
            saw_staged_file: AtomicBool::new(false),
            staging_dir: staging.path().to_path_buf(),
        });
        let sink = StagedObjectSink::new(client.clone(), Some(staging.path().to_path_buf()));

        let mut reader: &[u8] = b"not really an mp4";
        let result = sink.store("clip.mp4", "video/mp4", &mut reader).await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(client.saw_staged_file.load(Ordering::SeqCst));
        assert_eq!(entries(staging.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_staging_dir_is_upload_failure() {
        let staging = tempdir().unwrap();
        let missing = staging.path().join("does-not-exist");
        let client = ObjectStoreClient::new(
            Arc::new(InMemory::new()),
            "tubely-12345".to_string(),
            "us-east-2".to_string(),
            None,
        );
        let sink = StagedObjectSink::new(Arc::new(client), Some(missing));

        let mut reader: &[u8] = b"data";
        let result = sink.store("clip.mp4", "video/mp4", &mut reader).await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
    }

    #[tokio::test]
    async fn test_body_read_failure_cleans_up() {
        let staging = tempdir().unwrap();
        let memory = Arc::new(InMemory::new());
        let client = ObjectStoreClient::new(
            memory.clone(),
            "tubely-12345".to_string(),
            "us-east-2".to_string(),
            None,
        );
        let sink = StagedObjectSink::new(Arc::new(client), Some(staging.path().to_path_buf()));

        let mut reader = TruncatedBody {
            remaining: 100 * 1024,
        };
        let result = sink.store("clip.mp4", "video/mp4", &mut reader).await;

        assert!(matches!(result, Err(StorageError::BodyRead(_))));
        assert_eq!(entries(staging.path()), 0);
        assert!(memory
            .get_opts(&Path::from("clip.mp4"), GetOptions::default())
            .await
            .is_err());
    }
}
