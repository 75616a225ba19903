use crate::copy::CHUNK_SIZE;
use crate::keys::validate_key;
use crate::traits::{ObjectClient, StorageError, StorageResult};
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

/// Multipart part size for staged uploads.
pub const DEFAULT_PART_SIZE: usize = 8 * 1024 * 1024;

/// `ObjectClient` backed by an `object_store` store.
///
/// Production uses `AmazonS3`; tests hand in `object_store::memory::InMemory`.
#[derive(Clone)]
pub struct ObjectStoreClient {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    part_size: usize,
}

impl ObjectStoreClient {
    /// Wrap an existing store. URLs are still derived from bucket and region.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> Self {
        ObjectStoreClient {
            store,
            bucket,
            region,
            endpoint_url,
            part_size: DEFAULT_PART_SIZE,
        }
    }

    /// Override the multipart part size (S3 needs at least 5 MiB per part).
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size.max(1);
        self
    }

    /// Build an S3 client. Credentials come from the usual `AWS_*` environment
    /// variables.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint (e.g., "http://localhost:9000" for MinIO)
    pub fn s3(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::new(Arc::new(store), bucket, region, endpoint_url))
    }

    pub fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }

    /// Stream `reader` into `writer` and complete the upload only if exactly
    /// `content_length` bytes were read.
    async fn transfer(
        &self,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        writer: &mut BufWriter,
        content_length: u64,
    ) -> StorageResult<()> {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut read_total: u64 = 0;
        loop {
            let n = reader.read(&mut buf).await.map_err(|e| {
                StorageError::UploadFailed(format!("Failed to read staged file: {}", e))
            })?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .await
                .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
            read_total += n as u64;
        }

        if read_total != content_length {
            return Err(StorageError::UploadFailed(format!(
                "Staged file size changed: expected {} bytes, read {}",
                content_length, read_total
            )));
        }

        writer
            .shutdown()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))
    }
}

#[async_trait]
impl ObjectClient for ObjectStoreClient {
    async fn put(
        &self,
        key: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
        content_length: u64,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_key(key)?;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // Small objects go up in a single put on shutdown; anything larger than
        // one part becomes a multipart upload, one part in flight at a time.
        let mut writer = BufWriter::with_capacity(self.store(), Path::from(key), self.part_size)
            .with_max_concurrency(1)
            .with_attributes(attributes);

        if let Err(e) = self.transfer(reader, &mut writer, content_length).await {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(error = %abort_err, key = %key, "Failed to abort object upload");
            }
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = content_length,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object upload failed"
            );
            return Err(e);
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(())
    }

    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}` for AWS, or path-style
    /// `{endpoint}/{bucket}/{key}` for S3-compatible providers.
    fn object_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}
