//! Multipart decoding for asset uploads.
//!
//! The decoder never buffers a part. It hands back a reader over the file
//! part that fails once the part grows past the size ceiling, so an oversized
//! upload is cut off while it streams.

use std::io;

use axum::extract::multipart::{Field, MultipartError};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tubely_core::{AppError, AssetKind};

pub struct UploadDecoder {
    field_name: &'static str,
    max_bytes: u64,
}

impl UploadDecoder {
    pub fn new(kind: AssetKind, max_bytes: u64) -> Self {
        Self {
            field_name: kind.field_name(),
            max_bytes,
        }
    }

    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// Whether this part carries the file we are looking for.
    pub fn matches(&self, field: &Field<'_>) -> bool {
        field.name() == Some(self.field_name)
    }

    /// Declared content type of the part; empty when the part has none.
    pub fn content_type(&self, field: &Field<'_>) -> String {
        field.content_type().unwrap_or_default().to_string()
    }

    /// Byte reader over the part that errors once `max_bytes` is exceeded.
    pub fn reader<'a>(&self, field: Field<'a>) -> impl AsyncRead + Send + Unpin + 'a {
        StreamReader::new(Box::pin(limit_stream(field, self.max_bytes)))
    }

    pub fn missing_field(&self) -> AppError {
        AppError::BadRequest(format!(
            "Missing multipart field '{}'",
            self.field_name
        ))
    }
}

fn limit_stream<'a, S>(
    stream: S,
    max_bytes: u64,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'a
where
    S: Stream<Item = Result<Bytes, MultipartError>> + Send + 'a,
{
    let mut seen: u64 = 0;
    stream.map(move |chunk| {
        let chunk = chunk.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.body_text()))?;
        seen += chunk.len() as u64;
        if seen > max_bytes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Upload exceeds the maximum size of {} bytes", max_bytes),
            ));
        }
        Ok(chunk)
    })
}

/// Map a multipart parse failure (malformed body, body limit hit) to a client error.
pub fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Failed to parse multipart body: {}", err.body_text()))
}
