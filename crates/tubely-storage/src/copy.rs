use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::traits::{StorageError, StorageResult};

pub(crate) const CHUNK_SIZE: usize = 64 * 1024;

/// Copy an upload body into `writer`, keeping read and write failures apart.
///
/// Returns the number of bytes written.
pub(crate) async fn copy_body<W>(
    reader: &mut (dyn AsyncRead + Send + Unpin),
    writer: &mut W,
    destination: &str,
) -> StorageResult<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(|e| StorageError::BodyRead(e.to_string()))?;
        if n == 0 {
            break;
        }

        writer.write_all(&buf[..n]).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write {}: {}", destination, e))
        })?;
        total += n as u64;
    }

    writer.flush().await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to flush {}: {}", destination, e))
    })?;

    Ok(total)
}
