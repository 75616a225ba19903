//! Storage key generation.
//!
//! Key format: `{base64url(32 random bytes)}.{extension}` with no padding, so
//! the random part is always 43 characters.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::traits::{StorageError, StorageResult};

pub const KEY_RANDOM_BYTES: usize = 32;
pub const KEY_ENCODED_LEN: usize = 43;

/// Generate a fresh storage key with the given extension.
///
/// Entropy comes from the operating system. A failing random source is
/// reported, never retried.
pub fn generate_storage_key(extension: &str) -> StorageResult<String> {
    let mut bytes = [0u8; KEY_RANDOM_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| StorageError::KeyGeneration(e.to_string()))?;
    Ok(encode_storage_key(&bytes, extension))
}

/// Encode raw key bytes and append the extension.
pub fn encode_storage_key(bytes: &[u8; KEY_RANDOM_BYTES], extension: &str) -> String {
    format!("{}.{}", URL_SAFE_NO_PAD.encode(bytes), extension)
}

/// Keys are used as file names and object paths; refuse anything that could
/// escape the storage root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
