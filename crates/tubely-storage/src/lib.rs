//! Tubely Storage Library
//!
//! This crate provides the storage sinks the upload pipeline writes assets to.
//! Thumbnails go straight to the local filesystem; videos are staged to a
//! private temporary file and then transferred to an S3-compatible object
//! store.
//!
//! # Storage key format
//!
//! Keys are flat: 43 characters of URL-safe base64 (32 random bytes, no
//! padding) followed by `.` and the canonical extension, e.g.
//! `m3Y0...Q8.png`. Keys must not contain `..` or a leading `/`. Key
//! generation lives in the `keys` module so every sink gets the same shape.

mod copy;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod object;
#[cfg(feature = "storage-s3")]
pub mod staged;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_thumbnail_sink, create_video_sink};
pub use keys::generate_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalAssetSink;
#[cfg(feature = "storage-s3")]
pub use object::ObjectStoreClient;
#[cfg(feature = "storage-s3")]
pub use staged::StagedObjectSink;
pub use traits::{AssetSink, ObjectClient, StorageError, StorageResult};
