//! Tubely Core Library
//!
//! This crate provides the domain model, error taxonomy, configuration and the
//! accepted asset format table shared by the storage, database and API crates.

pub mod asset;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use asset::{resolve_format, AssetFormat, AssetKind, ACCEPTED_FORMATS};
pub use config::{BaseConfig, Config, MetadataStoreBackend, UploadServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
