//! Database repositories for data access layer
//!
//! Each repository is responsible for one domain entity. The upload pipeline
//! only ever sees the `VideoStore` trait, never a concrete backend.
//
// Video metadata repositories (PostgreSQL and in-memory)
pub mod video;

pub use video::{create_video_store, InMemoryVideoStore, PgVideoRepository, VideoStore};
