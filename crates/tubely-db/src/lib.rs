//! Tubely metadata store
//!
//! Video records live behind the `VideoStore` trait. PostgreSQL is the
//! production backend; the in-memory store serves tests and local runs without
//! a database.

pub mod db;

pub use db::{create_video_store, InMemoryVideoStore, PgVideoRepository, VideoStore};
