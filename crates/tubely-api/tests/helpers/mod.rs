//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in-process: in-memory video store, temporary assets and
//! staging directories, and an in-memory object store behind the real
//! `ObjectStoreClient`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{GetOptions, ObjectStore};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::models::Video;
use tubely_core::Config;
use tubely_db::{InMemoryVideoStore, VideoStore};
use tubely_storage::{LocalAssetSink, ObjectClient, ObjectStoreClient, StagedObjectSink};
use uuid::Uuid;

pub const TEST_BUCKET: &str = "tubely-test";
pub const TEST_REGION: &str = "us-east-2";
pub const TEST_BASE_URL: &str = "http://localhost:8091";

/// Knobs for a single test app.
pub struct TestAppOptions {
    pub max_thumbnail_mb: u64,
    pub max_video_mb: u64,
    /// Replace the in-memory object store with a client that always fails.
    pub failing_object_store: bool,
    /// Wrap the video store so every update fails.
    pub failing_updates: bool,
    /// `ENVIRONMENT` value; production also pins an explicit CORS origin.
    pub environment: &'static str,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            max_thumbnail_mb: 10,
            max_video_mb: 1024,
            failing_object_store: false,
            failing_updates: false,
            environment: "development",
        }
    }
}

/// Test application: server plus the backends behind it.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoStore>,
    pub objects: Arc<InMemory>,
    pub config: Config,
    pub assets_dir: TempDir,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Create a video record owned by `owner`.
    pub async fn create_video(&self, owner: Uuid) -> Video {
        let video = Video::new(owner, "Boots", "A video about boots");
        self.videos
            .create_video(&video)
            .await
            .expect("Failed to create test video")
    }

    pub async fn load_video(&self, id: Uuid) -> Video {
        self.videos
            .get_video(id)
            .await
            .expect("Failed to load video")
            .expect("Video disappeared")
    }

    /// Files currently in the assets root.
    pub fn asset_files(&self) -> Vec<String> {
        list_dir(self.assets_dir.path())
    }

    /// Files currently in the staging directory.
    pub fn staged_files(&self) -> Vec<String> {
        list_dir(self.staging_dir.path())
    }

    /// Bytes of an object in the in-memory bucket, if present.
    pub async fn object_bytes(&self, key: &str) -> Option<Vec<u8>> {
        let result = self
            .objects
            .get_opts(&ObjectPath::from(key), GetOptions::default())
            .await
            .ok()?;
        result.bytes().await.ok().map(|b| b.to_vec())
    }

    pub fn secret(&self) -> &str {
        self.config.jwt_secret()
    }
}

fn list_dir(path: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .expect("Failed to read directory")
        .map(|entry| {
            entry
                .expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .to_string()
        })
        .collect();
    names.sort();
    names
}

pub fn create_test_config(
    assets_root: &std::path::Path,
    staging_dir: &std::path::Path,
    options: &TestAppOptions,
) -> Config {
    let assets_root = assets_root.to_string_lossy().to_string();
    let staging_dir = staging_dir.to_string_lossy().to_string();
    let max_thumbnail_mb = options.max_thumbnail_mb.to_string();
    let max_video_mb = options.max_video_mb.to_string();
    let environment = options.environment;

    Config::from_lookup(|key| {
        let value = match key {
            "JWT_SECRET" => auth::TEST_JWT_SECRET,
            "METADATA_STORE" => "memory",
            "S3_BUCKET" => TEST_BUCKET,
            "S3_REGION" => TEST_REGION,
            "PUBLIC_BASE_URL" => TEST_BASE_URL,
            "ASSETS_ROOT" => assets_root.as_str(),
            "STAGING_DIR" => staging_dir.as_str(),
            "MAX_THUMBNAIL_SIZE_MB" => max_thumbnail_mb.as_str(),
            "MAX_VIDEO_SIZE_MB" => max_video_mb.as_str(),
            "ENVIRONMENT" => environment,
            "CORS_ORIGINS" => "http://localhost:3000",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("Invalid test configuration")
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(options: TestAppOptions) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create assets directory");
    let staging_dir = tempfile::tempdir().expect("Failed to create staging directory");
    let config = create_test_config(assets_dir.path(), staging_dir.path(), &options);

    let videos = Arc::new(InMemoryVideoStore::new());
    let store: Arc<dyn VideoStore> = if options.failing_updates {
        Arc::new(storage::FailingUpdateStore::new(videos.as_ref().clone()))
    } else {
        videos.clone()
    };

    let thumbnail_sink = Arc::new(
        LocalAssetSink::new(assets_dir.path(), format!("{}/assets", TEST_BASE_URL))
            .await
            .expect("Failed to create local sink"),
    );

    let objects = Arc::new(InMemory::new());
    let object_client: Arc<dyn ObjectClient> = if options.failing_object_store {
        Arc::new(storage::FailingObjectClient)
    } else {
        Arc::new(ObjectStoreClient::new(
            objects.clone(),
            TEST_BUCKET.to_string(),
            TEST_REGION.to_string(),
            None,
        ))
    };
    let video_sink = Arc::new(StagedObjectSink::new(
        object_client,
        Some(staging_dir.path().to_path_buf()),
    ));

    let state = AppState::new(config.clone(), store, thumbnail_sink, video_sink);
    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        objects,
        config,
        assets_dir,
        staging_dir,
    }
}

/// `/api/videos/{id}/{kind}`
pub fn upload_path(video_id: impl std::fmt::Display, kind: &str) -> String {
    format!("/api/videos/{}/{}", video_id, kind)
}
