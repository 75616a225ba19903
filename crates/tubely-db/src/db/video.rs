use std::collections::HashMap;
use std::sync::Arc;

use sqlx::{PgPool, Postgres};
use tokio::sync::RwLock;
use tubely_core::models::Video;
use tubely_core::{AppError, Config, MetadataStoreBackend};
use uuid::Uuid;

/// Trait for video metadata operations
/// This abstracts the database implementation (PostgreSQL or in-memory)
#[async_trait::async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a new record.
    async fn create_video(&self, video: &Video) -> Result<Video, AppError>;

    /// Fetch a record by id. `Ok(None)` when it does not exist.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Overwrite the mutable fields of an existing record, `updated_at`
    /// included, so the stored row matches the caller's copy.
    ///
    /// Fails with `NotFound` if the record has disappeared.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VideoStore for PgVideoRepository {
    #[tracing::instrument(skip(self, video), fields(
        db.system = "postgresql",
        db.table = "videos",
        db.operation = "insert",
        db.record_id = %video.id
    ))]
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let created = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            "#,
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "videos",
        db.operation = "select",
        db.record_id = %id
    ))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            "SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    // user_id is never written here: ownership is fixed at creation.
    #[tracing::instrument(skip(self, video), fields(
        db.system = "postgresql",
        db.table = "videos",
        db.operation = "update",
        db.record_id = %video.id
    ))]
    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2, description = $3, thumbnail_url = $4, video_url = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }

        Ok(())
    }
}

/// Process-local store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryVideoStore {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::BadRequest(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))?;

        let user_id = stored.user_id;
        *stored = video.clone();
        stored.user_id = user_id;
        Ok(())
    }
}

/// Factory function to create the configured video store
///
/// `pool` is required for the PostgreSQL backend and ignored otherwise.
pub fn create_video_store(
    config: &Config,
    pool: Option<PgPool>,
) -> Result<Arc<dyn VideoStore>, AppError> {
    match config.metadata_store() {
        MetadataStoreBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                AppError::Internal("PostgreSQL metadata store requires a connection pool".to_string())
            })?;
            tracing::info!("Initializing PostgreSQL video repository");
            Ok(Arc::new(PgVideoRepository::new(pool)))
        }
        MetadataStoreBackend::Memory => {
            tracing::warn!("Using in-memory video store; records are lost on restart");
            Ok(Arc::new(InMemoryVideoStore::new()))
        }
    }
}
