use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::{require_multipart, VideoId};
use crate::services::upload::AssetUploadService;
use crate::state::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;
use tubely_core::models::Video;
use tubely_core::AssetKind;

/// `POST /api/videos/{video_id}/thumbnail`
///
/// Multipart field `thumbnail`, `image/png` or `image/jpeg`. Responds with the
/// updated video record.
pub async fn upload_thumbnail(
    VideoId(video_id): VideoId,
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    tracing::info!(video_id = %video_id, user_id = %user.user_id, "Uploading thumbnail");

    let multipart = require_multipart(multipart)?;
    let video = AssetUploadService::new(&state, AssetKind::Thumbnail)
        .upload(user.user_id, video_id, multipart)
        .await?;

    Ok(Json(video))
}
