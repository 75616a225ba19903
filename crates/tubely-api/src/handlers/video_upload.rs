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

/// `POST /api/videos/{video_id}/video`
///
/// Multipart field `video`, `video/mp4` only. The file is staged to disk and
/// then pushed to the object store; responds with the updated video record.
pub async fn upload_video(
    VideoId(video_id): VideoId,
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    tracing::info!(video_id = %video_id, user_id = %user.user_id, "Uploading video");

    let multipart = require_multipart(multipart)?;
    let video = AssetUploadService::new(&state, AssetKind::Video)
        .upload(user.user_id, video_id, multipart)
        .await?;

    Ok(Json(video))
}
