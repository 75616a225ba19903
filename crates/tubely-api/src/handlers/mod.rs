pub mod health;
pub mod thumbnail_upload;
pub mod video_upload;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{FromRequestParts, Multipart, Path};
use axum::http::request::Parts;
use tubely_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;

/// `{video_id}` path segment parsed as a UUID. Runs first so a malformed id is
/// reported before anything else is looked at.
#[derive(Debug, Clone, Copy)]
pub struct VideoId(pub Uuid);

impl<S> FromRequestParts<S> for VideoId
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid ID: {}", e.body_text())))?;
        let id = Uuid::parse_str(&raw).map_err(AppError::from)?;
        Ok(VideoId(id))
    }
}

/// Turn a rejected multipart extractor (wrong content type, missing boundary)
/// into the usual JSON error.
pub(crate) fn require_multipart(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, HttpAppError> {
    multipart.map_err(|e| {
        HttpAppError(AppError::BadRequest(format!(
            "Expected a multipart/form-data body: {}",
            e.body_text()
        )))
    })
}
