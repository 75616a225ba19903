use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AssetKind;

/// A video metadata record.
///
/// `user_id` is the owner and never changes after creation. The two URL
/// fields stay `None` until the matching asset has been stored; a new upload
/// of the same kind replaces the previous URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Current time at the precision PostgreSQL `TIMESTAMPTZ` keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl Video {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: description.into(),
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn asset_url(&self, kind: AssetKind) -> Option<&str> {
        match kind {
            AssetKind::Thumbnail => self.thumbnail_url.as_deref(),
            AssetKind::Video => self.video_url.as_deref(),
        }
    }

    /// Point the record at a newly stored asset, replacing any previous URL.
    pub fn set_asset_url(&mut self, kind: AssetKind, url: String) {
        match kind {
            AssetKind::Thumbnail => self.thumbnail_url = Some(url),
            AssetKind::Video => self.video_url = Some(url),
        }
        self.updated_at = now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_asset_url_overwrites() {
        let owner = Uuid::new_v4();
        let mut video = Video::new(owner, "Boots", "a video about boots");
        assert!(video.is_owned_by(owner));
        assert!(!video.is_owned_by(Uuid::new_v4()));

        video.set_asset_url(AssetKind::Thumbnail, "http://localhost:8091/assets/a.png".into());
        video.set_asset_url(AssetKind::Thumbnail, "http://localhost:8091/assets/b.png".into());

        assert_eq!(
            video.asset_url(AssetKind::Thumbnail),
            Some("http://localhost:8091/assets/b.png")
        );
        assert_eq!(video.asset_url(AssetKind::Video), None);
    }

    #[test]
    fn test_serializes_missing_urls_as_null() {
        let video = Video::new(Uuid::new_v4(), "t", "d");
        let json = serde_json::to_value(&video).unwrap();
        assert!(json["thumbnail_url"].is_null());
        assert!(json["video_url"].is_null());
        assert_eq!(json["user_id"], serde_json::json!(video.user_id));
    }

    #[test]
    fn test_timestamps_keep_microsecond_precision() {
        let mut video = Video::new(Uuid::new_v4(), "t", "d");
        assert_eq!(video.created_at.timestamp_subsec_nanos() % 1_000, 0);

        video.set_asset_url(AssetKind::Video, "https://b.s3.r.amazonaws.com/k.mp4".into());
        assert_eq!(video.updated_at.timestamp_subsec_nanos() % 1_000, 0);
        assert!(video.updated_at >= video.created_at);
    }
}
