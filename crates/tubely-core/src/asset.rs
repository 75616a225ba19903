//! Accepted asset formats.
//!
//! `ACCEPTED_FORMATS` is the only place that decides which MIME types may be
//! uploaded, which asset kind they belong to and which extension the stored
//! file gets. Accepting a new format means adding a row here.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::AppError;

/// The two kinds of asset a video record can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Thumbnail,
    Video,
}

impl AssetKind {
    /// Multipart field name carrying the file for this kind.
    pub fn field_name(&self) -> &'static str {
        match self {
            AssetKind::Thumbnail => "thumbnail",
            AssetKind::Video => "video",
        }
    }
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.field_name())
    }
}

/// One row of the accepted-format table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetFormat {
    pub mime_type: &'static str,
    pub kind: AssetKind,
    pub extension: &'static str,
}

pub const ACCEPTED_FORMATS: &[AssetFormat] = &[
    AssetFormat {
        mime_type: "image/png",
        kind: AssetKind::Thumbnail,
        extension: "png",
    },
    AssetFormat {
        mime_type: "image/jpeg",
        kind: AssetKind::Thumbnail,
        extension: "jpg",
    },
    AssetFormat {
        mime_type: "video/mp4",
        kind: AssetKind::Video,
        extension: "mp4",
    },
];

/// RFC 7230 `tchar`.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// Parse a Content-Type value down to its lower-cased `type/subtype`.
///
/// Parameters such as `charset` are discarded. Returns `None` when the value is
/// not a syntactically valid media type.
pub fn parse_media_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let (top, sub) = essence.split_once('/')?;
    if top.is_empty() || sub.is_empty() {
        return None;
    }
    if !top.chars().all(is_token_char) || !sub.chars().all(is_token_char) {
        return None;
    }
    Some(essence.to_ascii_lowercase())
}

/// Resolve a declared Content-Type to an accepted format of the expected kind.
pub fn resolve_format(
    content_type: &str,
    expected: AssetKind,
) -> Result<&'static AssetFormat, AppError> {
    let media_type = parse_media_type(content_type)
        .ok_or_else(|| AppError::BadRequest("Invalid Content Type".to_string()))?;

    ACCEPTED_FORMATS
        .iter()
        .find(|format| format.kind == expected && format.mime_type == media_type)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported media type '{}' for {} upload",
                media_type, expected
            ))
        })
}
