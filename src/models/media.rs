use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Derives the type from a MIME string. Only `image/*` and `video/*` qualify.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(Self::Image)
        } else if mime.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `media` table. `id` and `created_at` come from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub cloudinary_url: String,
    pub cloudinary_public_id: String,
    pub created_at: String,
}

impl MediaRecord {
    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }
}

/// Insert payload. Carries no server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMedia {
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub cloudinary_url: String,
    pub cloudinary_public_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaPage {
    pub rows: Vec<MediaRecord>,
    pub total_count: u64,
}

/// A file picked by the visitor, held until submission.
#[derive(Clone, PartialEq)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::from_mime(&self.mime_type)
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

/// What the media host hands back after a successful upload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedAsset {
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
}
