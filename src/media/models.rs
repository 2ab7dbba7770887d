use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

/// A media metadata document in the `media` collection.
///
/// `id` is the document id, not a stored field; the service fills it in
/// after reads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub size: u64,
    pub uploaded_at: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub uploaded_by: String,
    pub is_active: bool,
}

/// Input for creating a media document; the service assigns id, upload time
/// and the active flag.
#[derive(Debug, Clone)]
pub struct NewMediaFile {
    pub name: String,
    pub kind: MediaKind,
    pub url: String,
    pub size: u64,
    pub category: String,
    pub tags: Vec<String>,
    pub uploaded_by: String,
}

/// Partial media edit; only set fields are written.
#[derive(Debug, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MediaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl MediaUpdate {
    pub(crate) fn field_mask(&self) -> Vec<&'static str> {
        let mut mask = Vec::new();
        if self.name.is_some() {
            mask.push("name");
        }
        if self.url.is_some() {
            mask.push("url");
        }
        if self.category.is_some() {
            mask.push("category");
        }
        if self.tags.is_some() {
            mask.push("tags");
        }
        mask
    }
}

/// Optional constraints for listing media.
#[derive(Debug, Default, Clone)]
pub struct MediaFilter {
    pub kind: Option<MediaKind>,
    pub category: Option<String>,
    pub include_inactive: bool,
}

/// Aggregate counts over a fetched media set.
///
/// `images + videos + audio == total_files` holds for any input because
/// every file lands in exactly one kind bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaStats {
    pub total_files: usize,
    pub images: usize,
    pub videos: usize,
    pub audio: usize,
    pub total_size: u64,
}
