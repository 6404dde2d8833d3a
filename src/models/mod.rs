//! Catalog data model
//!
//! [`ImageRecord`] and [`CacheEntry`] are persisted in the scan cache and
//! keep the field names of the on-disk format. [`Category`] and
//! [`CatalogPage`] are derived per request and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Content fingerprint, the identity of the image
    #[serde(rename = "id")]
    pub fingerprint: String,
    /// `/`-separated path relative to the catalog root
    #[serde(rename = "path")]
    pub relative_path: String,
    pub url: String,
    pub thumbnail: String,
    pub tag: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "uploaded_at")]
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    pub fn image_url(relative_path: &str) -> String {
        format!("/images/{relative_path}")
    }

    pub fn thumbnail_url(fingerprint: &str) -> String {
        format!("/thumbnails/{fingerprint}.jpg")
    }
}

/// Scan cache entry keyed by relative path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Modification time observed when the record was computed
    #[serde(rename = "mtime")]
    pub modified_at: DateTime<Utc>,
    #[serde(rename = "data")]
    pub record: ImageRecord,
}

impl CacheEntry {
    /// An entry is trusted only while the file's mtime is unchanged
    pub fn is_fresh(&self, modified_at: &DateTime<Utc>) -> bool {
        self.modified_at == *modified_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Shared first segment of composite tags
    Folder,
    /// Single-segment tag
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub count: usize,
}

/// One page of the filtered catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<ImageRecord>,
    pub total: usize,
    pub has_more: bool,
}
