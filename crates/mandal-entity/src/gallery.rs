//! Gallery item row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mandal_core::types::filter::{OrderDirection, TableFilter};

/// Table holding gallery items.
pub const TABLE: &str = "gallery";

/// One uploaded photo, referenced by its public object URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Server-assigned row ID.
    pub id: i64,
    /// Public URL of the stored object.
    pub url: String,
    /// Object path within the bucket, kept for removal.
    pub path: String,
    /// Optional caption.
    pub caption: Option<String>,
    /// When the row was inserted.
    pub created_at: Option<DateTime<Utc>>,
}

impl GalleryItem {
    /// The gallery listing order: newest first.
    pub fn list_filter() -> TableFilter {
        TableFilter::table(TABLE).order_by("created_at", OrderDirection::Desc)
    }
}
