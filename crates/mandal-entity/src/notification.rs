//! Notification row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mandal_core::types::filter::TableFilter;

/// Table holding broadcast notifications.
pub const TABLE: &str = "notifications";

/// A community-wide notification shown as a transient toast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Server-assigned row ID.
    pub id: i64,
    /// Notification text.
    pub message: String,
    /// When the row was inserted.
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// The notification feed: whole table, arbitrary order.
    pub fn feed_filter() -> TableFilter {
        TableFilter::table(TABLE)
    }
}
