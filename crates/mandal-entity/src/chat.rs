//! Chat message row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mandal_core::types::filter::{OrderDirection, TableFilter};

/// Table holding chat messages.
pub const TABLE: &str = "chats";

/// One message in the community chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned row ID.
    pub id: i64,
    /// Display name of the sender.
    pub sender: String,
    /// Message text.
    pub message: String,
    /// When the row was inserted.
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// The chat feed's natural order: creation time ascending.
    pub fn feed_filter() -> TableFilter {
        TableFilter::table(TABLE).order_by("created_at", OrderDirection::Asc)
    }
}
