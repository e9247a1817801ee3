//! Local display buffers fed by the bridge.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::debug;

use mandal_core::types::row::RowEvent;
use mandal_entity::Notification;

/// An append-only display buffer of decoded rows.
///
/// Rows are kept in arrival order; events whose payload does not decode
/// into `T` are dropped with a log line rather than failing the feed.
#[derive(Debug)]
pub struct FeedState<T> {
    items: Vec<T>,
}

impl<T: DeserializeOwned> FeedState<T> {
    /// An empty feed.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append one bridge event.
    pub fn apply(&mut self, event: &RowEvent) {
        match event.payload.decode::<T>() {
            Ok(item) => self.items.push(item),
            Err(e) => debug!(error = %e, "Dropping undecodable feed event"),
        }
    }

    /// The buffered items, in arrival order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: DeserializeOwned> Default for FeedState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient notification toasts with automatic dismissal.
///
/// Each notification stays visible for the retention window and is
/// dropped on the next read after it expires.
#[derive(Debug)]
pub struct ToastBuffer {
    retention: Duration,
    entries: Vec<(Notification, Instant)>,
}

impl ToastBuffer {
    /// A buffer whose toasts live for `retention`.
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            entries: Vec::new(),
        }
    }

    /// Show a notification.
    pub fn push(&mut self, notification: Notification) {
        self.entries.push((notification, Instant::now()));
    }

    /// The notifications still within their display window.
    pub fn active(&mut self) -> Vec<&Notification> {
        let retention = self.retention;
        let now = Instant::now();
        self.entries
            .retain(|(_, shown_at)| now.duration_since(*shown_at) < retention);
        self.entries.iter().map(|(n, _)| n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandal_core::types::row::Row;
    use serde_json::json;

    #[test]
    fn test_feed_appends_in_arrival_order() {
        let mut feed = FeedState::<Notification>::new();
        feed.apply(&RowEvent::received(Row::new(
            json!({"id": 1, "message": "first", "created_at": null}),
        )));
        feed.apply(&RowEvent::received(Row::new(
            json!({"id": 2, "message": "second", "created_at": null}),
        )));
        let ids: Vec<i64> = feed.items().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_feed_drops_undecodable_events() {
        let mut feed = FeedState::<Notification>::new();
        feed.apply(&RowEvent::received(Row::new(json!({"nope": true}))));
        assert!(feed.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_after_retention() {
        let mut toasts = ToastBuffer::new(Duration::from_secs(5));
        toasts.push(Notification {
            id: 1,
            message: "Aarti at 7pm".to_string(),
            created_at: None,
        });
        assert_eq!(toasts.active().len(), 1);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(toasts.active().is_empty());
    }
}
