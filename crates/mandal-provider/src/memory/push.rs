//! In-memory push transport.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use mandal_core::traits::PushTransport;
use mandal_core::traits::push::PushSubscription;
use mandal_core::types::id::SubscriptionId;
use mandal_core::types::row::{Row, RowEvent, RowEventKind};
use mandal_core::{AppError, AppResult};

/// In-memory [`PushTransport`].
///
/// Tests publish rows with [`MemoryPushTransport::publish`] and can make
/// the next subscribe attempt fail to exercise the silent-failure path.
#[derive(Debug)]
pub struct MemoryPushTransport {
    buffer: usize,
    topics: DashMap<(String, RowEventKind), Vec<SubscriptionId>>,
    senders: DashMap<SubscriptionId, mpsc::Sender<RowEvent>>,
    fail_next_subscribe: AtomicBool,
}

impl MemoryPushTransport {
    /// Transport with the given per-subscription buffer size.
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer,
            topics: DashMap::new(),
            senders: DashMap::new(),
            fail_next_subscribe: AtomicBool::new(false),
        }
    }

    /// Make the next subscribe attempt fail with a subscription error.
    pub fn fail_next_subscribe(&self) {
        self.fail_next_subscribe.store(true, Ordering::SeqCst);
    }

    /// Number of currently open subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.senders.len()
    }

    /// Deliver a row to every subscription on `(table, kind)`.
    pub async fn publish(&self, table: &str, kind: RowEventKind, row: Row) {
        let ids = self
            .topics
            .get(&(table.to_string(), kind))
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        for id in ids {
            if let Some(sender) = self.senders.get(&id) {
                let _ = sender.send(RowEvent::received(row.clone())).await;
            }
        }
    }
}

impl Default for MemoryPushTransport {
    fn default() -> Self {
        Self::new(16)
    }
}

#[async_trait]
impl PushTransport for MemoryPushTransport {
    async fn subscribe(&self, table: &str, kind: RowEventKind) -> AppResult<PushSubscription> {
        if self.fail_next_subscribe.swap(false, Ordering::SeqCst) {
            return Err(AppError::subscription("Subscribe rejected by transport"));
        }
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = SubscriptionId::new();
        self.senders.insert(id, tx);
        self.topics
            .entry((table.to_string(), kind))
            .or_default()
            .push(id);
        Ok(PushSubscription { id, events: rx })
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> AppResult<()> {
        self.senders.remove(&id);
        for mut entry in self.topics.iter_mut() {
            entry.value_mut().retain(|sub| *sub != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_reaches_matching_subscription_only() {
        let transport = MemoryPushTransport::default();
        let mut sub = transport
            .subscribe("notifications", RowEventKind::Insert)
            .await
            .unwrap();
        transport
            .publish("chats", RowEventKind::Insert, Row::new(json!({"id": 1})))
            .await;
        transport
            .publish(
                "notifications",
                RowEventKind::Insert,
                Row::new(json!({"id": 2})),
            )
            .await;
        let event = sub.events.recv().await.unwrap();
        assert_eq!(event.id, Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent_and_releases() {
        let transport = MemoryPushTransport::default();
        let sub = transport
            .subscribe("chats", RowEventKind::Insert)
            .await
            .unwrap();
        assert_eq!(transport.active_subscriptions(), 1);
        transport.unsubscribe(sub.id).await.unwrap();
        transport.unsubscribe(sub.id).await.unwrap();
        assert_eq!(transport.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn test_fail_next_subscribe_fails_once() {
        let transport = MemoryPushTransport::default();
        transport.fail_next_subscribe();
        assert!(
            transport
                .subscribe("chats", RowEventKind::Insert)
                .await
                .is_err()
        );
        assert!(
            transport
                .subscribe("chats", RowEventKind::Insert)
                .await
                .is_ok()
        );
    }
}
