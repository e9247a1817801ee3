//! Chat service: history plus sending.
//!
//! New messages reach other members through the realtime bridge, so
//! sending does not re-fetch history.

use std::sync::Arc;

use serde_json::json;

use mandal_core::traits::RowStore;
use mandal_core::{AppError, AppResult};
use mandal_entity::{ChatMessage, chat};

/// Community chat over the hosted row store.
#[derive(Debug, Clone)]
pub struct ChatService {
    rows: Arc<dyn RowStore>,
}

impl ChatService {
    /// A chat service over the given row store.
    pub fn new(rows: Arc<dyn RowStore>) -> Self {
        Self { rows }
    }

    /// Full message history, creation time ascending.
    pub async fn history(&self) -> AppResult<Vec<ChatMessage>> {
        let rows = self.rows.select(&ChatMessage::feed_filter()).await?;
        rows.iter().map(|row| row.decode()).collect()
    }

    /// Send one message.
    ///
    /// Blank messages are rejected locally and never reach the store.
    pub async fn send(&self, sender: &str, message: &str) -> AppResult<ChatMessage> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::validation("Message must not be empty"));
        }
        let sender = if sender.trim().is_empty() {
            "Anonymous"
        } else {
            sender.trim()
        };
        let row = self
            .rows
            .insert(chat::TABLE, json!({ "sender": sender, "message": message }))
            .await?;
        row.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandal_provider::memory::MemoryRowStore;

    fn service() -> (Arc<MemoryRowStore>, ChatService) {
        let rows = Arc::new(MemoryRowStore::new());
        let service = ChatService::new(Arc::clone(&rows) as Arc<dyn RowStore>);
        (rows, service)
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_locally() {
        let (_, service) = service();
        let err = service.send("uma", "   ").await.unwrap_err();
        assert_eq!(err.kind, mandal_core::ErrorKind::Validation);
        assert!(service.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_fallback_for_missing_sender() {
        let (_, service) = service();
        let sent = service.send("", "namaste").await.unwrap();
        assert_eq!(sent.sender, "Anonymous");
    }

    #[tokio::test]
    async fn test_history_comes_back_oldest_first() {
        let (_, service) = service();
        service.send("a", "one").await.unwrap();
        service.send("b", "two").await.unwrap();
        let history = service.history().await.unwrap();
        let texts: Vec<&str> = history.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }
}
