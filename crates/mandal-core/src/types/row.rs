//! Untyped rows and the push events that carry them.
//!
//! The relational store returns JSON rows; entity crates decode them
//! into typed structs with [`Row::decode`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::result::AppResult;

/// One untyped row from the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Value);

impl Row {
    /// Wrap a JSON value as a row.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Decode the row into a typed struct.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(self.0.clone()).map_err(AppError::from)
    }

    /// The row's `id` column rendered as a string, if present.
    ///
    /// Sequence IDs and UUIDs both flatten to strings here so that
    /// display buffers can key rows without knowing the table schema.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for Row {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Which kind of row change a push subscription observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowEventKind {
    /// A new row was inserted.
    Insert,
    /// An existing row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

/// One push event delivered by a realtime subscription.
///
/// Events carry arrival order only; there is no global total order
/// across subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowEvent {
    /// The changed row's `id` column, stringified when present.
    pub id: Option<String>,
    /// The changed row.
    pub payload: Row,
    /// When this client received the event.
    pub received_at: DateTime<Utc>,
}

impl RowEvent {
    /// Build an event for a row received now.
    pub fn received(payload: Row) -> Self {
        Self {
            id: payload.id(),
            payload,
            received_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_stringify() {
        assert_eq!(Row::new(json!({"id": 7})).id(), Some("7".to_string()));
        assert_eq!(
            Row::new(json!({"id": "abc"})).id(),
            Some("abc".to_string())
        );
        assert_eq!(Row::new(json!({"other": 1})).id(), None);
    }

    #[test]
    fn test_decode_into_typed_struct() {
        #[derive(Deserialize)]
        struct Msg {
            sender: String,
        }
        let row = Row::new(json!({"id": 1, "sender": "uma"}));
        let msg: Msg = row.decode().unwrap();
        assert_eq!(msg.sender, "uma");
    }
}
