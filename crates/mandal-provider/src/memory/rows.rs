//! In-memory row store.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use mandal_core::traits::RowStore;
use mandal_core::types::filter::{OrderDirection, TableFilter};
use mandal_core::types::row::Row;
use mandal_core::{AppError, AppResult};

/// In-memory [`RowStore`] mimicking the hosted relational API: inserts
/// get server-assigned `id` and `created_at` columns, selects honor
/// equality predicates, ordering, and limits.
#[derive(Debug)]
pub struct MemoryRowStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicI64,
}

impl MemoryRowStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seed a table with pre-existing rows, as stored.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    fn assign_server_columns(&self, row: &mut Value) {
        let Some(object) = row.as_object_mut() else {
            return;
        };
        if !object.contains_key("id") {
            object.insert(
                "id".to_string(),
                json!(self.next_id.fetch_add(1, Ordering::SeqCst)),
            );
        }
        if !object.contains_key("created_at") {
            object.insert("created_at".to_string(), json!(Utc::now().to_rfc3339()));
        }
    }
}

impl Default for MemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(row: &Value, filter: &TableFilter) -> bool {
    filter.eq.iter().all(|(column, expected)| {
        match row.get(column) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Number(n)) => n.to_string() == *expected,
            Some(Value::Bool(b)) => b.to_string() == *expected,
            _ => false,
        }
    })
}

fn compare(a: &Value, b: &Value) -> CmpOrdering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        _ => CmpOrdering::Equal,
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn select(&self, filter: &TableFilter) -> AppResult<Vec<Row>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(&filter.table)
            .map(|rows| rows.iter().filter(|r| matches(r, filter)).cloned().collect())
            .unwrap_or_default();
        if let Some((column, direction)) = &filter.order {
            rows.sort_by(|a, b| {
                let ordering = compare(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                match direction {
                    OrderDirection::Asc => ordering,
                    OrderDirection::Desc => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = filter.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows.into_iter().map(Row::new).collect())
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Row> {
        if !row.is_object() {
            return Err(AppError::provider("Insert body must be an object"));
        }
        let mut row = row;
        self.assign_server_columns(&mut row);
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(Row::new(row))
    }

    async fn update(&self, filter: &TableFilter, changes: Value) -> AppResult<Vec<Row>> {
        let Some(changes) = changes.as_object() else {
            return Err(AppError::provider("Update body must be an object"));
        };
        let mut tables = self.tables.lock().unwrap();
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(&filter.table) {
            for row in rows.iter_mut().filter(|r| matches(r, filter)) {
                if let Some(object) = row.as_object_mut() {
                    for (key, value) in changes {
                        object.insert(key.clone(), value.clone());
                    }
                }
                updated.push(Row::new(row.clone()));
            }
        }
        Ok(updated)
    }

    async fn delete(&self, filter: &TableFilter) -> AppResult<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(&filter.table) {
            rows.retain(|r| !matches(r, filter));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_id_and_created_at() {
        let store = MemoryRowStore::new();
        let row = store
            .insert("chats", json!({"sender": "uma", "message": "hi"}))
            .await
            .unwrap();
        assert_eq!(row.id(), Some("1".to_string()));
        assert!(row.0.get("created_at").is_some());
    }

    #[tokio::test]
    async fn test_select_honors_filter_order_and_limit() {
        let store = MemoryRowStore::new();
        store.seed(
            "contributions",
            vec![
                json!({"id": 1, "status": "pending", "created_at": "2026-01-01T00:00:00Z"}),
                json!({"id": 2, "status": "completed", "created_at": "2026-01-03T00:00:00Z"}),
                json!({"id": 3, "status": "pending", "created_at": "2026-01-02T00:00:00Z"}),
            ],
        );
        let filter = TableFilter::table("contributions")
            .eq("status", "pending")
            .order_by("created_at", OrderDirection::Desc)
            .limit(1);
        let rows = store.select(&filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id(), Some("3".to_string()));
    }

    #[tokio::test]
    async fn test_update_and_delete_respect_filter() {
        let store = MemoryRowStore::new();
        store.seed(
            "contributions",
            vec![
                json!({"id": 1, "status": "pending"}),
                json!({"id": 2, "status": "pending"}),
            ],
        );
        let one = TableFilter::table("contributions").eq("id", "1");
        let updated = store
            .update(&one, json!({"status": "completed"}))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);

        store.delete(&one).await.unwrap();
        let remaining = store
            .select(&TableFilter::table("contributions"))
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), Some("2".to_string()));
    }
}
