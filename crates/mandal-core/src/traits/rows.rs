//! Relational row store trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::filter::TableFilter;
use crate::types::row::Row;

/// Generic row CRUD against the hosted relational store.
///
/// The schema is owned by the hosted service; this client only moves
/// JSON rows in and out.
#[async_trait]
pub trait RowStore: Send + Sync + std::fmt::Debug + 'static {
    /// Select rows matching the filter, honoring its ordering and limit.
    async fn select(&self, filter: &TableFilter) -> AppResult<Vec<Row>>;

    /// Insert one row and return it as stored (with server-assigned
    /// columns such as `id` and `created_at` filled in).
    async fn insert(&self, table: &str, row: Value) -> AppResult<Row>;

    /// Update rows matching the filter with the given column values.
    async fn update(&self, filter: &TableFilter, changes: Value) -> AppResult<Vec<Row>>;

    /// Delete rows matching the filter.
    async fn delete(&self, filter: &TableFilter) -> AppResult<()>;
}
