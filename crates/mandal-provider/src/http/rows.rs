//! Row store adapter for the hosted relational API.
//!
//! Filters translate to the service's query grammar: `col=eq.value`
//! predicates, `order=col.asc`, `limit=n`.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use mandal_core::traits::RowStore;
use mandal_core::types::filter::{OrderDirection, TableFilter};
use mandal_core::types::row::Row;
use mandal_core::{AppError, AppResult};

use super::client::ProviderClient;

/// [`RowStore`] implementation over the hosted relational API.
#[derive(Debug)]
pub struct HttpRowStore {
    client: ProviderClient,
}

impl HttpRowStore {
    /// Build the adapter over a shared provider client.
    pub fn new(client: ProviderClient) -> Self {
        Self { client }
    }

    fn url(&self, filter: &TableFilter, select: bool) -> String {
        let base = self.client.endpoint(&format!("rest/v1/{}", filter.table));
        let query = filter_query(filter, select);
        if query.is_empty() {
            base
        } else {
            format!("{base}?{query}")
        }
    }
}

/// Render a [`TableFilter`] as the service's query string.
fn filter_query(filter: &TableFilter, select: bool) -> String {
    let mut parts = Vec::new();
    if select {
        parts.push("select=*".to_string());
    }
    for (column, value) in &filter.eq {
        parts.push(format!("{column}=eq.{value}"));
    }
    if let Some((column, direction)) = &filter.order {
        let dir = match direction {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        };
        parts.push(format!("order={column}.{dir}"));
    }
    if let Some(limit) = filter.limit {
        parts.push(format!("limit={limit}"));
    }
    parts.join("&")
}

#[async_trait]
impl RowStore for HttpRowStore {
    async fn select(&self, filter: &TableFilter) -> AppResult<Vec<Row>> {
        let url = self.url(filter, true);
        let response = self
            .client
            .request(Method::GET, &url)
            .await
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        let response = self.client.check(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()))
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Row> {
        let url = self.client.endpoint(&format!("rest/v1/{table}"));
        let response = self
            .client
            .request(Method::POST, &url)
            .await
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        let response = self.client.check(response).await?;
        let mut rows: Vec<Row> = response
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()))?;
        rows.pop()
            .ok_or_else(|| AppError::provider("Insert returned no representation"))
    }

    async fn update(&self, filter: &TableFilter, changes: Value) -> AppResult<Vec<Row>> {
        let url = self.url(filter, false);
        let response = self
            .client
            .request(Method::PATCH, &url)
            .await
            .header("Prefer", "return=representation")
            .json(&changes)
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        let response = self.client.check(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()))
    }

    async fn delete(&self, filter: &TableFilter) -> AppResult<()> {
        let url = self.url(filter, false);
        let response = self
            .client
            .request(Method::DELETE, &url)
            .await
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        self.client.check(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_renders_predicates_order_and_limit() {
        let filter = TableFilter::table("contributions")
            .eq("status", "pending")
            .order_by("created_at", OrderDirection::Desc)
            .limit(10);
        assert_eq!(
            filter_query(&filter, true),
            "select=*&status=eq.pending&order=created_at.desc&limit=10"
        );
    }

    #[test]
    fn test_bare_filter_renders_empty_query() {
        let filter = TableFilter::table("chats");
        assert_eq!(filter_query(&filter, false), "");
    }
}
