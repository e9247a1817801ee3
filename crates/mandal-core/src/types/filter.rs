//! Row filter predicates shared by the row store and the push transport.

use serde::{Deserialize, Serialize};

/// Sort direction for an ordered select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// A filter over one table: equality predicates plus optional ordering.
///
/// The same filter value scopes both the seed fetch and the push
/// subscription of a realtime feed, so the two always agree on which
/// rows are in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    /// Table name in the relational store.
    pub table: String,
    /// Column equality predicates, applied conjunctively.
    #[serde(default)]
    pub eq: Vec<(String, String)>,
    /// Optional ordering: column and direction.
    #[serde(default)]
    pub order: Option<(String, OrderDirection)>,
    /// Optional row limit.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl TableFilter {
    /// An unfiltered view over a whole table.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            eq: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Add a column equality predicate.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.eq.push((column.into(), value.into()));
        self
    }

    /// Order results by a column.
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_predicates() {
        let filter = TableFilter::table("chats")
            .eq("sender", "uma")
            .order_by("created_at", OrderDirection::Asc)
            .limit(50);
        assert_eq!(filter.table, "chats");
        assert_eq!(filter.eq.len(), 1);
        assert_eq!(filter.order, Some(("created_at".to_string(), OrderDirection::Asc)));
        assert_eq!(filter.limit, Some(50));
    }
}
