//! Contribution row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mandal_core::types::filter::{OrderDirection, TableFilter};

/// Table holding contributions.
pub const TABLE: &str = "contributions";

/// How a contribution was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionMethod {
    /// Paid through the online payment gateway.
    Online,
    /// Handed over in person and recorded manually.
    Offline,
}

/// Lifecycle of a contribution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    /// Recorded; online payment not yet confirmed.
    Pending,
    /// Payment confirmed (or offline record accepted).
    Completed,
    /// Online payment failed or was abandoned.
    Failed,
}

/// One contribution toward the community fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Server-assigned row ID.
    pub id: i64,
    /// Display name of the contributor.
    pub contributor: String,
    /// Amount in the community's currency.
    pub amount: f64,
    /// Collection method.
    pub method: ContributionMethod,
    /// Record status.
    pub status: ContributionStatus,
    /// When the row was inserted.
    pub created_at: Option<DateTime<Utc>>,
}

impl Contribution {
    /// The contributions list order: newest first.
    pub fn list_filter() -> TableFilter {
        TableFilter::table(TABLE).order_by("created_at", OrderDirection::Desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_from_store_row() {
        let row = mandal_core::types::row::Row::new(json!({
            "id": 3,
            "contributor": "Asha",
            "amount": 501.0,
            "method": "online",
            "status": "pending",
            "created_at": null,
        }));
        let c: Contribution = row.decode().unwrap();
        assert_eq!(c.method, ContributionMethod::Online);
        assert_eq!(c.status, ContributionStatus::Pending);
    }
}
