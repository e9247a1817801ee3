//! Expense row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mandal_core::types::filter::{OrderDirection, TableFilter};

/// Table holding recorded expenses.
pub const TABLE: &str = "expenses";

/// One expense paid out of the community fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Server-assigned row ID.
    pub id: i64,
    /// Amount in the community's currency.
    pub amount: f64,
    /// What the money was spent on.
    pub description: String,
    /// When the row was inserted.
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// The expense listing order: newest first.
    pub fn list_filter() -> TableFilter {
        TableFilter::table(TABLE).order_by("created_at", OrderDirection::Desc)
    }
}

/// Sum of the given expenses, as shown at the top of the listing.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_from_store_row() {
        let row = mandal_core::types::row::Row::new(json!({
            "id": 2,
            "amount": 1500.0,
            "description": "Decoration",
            "created_at": null,
        }));
        let expense: Expense = row.decode().unwrap();
        assert_eq!(expense.amount, 1500.0);
    }

    #[test]
    fn test_total_sums_amounts() {
        let expenses = vec![
            Expense {
                id: 1,
                amount: 100.0,
                description: "Flowers".to_string(),
                created_at: None,
            },
            Expense {
                id: 2,
                amount: 250.5,
                description: "Prasad".to_string(),
                created_at: None,
            },
        ];
        assert_eq!(total(&expenses), 350.5);
    }
}
