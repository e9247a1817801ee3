//! Community event row model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mandal_core::types::filter::{OrderDirection, TableFilter};

/// Table holding community events.
pub const TABLE: &str = "events";

/// One scheduled community event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Server-assigned row ID.
    pub id: i64,
    /// Event title.
    pub title: String,
    /// Calendar date the event takes place.
    pub date: Option<NaiveDate>,
    /// Optional free-form description.
    pub description: Option<String>,
    /// When the row was inserted.
    pub created_at: Option<DateTime<Utc>>,
}

impl Event {
    /// The event listing order: soonest date first.
    pub fn list_filter() -> TableFilter {
        TableFilter::table(TABLE).order_by("date", OrderDirection::Asc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_from_store_row() {
        let row = mandal_core::types::row::Row::new(json!({
            "id": 4,
            "title": "Ganesh Visarjan",
            "date": "2026-09-06",
            "description": null,
            "created_at": null,
        }));
        let event: Event = row.decode().unwrap();
        assert_eq!(event.title, "Ganesh Visarjan");
        assert_eq!(
            event.date,
            Some(NaiveDate::from_ymd_opt(2026, 9, 6).unwrap())
        );
    }
}
