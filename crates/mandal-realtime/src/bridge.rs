//! The realtime event bridge.
//!
//! `open` seeds the consumer's feed with the rows that already exist,
//! then subscribes to insert-only push events on the same filter. The
//! two steps are not sequenced against the provider's event delivery:
//! an insert landing in the window between them can be duplicated or
//! missed. Callers needing exactness must reconcile on row IDs.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use mandal_core::AppResult;
use mandal_core::traits::{PushTransport, RowStore};
use mandal_core::types::filter::TableFilter;
use mandal_core::types::row::{Row, RowEvent, RowEventKind};

use crate::handle::{HandleState, SubscriptionHandle};

/// Bridges the hosted push feed into local state updates.
///
/// Purely additive: no screen depends on the bridge for its own
/// operation; it only appends to a local display buffer.
#[derive(Debug, Clone)]
pub struct EventBridge {
    rows: Arc<dyn RowStore>,
    transport: Arc<dyn PushTransport>,
}

impl EventBridge {
    /// A bridge over the given row store and push transport.
    pub fn new(rows: Arc<dyn RowStore>, transport: Arc<dyn PushTransport>) -> Self {
        Self { rows, transport }
    }

    /// Open a feed: seed it, then stream inserts into `sink`.
    ///
    /// Seed rows arrive first, in the filter's order; every subsequent
    /// push event whose row satisfies the filter's equality predicates
    /// is appended exactly once, in arrival order. A seed fetch failure
    /// degrades to an empty seed; a subscribe failure is logged and
    /// leaves the returned handle inert — it will never deliver events,
    /// and no distinct error state is modeled.
    pub async fn open(
        &self,
        filter: TableFilter,
        sink: mpsc::Sender<RowEvent>,
    ) -> AppResult<SubscriptionHandle> {
        let mut handle = SubscriptionHandle::new(filter.table.clone(), Arc::clone(&self.transport));
        handle.mark(HandleState::Opening);

        match self.rows.select(&filter).await {
            Ok(rows) => {
                debug!(table = %filter.table, count = rows.len(), "Seeded feed");
                for row in rows {
                    if sink.send(RowEvent::received(row)).await.is_err() {
                        // Consumer went away before the feed opened.
                        handle.mark(HandleState::Closed);
                        return Ok(handle);
                    }
                }
            }
            Err(e) => {
                warn!(table = %filter.table, error = %e, "Seed fetch failed, starting empty");
            }
        }

        match self
            .transport
            .subscribe(&filter.table, RowEventKind::Insert)
            .await
        {
            Ok(mut subscription) => {
                let id = subscription.id;
                // The transport subscribes per table; the filter's
                // predicates are applied here so the stream sees the
                // same rows the seed did.
                let eq = filter.eq.clone();
                let pump = tokio::spawn(async move {
                    while let Some(event) = subscription.events.recv().await {
                        if !satisfies(&event.payload, &eq) {
                            continue;
                        }
                        if sink.send(event).await.is_err() {
                            break;
                        }
                    }
                });
                handle.attach(id, pump);
                handle.mark(HandleState::Open);
            }
            Err(e) => {
                // Known weak point: the failure is visible only in the
                // logs, and the handle stays inert.
                warn!(table = %filter.table, error = %e, "Subscribe failed, feed is inert");
            }
        }
        Ok(handle)
    }
}

/// Whether a row meets every equality predicate of the feed's filter.
fn satisfies(row: &Row, eq: &[(String, String)]) -> bool {
    eq.iter().all(|(column, expected)| match row.0.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == *expected,
        Some(Value::Bool(b)) => b.to_string() == *expected,
        _ => false,
    })
}
