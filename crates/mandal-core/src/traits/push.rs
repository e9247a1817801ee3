//! Push subscription transport trait.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::result::AppResult;
use crate::types::id::SubscriptionId;
use crate::types::row::{RowEvent, RowEventKind};

/// One established push subscription: its identity plus the channel the
/// transport delivers events into.
///
/// The receiver is owned exclusively by one consumer. Releasing the
/// subscription is that consumer's responsibility, via
/// [`PushTransport::unsubscribe`].
#[derive(Debug)]
pub struct PushSubscription {
    /// Transport-assigned subscription identifier.
    pub id: SubscriptionId,
    /// Channel on which row events arrive, in delivery order.
    pub events: mpsc::Receiver<RowEvent>,
}

/// The hosted realtime service's push primitive, keyed by table name and
/// event kind.
#[async_trait]
pub trait PushTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Establish a subscription for one table and event kind.
    ///
    /// Resolves only after the service acknowledges the subscription;
    /// an error here means nothing will ever be delivered.
    async fn subscribe(
        &self,
        table: &str,
        kind: RowEventKind,
    ) -> AppResult<PushSubscription>;

    /// Release a subscription's underlying channel resource.
    ///
    /// Unknown or already-released IDs are a no-op, not an error.
    async fn unsubscribe(&self, id: SubscriptionId) -> AppResult<()>;
}
