//! Subscription handle: one owned realtime feed resource.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use mandal_core::traits::PushTransport;
use mandal_core::types::id::SubscriptionId;

/// Lifecycle of a subscription handle.
///
/// `Closed` is terminal. There is no error state: a handle whose
/// subscribe attempt failed stays in `Opening` and never delivers
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandleState {
    /// Created, nothing attempted yet.
    Unopened = 0,
    /// Seed fetch done, waiting on (or denied) the subscribe ack.
    Opening = 1,
    /// Subscribe acknowledged; events flow.
    Open = 2,
    /// Released. Terminal.
    Closed = 3,
}

impl HandleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Unopened,
            1 => Self::Opening,
            2 => Self::Open,
            _ => Self::Closed,
        }
    }
}

/// An owned resource representing one open subscription.
///
/// Each handle owns exactly one transport channel, never shared across
/// consumers. Releasing it is the consumer's responsibility via
/// [`SubscriptionHandle::close`]; dropping the handle also releases it
/// so a skipped teardown cannot leak the underlying connection forever.
#[derive(Debug)]
pub struct SubscriptionHandle {
    table: String,
    state: AtomicU8,
    transport: Arc<dyn PushTransport>,
    /// `None` for an inert handle whose subscribe attempt failed.
    subscription: Option<SubscriptionId>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl SubscriptionHandle {
    pub(crate) fn new(table: String, transport: Arc<dyn PushTransport>) -> Self {
        Self {
            table,
            state: AtomicU8::new(HandleState::Unopened as u8),
            transport,
            subscription: None,
            pump: Mutex::new(None),
        }
    }

    pub(crate) fn mark(&self, state: HandleState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub(crate) fn attach(&mut self, subscription: SubscriptionId, pump: JoinHandle<()>) {
        self.subscription = Some(subscription);
        *self.pump.get_mut() = Some(pump);
    }

    /// The table this handle's feed is scoped to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HandleState {
        HandleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Release the underlying channel resource.
    ///
    /// Idempotent: closing an already-closed handle is a no-op, not an
    /// error. The transport release happens exactly once.
    pub async fn close(&self) {
        let previous = self
            .state
            .swap(HandleState::Closed as u8, Ordering::SeqCst);
        if previous == HandleState::Closed as u8 {
            return;
        }
        if let Some(pump) = self.pump.lock().await.take() {
            pump.abort();
        }
        if let Some(id) = self.subscription {
            let _ = self.transport.unsubscribe(id).await;
        }
        debug!(table = %self.table, "Subscription handle closed");
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        let previous = self
            .state
            .swap(HandleState::Closed as u8, Ordering::SeqCst);
        if previous == HandleState::Closed as u8 {
            return;
        }
        if let Some(pump) = self.pump.get_mut().take() {
            pump.abort();
        }
        if let Some(id) = self.subscription {
            let transport = Arc::clone(&self.transport);
            // Best-effort release when teardown was skipped; outside a
            // runtime the leak is accepted as defined behavior.
            if let Ok(rt) = tokio::runtime::Handle::try_current() {
                rt.spawn(async move {
                    let _ = transport.unsubscribe(id).await;
                });
            }
        }
    }
}
