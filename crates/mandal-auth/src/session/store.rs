//! The process-wide session store.
//!
//! One instance exists per application, created at startup and injected
//! into consumers. It is mutated only by auth operations and by the
//! provider's change-event stream; readers get snapshots or a watch
//! receiver and never mutate. Racing operations resolve last-write-wins;
//! there is no operation-level locking.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use mandal_core::traits::AuthApi;
use mandal_core::types::auth::{AuthEvent, AuthEventKind, ProviderSession};
use mandal_core::types::session::{Session, UserIdentity};

/// Holds the last-known [`Session`] and fans out every transition.
#[derive(Debug)]
pub struct SessionStore {
    auth: Arc<dyn AuthApi>,
    state: watch::Sender<Session>,
    /// Single-flight guard for the initial resume call.
    resume_once: OnceCell<()>,
}

impl SessionStore {
    /// A store in the pre-resume state: loading, nobody signed in.
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        let (state, _) = watch::channel(Session::resuming());
        Self {
            auth,
            state,
            resume_once: OnceCell::new(),
        }
    }

    /// Synchronous snapshot of the last-known session.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Watch every identity or status transition, in emission order.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Resolve the initial session against the auth provider.
    ///
    /// Exactly one provider call is issued no matter how many callers
    /// arrive concurrently; all of them observe the same pending state
    /// until it resolves. Resume failure settles the store with the
    /// provider's message, not a panic.
    pub async fn resume(&self) {
        self.resume_once
            .get_or_init(|| async {
                match self.auth.resume_session().await {
                    Ok(Some(session)) => {
                        debug!(user = %session.user.email, "Session resumed");
                        self.apply_session(&session);
                    }
                    Ok(None) => {
                        debug!("No session to resume");
                        self.set_identity(None);
                    }
                    Err(e) => {
                        warn!(error = %e, "Session resume failed");
                        self.fail(e.message.clone());
                    }
                }
            })
            .await;
    }

    /// Apply one provider change event.
    ///
    /// Events arrive in provider emission order and are applied as-is.
    pub fn apply_event(&self, event: &AuthEvent) {
        match (event.kind, &event.session) {
            (AuthEventKind::SignedOut, _) => self.set_identity(None),
            (_, Some(session)) => self.apply_session(session),
            // A signed-in event without a session payload carries no
            // identity to adopt; treat it as a sign-out.
            (_, None) => self.set_identity(None),
        }
    }

    /// Drive the store from the provider's change-event stream until the
    /// stream closes. Spawn once at application start.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut events = store.auth.auth_events();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => store.apply_event(&event),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Auth event stream lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Adopt a resolved provider session as the current identity.
    pub(crate) fn apply_session(&self, session: &ProviderSession) {
        self.set_identity(Some(session.user.to_identity()));
    }

    /// Set or clear the identity and settle the loading flag.
    pub(crate) fn set_identity(&self, identity: Option<UserIdentity>) {
        self.state.send_modify(|session| {
            session.identity = identity;
            session.status.loading = false;
        });
    }

    /// Mark an operation as started: loading on, prior messages cleared.
    pub(crate) fn begin_operation(&self) {
        self.state.send_modify(|session| {
            session.status.loading = true;
            session.status.error = None;
            session.status.success = None;
        });
    }

    /// Clear both status messages without touching anything else.
    pub(crate) fn clear_messages(&self) {
        self.state.send_modify(|session| {
            session.status.error = None;
            session.status.success = None;
        });
    }

    /// Settle with a user-visible error message.
    pub(crate) fn fail(&self, message: impl Into<String>) {
        self.state.send_modify(|session| {
            session.status.loading = false;
            session.status.error = Some(message.into());
        });
    }

    /// Settle with a user-visible success message.
    pub(crate) fn succeed(&self, message: impl Into<String>) {
        self.state.send_modify(|session| {
            session.status.loading = false;
            session.status.success = Some(message.into());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandal_provider::memory::MemoryAuthApi;

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let auth = Arc::new(MemoryAuthApi::new());
        let store = SessionStore::new(auth);
        let session = store.current();
        assert!(session.status.loading);
        assert!(session.identity.is_none());
    }

    #[tokio::test]
    async fn test_resume_with_no_session_settles_anonymous() {
        let auth = Arc::new(MemoryAuthApi::new());
        let store = SessionStore::new(auth);
        store.resume().await;
        let session = store.current();
        assert!(!session.status.loading);
        assert!(session.identity.is_none());
    }

    #[tokio::test]
    async fn test_resume_adopts_seeded_session() {
        let auth = Arc::new(MemoryAuthApi::new());
        auth.register_verified("uma@mandal.org", "pw");
        auth.seed_session("uma@mandal.org");
        let store = SessionStore::new(auth);
        store.resume().await;
        let session = store.current();
        assert_eq!(
            session.identity.map(|i| i.email),
            Some("uma@mandal.org".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_resume_issues_one_provider_call() {
        let auth = Arc::new(MemoryAuthApi::new());
        auth.set_resume_delay(std::time::Duration::from_millis(50));
        let store = Arc::new(SessionStore::new(Arc::clone(&auth) as Arc<dyn AuthApi>));

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move { store.resume().await }));
        }
        // All callers observe the same pending state while in flight.
        tokio::task::yield_now().await;
        assert!(store.current().status.loading);

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(auth.resume_calls(), 1);
        assert!(!store.current().status.loading);
    }

    #[tokio::test]
    async fn test_signed_out_event_clears_identity() {
        let auth = Arc::new(MemoryAuthApi::new());
        auth.register_verified("uma@mandal.org", "pw");
        auth.seed_session("uma@mandal.org");
        let store = SessionStore::new(Arc::clone(&auth) as Arc<dyn AuthApi>);
        store.resume().await;
        assert!(store.current().is_authenticated());

        store.apply_event(&AuthEvent {
            kind: AuthEventKind::SignedOut,
            session: None,
        });
        assert!(!store.current().is_authenticated());
    }
}
