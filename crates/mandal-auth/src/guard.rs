//! Route guard: gates protected screens on the session state.
//!
//! The loading flag exists specifically so that protected content never
//! flashes before the initial session resume completes.

use std::sync::Arc;

use mandal_core::types::session::Session;

use crate::session::SessionStore;

/// What a screen should render given the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the protected content.
    Allow,
    /// Session resume is still pending: render a neutral placeholder,
    /// never the protected content and never a premature redirect.
    Placeholder,
    /// Loading finished with no identity: go to the sign-in entry point.
    RedirectToSignIn,
}

/// Decide what to render for a protected route.
pub fn evaluate(session: &Session) -> RouteDecision {
    if session.status.loading {
        RouteDecision::Placeholder
    } else if session.is_authenticated() {
        RouteDecision::Allow
    } else {
        RouteDecision::RedirectToSignIn
    }
}

/// Guard bound to the application's session store.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Arc<SessionStore>,
}

impl RouteGuard {
    /// Guard reading from the given store.
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Decision for the store's current session.
    pub fn check(&self) -> RouteDecision {
        evaluate(&self.store.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandal_core::types::id::UserId;
    use mandal_core::types::session::{SessionStatus, UserIdentity};

    fn session(loading: bool, signed_in: bool) -> Session {
        Session {
            identity: signed_in.then(|| UserIdentity {
                id: UserId::new(),
                email: "uma@mandal.org".to_string(),
            }),
            status: SessionStatus {
                loading,
                error: None,
                success: None,
            },
        }
    }

    #[test]
    fn test_loading_always_renders_placeholder() {
        // Even with an identity present, loading wins: no flash.
        assert_eq!(evaluate(&session(true, false)), RouteDecision::Placeholder);
        assert_eq!(evaluate(&session(true, true)), RouteDecision::Placeholder);
    }

    #[test]
    fn test_settled_without_identity_redirects() {
        assert_eq!(
            evaluate(&session(false, false)),
            RouteDecision::RedirectToSignIn
        );
    }

    #[test]
    fn test_settled_with_identity_allows() {
        assert_eq!(evaluate(&session(false, true)), RouteDecision::Allow);
    }
}
