//! Local session state: the cached identity plus in-flight status flags.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// The authenticated principal as the rest of the app sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Opaque identifier minted by the auth provider.
    pub id: UserId,
    /// Email address the identity signed up with.
    pub email: String,
}

/// In-flight status of the session and the latest operation outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// True while the initial resume or an auth operation is pending.
    pub loading: bool,
    /// User-visible error text from the last failed operation.
    pub error: Option<String>,
    /// User-visible success text from the last completed operation.
    pub success: Option<String>,
}

/// Process-wide snapshot of who is signed in and what is in flight.
///
/// Created at application start with `loading = true`, mutated only by
/// auth operations and by the provider's change-event delivery, reset to
/// empty on sign-out or expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Current identity, if any.
    pub identity: Option<UserIdentity>,
    /// Loading/error/success flags.
    pub status: SessionStatus,
}

impl Session {
    /// The state before the initial session resume has resolved.
    pub fn resuming() -> Self {
        Self {
            identity: None,
            status: SessionStatus {
                loading: true,
                error: None,
                success: None,
            },
        }
    }

    /// An empty, settled session (nobody signed in, nothing pending).
    pub fn signed_out() -> Self {
        Self {
            identity: None,
            status: SessionStatus::default(),
        }
    }

    /// Whether an identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::resuming()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_session_is_loading_and_anonymous() {
        let session = Session::default();
        assert!(session.status.loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_signed_out_is_settled() {
        let session = Session::signed_out();
        assert!(!session.status.loading);
        assert!(session.status.error.is_none());
        assert!(session.status.success.is_none());
    }
}
