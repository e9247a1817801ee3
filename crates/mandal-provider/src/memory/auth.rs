//! In-memory auth provider.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use mandal_core::traits::AuthApi;
use mandal_core::types::auth::{
    AuthEvent, AuthEventKind, AuthUser, FederatedOptions, IdentityLink, ProviderSession,
    SignUpOutcome,
};
use mandal_core::types::id::UserId;
use mandal_core::{AppError, AppResult};

const EVENT_BUFFER: usize = 16;

#[derive(Debug, Clone)]
struct RegisteredUser {
    password: String,
    verified: bool,
    user: AuthUser,
}

/// In-memory [`AuthApi`] with the hosted service's observable behavior:
/// verbatim error strings, the empty-identity-links signal on duplicate
/// sign-up, and change events on every session transition.
///
/// Tests can inject per-call latency to drive interleavings.
#[derive(Debug)]
pub struct MemoryAuthApi {
    users: Mutex<HashMap<String, RegisteredUser>>,
    current: Mutex<Option<ProviderSession>>,
    events: broadcast::Sender<AuthEvent>,
    resume_calls: AtomicUsize,
    resume_delay: Mutex<Option<Duration>>,
    sign_in_delay: Mutex<HashMap<String, Duration>>,
}

impl MemoryAuthApi {
    /// An empty provider: no users, no session.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            users: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
            events,
            resume_calls: AtomicUsize::new(0),
            resume_delay: Mutex::new(None),
            sign_in_delay: Mutex::new(HashMap::new()),
        }
    }

    /// Register a verified user who can sign in.
    pub fn register_verified(&self, email: &str, password: &str) -> UserId {
        self.register(email, password, true)
    }

    /// Register a user who signed up but never confirmed their email.
    pub fn register_unverified(&self, email: &str, password: &str) -> UserId {
        self.register(email, password, false)
    }

    fn register(&self, email: &str, password: &str, verified: bool) -> UserId {
        let id = UserId::new();
        let user = AuthUser {
            id,
            email: email.to_string(),
            identities: Some(vec![IdentityLink {
                id: Uuid::new_v4().to_string(),
                provider: "email".to_string(),
            }]),
        };
        self.users.lock().unwrap().insert(
            email.to_string(),
            RegisteredUser {
                password: password.to_string(),
                verified,
                user,
            },
        );
        id
    }

    /// Pretend a prior run left a resumable session for this user.
    pub fn seed_session(&self, email: &str) {
        let session = {
            let users = self.users.lock().unwrap();
            users.get(email).map(|r| make_session(&r.user))
        };
        *self.current.lock().unwrap() = session;
    }

    /// Delay every resume call by the given duration.
    pub fn set_resume_delay(&self, delay: Duration) {
        *self.resume_delay.lock().unwrap() = Some(delay);
    }

    /// Delay sign-in for one email by the given duration.
    pub fn set_sign_in_delay(&self, email: &str, delay: Duration) {
        self.sign_in_delay
            .lock()
            .unwrap()
            .insert(email.to_string(), delay);
    }

    /// How many resume calls this provider has served.
    pub fn resume_calls(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }

    fn emit(&self, kind: AuthEventKind, session: Option<ProviderSession>) {
        let _ = self.events.send(AuthEvent { kind, session });
    }
}

impl Default for MemoryAuthApi {
    fn default() -> Self {
        Self::new()
    }
}

fn make_session(user: &AuthUser) -> ProviderSession {
    ProviderSession {
        access_token: format!("token-{}", Uuid::new_v4()),
        refresh_token: Some(format!("refresh-{}", Uuid::new_v4())),
        expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
        user: user.clone(),
    }
}

#[async_trait]
impl AuthApi for MemoryAuthApi {
    async fn resume_session(&self) -> AppResult<Option<ProviderSession>> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.resume_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let session = self.current.lock().unwrap().clone();
        if let Some(session) = &session {
            self.emit(AuthEventKind::SignedIn, Some(session.clone()));
        }
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUpOutcome> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.get(email) {
            if existing.verified {
                return Err(AppError::provider("User already registered"));
            }
            // The hosted service reports success here and signals the
            // duplicate only through an empty identities list.
            let mut user = existing.user.clone();
            user.identities = Some(Vec::new());
            return Ok(SignUpOutcome {
                user: Some(user),
                session: None,
            });
        }
        let id = UserId::new();
        let user = AuthUser {
            id,
            email: email.to_string(),
            identities: Some(vec![IdentityLink {
                id: Uuid::new_v4().to_string(),
                provider: "email".to_string(),
            }]),
        };
        users.insert(
            email.to_string(),
            RegisteredUser {
                password: password.to_string(),
                verified: false,
                user: user.clone(),
            },
        );
        Ok(SignUpOutcome {
            user: Some(user),
            session: None,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<ProviderSession> {
        let delay = self.sign_in_delay.lock().unwrap().get(email).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let session = {
            let users = self.users.lock().unwrap();
            let Some(registered) = users.get(email) else {
                return Err(AppError::provider("Invalid login credentials"));
            };
            if registered.password != password {
                return Err(AppError::provider("Invalid login credentials"));
            }
            if !registered.verified {
                return Err(AppError::provider("Email not confirmed"));
            }
            make_session(&registered.user)
        };
        *self.current.lock().unwrap() = Some(session.clone());
        self.emit(AuthEventKind::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn authorize_url(&self, options: &FederatedOptions) -> AppResult<String> {
        Ok(format!(
            "https://auth.invalid/authorize?provider={}&redirect_to={}",
            options.provider, options.redirect_to
        ))
    }

    async fn sign_out(&self) -> AppResult<()> {
        *self.current.lock().unwrap() = None;
        self.emit(AuthEventKind::SignedOut, None);
        Ok(())
    }

    fn auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_sign_up_returns_empty_identities() {
        let auth = MemoryAuthApi::new();
        auth.register_unverified("a@x.com", "pw");
        let outcome = auth.sign_up("a@x.com", "pw").await.unwrap();
        assert!(outcome.is_existing_unverified());
    }

    #[tokio::test]
    async fn test_fresh_sign_up_has_identity_link() {
        let auth = MemoryAuthApi::new();
        let outcome = auth.sign_up("new@x.com", "pw").await.unwrap();
        assert!(!outcome.is_existing_unverified());
    }

    #[tokio::test]
    async fn test_wrong_password_is_verbatim_provider_error() {
        let auth = MemoryAuthApi::new();
        auth.register_verified("a@x.com", "pw");
        let err = auth.sign_in_with_password("a@x.com", "nope").await.unwrap_err();
        assert_eq!(err.message, "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_sign_in_then_resume_returns_same_user() {
        let auth = MemoryAuthApi::new();
        let id = auth.register_verified("a@x.com", "pw");
        auth.sign_in_with_password("a@x.com", "pw").await.unwrap();
        let resumed = auth.resume_session().await.unwrap().unwrap();
        assert_eq!(resumed.user.id, id);
    }
}
