//! Auth provider trait.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::result::AppResult;
use crate::types::auth::{AuthEvent, FederatedOptions, ProviderSession, SignUpOutcome};

/// The hosted auth provider's surface as this client consumes it.
///
/// Every error a call produces is already translated into a verbatim
/// provider message by the implementation; callers surface it to the
/// user and never retry automatically.
#[async_trait]
pub trait AuthApi: Send + Sync + std::fmt::Debug + 'static {
    /// Resume a previously established session, if one exists.
    ///
    /// Returns `Ok(None)` when no session can be resumed; that is not
    /// an error.
    async fn resume_session(&self) -> AppResult<Option<ProviderSession>>;

    /// Register a new email/password identity.
    ///
    /// A provider-level success may still mean "already registered,
    /// unverified" — see [`SignUpOutcome::is_existing_unverified`].
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUpOutcome>;

    /// Exchange email/password credentials for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<ProviderSession>;

    /// Build the authorization URL for a federated redirect flow.
    ///
    /// The flow does not resolve here; the eventual identity arrives
    /// through [`AuthApi::auth_events`] when the browser returns.
    async fn authorize_url(&self, options: &FederatedOptions) -> AppResult<String>;

    /// End the current session.
    async fn sign_out(&self) -> AppResult<()>;

    /// Subscribe to the provider's change-event stream.
    ///
    /// Events are delivered in the order the provider emits them.
    fn auth_events(&self) -> broadcast::Receiver<AuthEvent>;
}
