//! Auth operations: sign-up, sign-in, federated sign-in, sign-out.
//!
//! Every operation clears prior status messages, reports its outcome
//! through the [`SessionStore`] status flags, and carries provider
//! failures verbatim. Nothing here retries automatically.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use mandal_core::traits::AuthApi;
use mandal_core::types::auth::FederatedOptions;
use mandal_core::types::session::UserIdentity;
use mandal_core::{AppError, AppResult};

use crate::session::SessionStore;

/// Message shown when sign-up hits an existing unverified account.
pub const ALREADY_EXISTS_MESSAGE: &str =
    "User already exists. Please check your email to verify your account.";

/// Message shown when sign-up sends a verification email.
pub const VERIFICATION_SENT_MESSAGE: &str =
    "Success! Please check your email to verify your account.";

/// How a successful sign-up call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpStatus {
    /// A new identity was created; a verification email is on its way.
    VerificationEmailSent,
    /// The email is already registered but unverified. Reported through
    /// `status.error`, but not a hard failure.
    AlreadyExistsUnverified,
}

#[derive(Debug, Validate)]
struct Credentials<'a> {
    #[validate(email(message = "A valid email is required"))]
    email: &'a str,
    #[validate(length(min = 1, message = "Password is required"))]
    password: &'a str,
}

fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    let credentials = Credentials { email, password };
    credentials.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|field| field.iter())
            .filter_map(|error| error.message.as_ref())
            .map(|m| m.to_string())
            .next()
            .unwrap_or_else(|| "Email and password are required".to_string());
        AppError::validation(message)
    })
}

/// The mutations of the session store: one instance per application,
/// sharing the store with the route guard and the screens.
#[derive(Debug)]
pub struct AuthOperations {
    auth: Arc<dyn AuthApi>,
    store: Arc<SessionStore>,
}

impl AuthOperations {
    /// Operations over the given provider and store.
    pub fn new(auth: Arc<dyn AuthApi>, store: Arc<SessionStore>) -> Self {
        Self { auth, store }
    }

    /// Register a new email/password identity.
    ///
    /// A provider-level success with an empty identity-linkage list
    /// means the email is already registered and unverified; that case
    /// surfaces as `status.error` but still returns `Ok`.
    pub async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUpStatus> {
        self.store.begin_operation();
        if let Err(e) = validate_credentials(email, password) {
            self.store.fail(e.message.clone());
            return Err(e);
        }

        match self.auth.sign_up(email, password).await {
            Ok(outcome) if outcome.is_existing_unverified() => {
                self.store.fail(ALREADY_EXISTS_MESSAGE);
                Ok(SignUpStatus::AlreadyExistsUnverified)
            }
            Ok(outcome) => {
                info!(email, "Sign-up accepted");
                // When confirmation is disabled project-side the call
                // already yields a session; adopt it.
                if let Some(session) = &outcome.session {
                    self.store.apply_session(session);
                }
                self.store.succeed(VERIFICATION_SENT_MESSAGE);
                Ok(SignUpStatus::VerificationEmailSent)
            }
            Err(e) => {
                self.store.fail(e.message.clone());
                Err(e)
            }
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On success the store adopts the new identity; on failure the
    /// provider's message lands in `status.error` verbatim.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<UserIdentity> {
        self.store.begin_operation();
        if let Err(e) = validate_credentials(email, password) {
            self.store.fail(e.message.clone());
            return Err(e);
        }

        match self.auth.sign_in_with_password(email, password).await {
            Ok(session) => {
                info!(email, "Signed in");
                self.store.apply_session(&session);
                Ok(session.user.to_identity())
            }
            Err(e) => {
                self.store.fail(e.message.clone());
                Err(e)
            }
        }
    }

    /// Start the federated redirect flow and return the authorization
    /// URL to open.
    ///
    /// This does not resolve with a session: the redirect ends the
    /// interactive context, and the eventual identity arrives through
    /// the provider's change-event stream. Loading is therefore cleared
    /// only on error.
    pub async fn sign_in_with_provider(&self, options: &FederatedOptions) -> AppResult<String> {
        self.store.begin_operation();
        match self.auth.authorize_url(options).await {
            Ok(url) => Ok(url),
            Err(e) => {
                self.store.fail(e.message.clone());
                Err(e)
            }
        }
    }

    /// End the current session.
    ///
    /// The store resets its identity when it observes the provider's
    /// signed-out event; any navigation afterwards is the caller's
    /// responsibility and is not atomic with the store update.
    pub async fn sign_out(&self) -> AppResult<()> {
        self.store.clear_messages();
        self.auth.sign_out().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_email_is_a_validation_error() {
        let err = validate_credentials("", "pw").unwrap_err();
        assert_eq!(err.kind, mandal_core::ErrorKind::Validation);
    }

    #[test]
    fn test_empty_password_is_a_validation_error() {
        let err = validate_credentials("a@x.com", "").unwrap_err();
        assert_eq!(err.message, "Password is required");
    }

    #[test]
    fn test_well_formed_credentials_pass() {
        assert!(validate_credentials("a@x.com", "pw").is_ok());
    }
}
