//! Wire-facing auth provider types.
//!
//! These mirror the shapes the hosted auth service returns. The adapter
//! layer in `mandal-provider` translates raw responses into these types
//! exactly once; everything upstream works with them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::session::UserIdentity;

/// A linked credential on a provider-side user record.
///
/// The auth provider returns one entry per linked credential (email,
/// each federated provider). An otherwise-successful sign-up whose
/// `identities` list comes back empty means the email is already
/// registered but unverified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityLink {
    /// Identifier of the linked credential.
    pub id: String,
    /// Which provider the credential belongs to, e.g. `"email"`.
    pub provider: String,
}

/// The provider-side user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider-minted user ID.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Linked credentials. Absent in some responses; `None` and empty
    /// are treated the same by the sign-up disambiguation rule.
    #[serde(default)]
    pub identities: Option<Vec<IdentityLink>>,
}

impl AuthUser {
    /// Whether the identity-linkage list is absent or empty — the
    /// provider's signal for "already registered, unverified".
    pub fn has_no_identity_links(&self) -> bool {
        self.identities.as_ref().is_none_or(|links| links.is_empty())
    }

    /// Project the provider record into the local identity type.
    pub fn to_identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// A resolved provider session: tokens plus the user they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    /// Bearer token for subsequent calls.
    pub access_token: String,
    /// Token used to mint a fresh access token.
    pub refresh_token: Option<String>,
    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// The authenticated user.
    pub user: AuthUser,
}

/// Outcome of a sign-up call.
///
/// The provider reports HTTP-level success for both "new identity
/// created" and "already registered, unverified"; callers disambiguate
/// by inspecting the returned user's identity links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpOutcome {
    /// The created (or pre-existing) user record, when returned.
    pub user: Option<AuthUser>,
    /// A session, only when email confirmation is disabled project-side.
    pub session: Option<ProviderSession>,
}

impl SignUpOutcome {
    /// Whether this success actually means "already registered".
    pub fn is_existing_unverified(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(AuthUser::has_no_identity_links)
    }
}

/// Options for the federated redirect flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedOptions {
    /// Provider slug, e.g. `"google"`.
    pub provider: String,
    /// Where the provider should send the browser after consent.
    pub redirect_to: String,
}

/// Kinds of change events the auth provider emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventKind {
    /// A session became active (password, federated return, or resume).
    SignedIn,
    /// The session ended.
    SignedOut,
    /// Tokens were refreshed; the identity is unchanged.
    TokenRefreshed,
}

/// One change event from the provider's auth event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEvent {
    /// What happened.
    pub kind: AuthEventKind,
    /// The session after the event, if one exists.
    pub session: Option<ProviderSession>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(identities: Option<Vec<IdentityLink>>) -> AuthUser {
        AuthUser {
            id: UserId::new(),
            email: "a@x.com".to_string(),
            identities,
        }
    }

    #[test]
    fn test_empty_identity_links_mean_existing_user() {
        let outcome = SignUpOutcome {
            user: Some(user(Some(vec![]))),
            session: None,
        };
        assert!(outcome.is_existing_unverified());
    }

    #[test]
    fn test_absent_identity_links_mean_existing_user() {
        let outcome = SignUpOutcome {
            user: Some(user(None)),
            session: None,
        };
        assert!(outcome.is_existing_unverified());
    }

    #[test]
    fn test_linked_identity_means_fresh_sign_up() {
        let outcome = SignUpOutcome {
            user: Some(user(Some(vec![IdentityLink {
                id: "1".to_string(),
                provider: "email".to_string(),
            }]))),
            session: None,
        };
        assert!(!outcome.is_existing_unverified());
    }
}
