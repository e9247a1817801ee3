//! Unified application error types for Mandal Hub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Messages coming back from the
//! hosted provider are carried verbatim — the adapter layer translates
//! response shapes exactly once, and nothing upstream re-inspects them.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input validation failed before anything was sent to the provider.
    Validation,
    /// The hosted provider rejected a call; the message is its own text.
    Provider,
    /// A realtime subscription could not be established or was lost.
    Subscription,
    /// A session-related error occurred (no session, resume failed).
    Session,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Provider => write!(f, "PROVIDER"),
            Self::Subscription => write!(f, "SUBSCRIPTION"),
            Self::Session => write!(f, "SESSION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Mandal Hub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. Nothing in this system is fatal to the
/// process: every error degrades to a user-visible message.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a provider error carrying the provider's message verbatim.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Provider, message)
    }

    /// Create a subscription error.
    pub fn subscription(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Subscription, message)
    }

    /// Create a session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Session, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error came back from the hosted provider.
    pub fn is_provider(&self) -> bool {
        self.kind == ErrorKind::Provider
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, err.to_string(), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::provider("Invalid login credentials");
        assert_eq!(err.to_string(), "PROVIDER: Invalid login credentials");
    }

    #[test]
    fn test_provider_message_is_verbatim() {
        let err = AppError::provider("User already registered");
        assert!(err.is_provider());
        assert_eq!(err.message, "User already registered");
    }

    #[test]
    fn test_source_is_preserved() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(inner);
        assert_eq!(err.kind, ErrorKind::Serialization);
        assert!(std::error::Error::source(&err).is_some());
    }
}
