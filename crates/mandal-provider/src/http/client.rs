//! Shared HTTP plumbing for all hosted-service adapters.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;

use mandal_core::config::provider::ProviderConfig;
use mandal_core::{AppError, AppResult};

/// Shared connection state for the hosted service.
///
/// One instance is built at startup and cloned (it is `Arc`-backed
/// internally) into every adapter. The bearer token is set by the auth
/// adapter after sign-in and read by every other adapter.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ProviderConfig,
    http: reqwest::Client,
    bearer: RwLock<Option<String>>,
}

impl ProviderClient {
    /// Build a client from provider configuration.
    pub fn new(config: ProviderConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::with_source(
                mandal_core::ErrorKind::Configuration,
                format!("Failed to build HTTP client: {e}"),
                e,
            ))?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                bearer: RwLock::new(None),
            }),
        })
    }

    /// The provider configuration this client was built from.
    pub fn config(&self) -> &ProviderConfig {
        &self.inner.config
    }

    /// Absolute URL under the project base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.config.base_url.trim_end_matches('/'), path)
    }

    /// Replace the bearer token after a session change.
    pub async fn set_bearer(&self, token: Option<String>) {
        *self.inner.bearer.write().await = token;
    }

    /// Current bearer token, if a session is active.
    pub async fn bearer(&self) -> Option<String> {
        self.inner.bearer.read().await.clone()
    }

    /// Start a request carrying the API key and, when present, the
    /// session's bearer token.
    pub async fn request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.inner.config.anon_key) {
            headers.insert("apikey", value);
        }
        let token = self
            .bearer()
            .await
            .unwrap_or_else(|| self.inner.config.anon_key.clone());
        self.inner
            .http
            .request(method, url)
            .headers(headers)
            .bearer_auth(token)
    }

    /// Check a response, translating non-success bodies into provider
    /// errors with the provider's message verbatim.
    pub async fn check(&self, response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(provider_error(status, &body))
    }
}

/// Pull the human-readable message out of a provider error body.
///
/// The error shape varies by service (`error_description`, `msg`,
/// `message`, `error`); this is the single place that knows about all
/// of them.
pub fn provider_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            for key in ["error_description", "msg", "message", "error"] {
                if let Some(text) = v.get(key).and_then(Value::as_str) {
                    return Some(text.to_string());
                }
            }
            None
        })
        .unwrap_or_else(|| format!("Provider returned status {status}"));
    AppError::provider(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extracted_from_known_shapes() {
        let status = StatusCode::BAD_REQUEST;
        for body in [
            r#"{"error_description":"Invalid login credentials"}"#,
            r#"{"msg":"Invalid login credentials"}"#,
            r#"{"message":"Invalid login credentials"}"#,
            r#"{"error":"Invalid login credentials"}"#,
        ] {
            let err = provider_error(status, body);
            assert_eq!(err.message, "Invalid login credentials");
        }
    }

    #[test]
    fn test_unknown_shape_falls_back_to_status() {
        let err = provider_error(StatusCode::BAD_GATEWAY, "<html>boom</html>");
        assert!(err.message.contains("502"));
    }
}
