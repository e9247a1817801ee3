//! Auth adapter for the hosted identity service.
//!
//! Endpoint shapes follow the service's auth API: `/auth/v1/signup`,
//! `/auth/v1/token`, `/auth/v1/authorize`, `/auth/v1/logout`,
//! `/auth/v1/user`. Session resume is backed by the on-disk
//! [`SessionCache`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tracing::debug;

use mandal_core::traits::AuthApi;
use mandal_core::types::auth::{
    AuthEvent, AuthEventKind, AuthUser, FederatedOptions, ProviderSession, SignUpOutcome,
};
use mandal_core::{AppError, AppResult};

use super::client::ProviderClient;
use super::session_cache::SessionCache;

const EVENT_BUFFER: usize = 16;

/// Session payload as the auth service returns it.
#[derive(Debug, Deserialize)]
struct WireSession {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    user: AuthUser,
}

impl WireSession {
    fn into_session(self) -> ProviderSession {
        ProviderSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self
                .expires_at
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            user: self.user,
        }
    }
}

/// [`AuthApi`] implementation over the hosted auth service.
#[derive(Debug)]
pub struct HttpAuthApi {
    client: ProviderClient,
    cache: SessionCache,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpAuthApi {
    /// Build the adapter over a shared provider client.
    pub fn new(client: ProviderClient) -> Self {
        let cache = SessionCache::new(&client.config().session_cache_path);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            client,
            cache,
            events,
        }
    }

    fn emit(&self, kind: AuthEventKind, session: Option<ProviderSession>) {
        // No receivers is fine; the store may not be listening yet.
        let _ = self.events.send(AuthEvent { kind, session });
    }

    async fn adopt(&self, session: &ProviderSession, kind: AuthEventKind) {
        self.client
            .set_bearer(Some(session.access_token.clone()))
            .await;
        if let Err(e) = self.cache.store(session).await {
            debug!(error = %e, "Session cache write failed");
        }
        self.emit(kind, Some(session.clone()));
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<ProviderSession> {
        let url = self.client.endpoint("auth/v1/token?grant_type=refresh_token");
        let response = self
            .client
            .request(Method::POST, &url)
            .await
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        let response = self.client.check(response).await?;
        let wire: WireSession = response
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()))?;
        Ok(wire.into_session())
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn resume_session(&self) -> AppResult<Option<ProviderSession>> {
        let Some(cached) = self.cache.load().await else {
            return Ok(None);
        };

        // Validate the cached access token against the live user record.
        let url = self.client.endpoint("auth/v1/user");
        let response = self
            .client
            .request(Method::GET, &url)
            .await
            .bearer_auth(&cached.access_token)
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;

        if response.status().is_success() {
            let user: AuthUser = response
                .json()
                .await
                .map_err(|e| AppError::serialization(e.to_string()))?;
            let session = ProviderSession { user, ..cached };
            self.adopt(&session, AuthEventKind::SignedIn).await;
            return Ok(Some(session));
        }

        // Expired access token: one refresh attempt, then give up.
        if let Some(refresh_token) = cached.refresh_token.as_deref() {
            match self.refresh(refresh_token).await {
                Ok(session) => {
                    self.adopt(&session, AuthEventKind::TokenRefreshed).await;
                    return Ok(Some(session));
                }
                Err(e) => debug!(error = %e, "Session refresh failed"),
            }
        }
        self.cache.clear().await;
        Ok(None)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<SignUpOutcome> {
        let url = self.client.endpoint("auth/v1/signup");
        let response = self
            .client
            .request(Method::POST, &url)
            .await
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        let response = self.client.check(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()))?;

        // With email confirmation enabled the service returns the bare
        // user; with it disabled it returns a full session.
        if body.get("access_token").is_some() {
            let wire: WireSession = serde_json::from_value(body)?;
            let session = wire.into_session();
            self.adopt(&session, AuthEventKind::SignedIn).await;
            return Ok(SignUpOutcome {
                user: Some(session.user.clone()),
                session: Some(session),
            });
        }
        let user: AuthUser = serde_json::from_value(body)?;
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
        let url = self.client.endpoint("auth/v1/token?grant_type=password");
        let response = self
            .client
            .request(Method::POST, &url)
            .await
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        let response = self.client.check(response).await?;
        let wire: WireSession = response
            .json()
            .await
            .map_err(|e| AppError::serialization(e.to_string()))?;
        let session = wire.into_session();
        self.adopt(&session, AuthEventKind::SignedIn).await;
        Ok(session)
    }

    async fn authorize_url(&self, options: &FederatedOptions) -> AppResult<String> {
        let mut url = Url::parse(&self.client.endpoint("auth/v1/authorize"))
            .map_err(|e| AppError::configuration(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("provider", &options.provider)
            .append_pair("redirect_to", &options.redirect_to);
        Ok(url.to_string())
    }

    async fn sign_out(&self) -> AppResult<()> {
        let url = self.client.endpoint("auth/v1/logout");
        let response = self
            .client
            .request(Method::POST, &url)
            .await
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        // Local teardown happens regardless of the remote status; a dead
        // token should not strand the client in a signed-in state.
        let result = self.client.check(response).await.map(|_| ());
        self.client.set_bearer(None).await;
        self.cache.clear().await;
        self.emit(AuthEventKind::SignedOut, None);
        result
    }

    fn auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
