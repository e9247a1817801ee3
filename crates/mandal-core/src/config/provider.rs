//! Hosted provider endpoint configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend service.
///
/// One project exposes auth, row storage, object storage, realtime,
/// and serverless functions under a single base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Project base URL, e.g. `https://<project>.supabase.co`.
    pub base_url: String,
    /// Publishable (anon) API key sent with every request.
    pub anon_key: String,
    /// Request timeout in seconds for HTTP calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Storage bucket used for gallery uploads.
    #[serde(default = "default_bucket")]
    pub gallery_bucket: String,
    /// Path of the on-disk session cache (the browser's local storage
    /// equivalent for the terminal client).
    #[serde(default = "default_session_cache")]
    pub session_cache_path: String,
}

impl ProviderConfig {
    /// WebSocket endpoint for the realtime service, derived from the
    /// project base URL.
    pub fn realtime_url(&self) -> String {
        let ws_base = self
            .base_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        format!("{ws_base}/realtime/v1/websocket?apikey={}", self.anon_key)
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_bucket() -> String {
    "gallery".to_string()
}

fn default_session_cache() -> String {
    "data/session.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_url_swaps_scheme() {
        let config = ProviderConfig {
            base_url: "https://proj.supabase.co".to_string(),
            anon_key: "key".to_string(),
            request_timeout_seconds: 30,
            gallery_bucket: "gallery".to_string(),
            session_cache_path: "data/session.json".to_string(),
        };
        assert_eq!(
            config.realtime_url(),
            "wss://proj.supabase.co/realtime/v1/websocket?apikey=key"
        );
    }
}
