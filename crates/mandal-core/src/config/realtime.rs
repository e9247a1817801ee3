//! Realtime subscription configuration.

use serde::{Deserialize, Serialize};

/// Settings for realtime push subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal buffer size for the per-subscription event channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Heartbeat interval in seconds for the WebSocket transport.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// How long to wait for a subscribe acknowledgment in seconds.
    #[serde(default = "default_subscribe_ack_timeout")]
    pub subscribe_ack_timeout_seconds: u64,
    /// Seconds a notification toast stays visible before auto-dismissal.
    #[serde(default = "default_toast_retention")]
    pub toast_retention_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            subscribe_ack_timeout_seconds: default_subscribe_ack_timeout(),
            toast_retention_seconds: default_toast_retention(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_subscribe_ack_timeout() -> u64 {
    10
}

fn default_toast_retention() -> u64 {
    5
}
