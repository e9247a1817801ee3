//! Push transport over the hosted realtime WebSocket.
//!
//! Each subscription opens its own socket, joins the table's topic, and
//! pumps change frames into the subscription's channel. The join/reply/
//! heartbeat frames are the hosted service's own protocol; this client
//! speaks just enough of it to receive row changes.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use mandal_core::config::provider::ProviderConfig;
use mandal_core::config::realtime::RealtimeConfig;
use mandal_core::traits::PushTransport;
use mandal_core::traits::push::PushSubscription;
use mandal_core::types::id::SubscriptionId;
use mandal_core::types::row::{Row, RowEvent, RowEventKind};
use mandal_core::{AppError, AppResult};

fn event_name(kind: RowEventKind) -> &'static str {
    match kind {
        RowEventKind::Insert => "INSERT",
        RowEventKind::Update => "UPDATE",
        RowEventKind::Delete => "DELETE",
    }
}

/// [`PushTransport`] implementation over the realtime WebSocket service.
#[derive(Debug)]
pub struct WsPushTransport {
    provider: ProviderConfig,
    realtime: RealtimeConfig,
    /// Subscription ID → socket pump task.
    pumps: DashMap<SubscriptionId, JoinHandle<()>>,
}

impl WsPushTransport {
    /// Build the transport from configuration.
    pub fn new(provider: ProviderConfig, realtime: RealtimeConfig) -> Self {
        Self {
            provider,
            realtime,
            pumps: DashMap::new(),
        }
    }

    /// Number of currently open subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.pumps.len()
    }
}

#[async_trait]
impl PushTransport for WsPushTransport {
    async fn subscribe(&self, table: &str, kind: RowEventKind) -> AppResult<PushSubscription> {
        let url = self.provider.realtime_url();
        let (mut socket, _) = tokio_tungstenite::connect_async(&url)
            .await
            .map_err(|e| AppError::subscription(format!("Realtime connect failed: {e}")))?;

        let topic = format!("realtime:public:{table}");
        let join = json!({
            "topic": topic,
            "event": "phx_join",
            "payload": {
                "config": {
                    "postgres_changes": [{
                        "event": event_name(kind),
                        "schema": "public",
                        "table": table,
                    }],
                },
            },
            "ref": "1",
        });
        socket
            .send(Message::Text(join.to_string().into()))
            .await
            .map_err(|e| AppError::subscription(format!("Realtime join failed: {e}")))?;

        // The subscription only exists once the service replies ok.
        let ack_timeout = Duration::from_secs(self.realtime.subscribe_ack_timeout_seconds);
        timeout(ack_timeout, wait_for_ack(&mut socket))
            .await
            .map_err(|_| AppError::subscription("Timed out waiting for subscribe acknowledgment"))??;

        let (tx, rx) = mpsc::channel(self.realtime.channel_buffer_size);
        let id = SubscriptionId::new();
        let heartbeat = Duration::from_secs(self.realtime.heartbeat_interval_seconds);
        let pump = tokio::spawn(pump_events(socket, tx, heartbeat));
        self.pumps.insert(id, pump);
        debug!(%id, table, "Realtime subscription established");
        Ok(PushSubscription { id, events: rx })
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> AppResult<()> {
        if let Some((_, pump)) = self.pumps.remove(&id) {
            pump.abort();
            debug!(%id, "Realtime subscription released");
        }
        Ok(())
    }
}

type Socket = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn wait_for_ack(socket: &mut Socket) -> AppResult<()> {
    while let Some(message) = socket.next().await {
        let message =
            message.map_err(|e| AppError::subscription(format!("Realtime stream error: {e}")))?;
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(frame) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        if frame.get("event").and_then(Value::as_str) != Some("phx_reply") {
            continue;
        }
        let status = frame
            .pointer("/payload/status")
            .and_then(Value::as_str)
            .unwrap_or("error");
        if status == "ok" {
            return Ok(());
        }
        return Err(AppError::subscription(format!(
            "Subscribe rejected: {}",
            frame.pointer("/payload/response").unwrap_or(&Value::Null)
        )));
    }
    Err(AppError::subscription(
        "Realtime stream closed before acknowledgment",
    ))
}

/// Forward change frames into the subscription channel until either side
/// goes away.
async fn pump_events(mut socket: Socket, tx: mpsc::Sender<RowEvent>, heartbeat: Duration) {
    let mut ticker = interval(heartbeat);
    let mut heartbeat_ref: u64 = 2;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = json!({
                    "topic": "phoenix",
                    "event": "heartbeat",
                    "payload": {},
                    "ref": heartbeat_ref.to_string(),
                });
                heartbeat_ref += 1;
                if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
                    warn!("Realtime heartbeat failed, closing pump");
                    return;
                }
            }
            message = socket.next() => {
                let Some(Ok(Message::Text(text))) = message else {
                    debug!("Realtime stream ended");
                    return;
                };
                let Ok(frame) = serde_json::from_str::<Value>(&text) else {
                    continue;
                };
                if frame.get("event").and_then(Value::as_str) != Some("postgres_changes") {
                    continue;
                }
                let Some(record) = frame
                    .pointer("/payload/data/record")
                    .cloned()
                    .filter(|v| !v.is_null())
                else {
                    continue;
                };
                let event = RowEvent::received(Row::new(record));
                if tx.send(event).await.is_err() {
                    // Consumer dropped the receiver; nothing left to do.
                    return;
                }
            }
        }
    }
}
