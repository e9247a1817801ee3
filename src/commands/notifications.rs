//! Broadcast notification commands.

use std::time::Duration;

use clap::{Args, Subcommand};
use tokio::sync::mpsc;

use mandal_core::AppResult;
use mandal_entity::Notification;
use mandal_realtime::{EventBridge, FeedState, ToastBuffer};

use super::AppContext;

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// Print existing notifications, then follow new ones until Ctrl+C
    Listen,
}

/// Execute notification commands
pub async fn execute(args: &NotificationsArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    ctx.require_identity().await?;

    match &args.command {
        NotificationsCommand::Listen => {
            let retention = Duration::from_secs(ctx.config.realtime.toast_retention_seconds);
            let bridge = EventBridge::new(ctx.rows.clone(), ctx.transport.clone());
            let (tx, mut rx) = mpsc::channel(ctx.config.realtime.channel_buffer_size);
            let handle = bridge.open(Notification::feed_filter(), tx).await?;

            let printer = tokio::spawn(async move {
                let mut feed = FeedState::<Notification>::new();
                let mut toasts = ToastBuffer::new(retention);
                while let Some(event) = rx.recv().await {
                    let before = feed.len();
                    feed.apply(&event);
                    if let Some(notification) = feed.items().get(before) {
                        toasts.push(notification.clone());
                        println!(
                            "* {} ({} active)",
                            notification.message,
                            toasts.active().len()
                        );
                    }
                }
            });

            tokio::signal::ctrl_c()
                .await
                .map_err(|e| mandal_core::AppError::internal(e.to_string()))?;
            handle.close().await;
            printer.abort();
        }
    }
    Ok(())
}
