//! Community chat commands.

use clap::{Args, Subcommand};
use tokio::sync::mpsc;

use mandal_core::AppResult;
use mandal_entity::ChatMessage;
use mandal_realtime::EventBridge;
use mandal_service::ChatService;

use super::AppContext;

/// Arguments for chat commands
#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Chat subcommand
    #[command(subcommand)]
    pub command: ChatCommand,
}

/// Chat subcommands
#[derive(Debug, Subcommand)]
pub enum ChatCommand {
    /// Send one message
    Send {
        /// Message text
        message: String,
        /// Sender name (defaults to the signed-in email)
        #[arg(short, long)]
        sender: Option<String>,
    },
    /// Print the history, then follow new messages until Ctrl+C
    Tail,
}

/// Execute chat commands
pub async fn execute(args: &ChatArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    let identity = ctx.require_identity().await?;
    let service = ChatService::new(ctx.rows.clone());

    match &args.command {
        ChatCommand::Send { message, sender } => {
            let sender = sender.as_deref().unwrap_or(&identity.email);
            let sent = service.send(sender, message).await?;
            println!("[{}] {}", sent.sender, sent.message);
        }
        ChatCommand::Tail => {
            let bridge = EventBridge::new(ctx.rows.clone(), ctx.transport.clone());
            let (tx, mut rx) = mpsc::channel(ctx.config.realtime.channel_buffer_size);
            let handle = bridge.open(ChatMessage::feed_filter(), tx).await?;

            let printer = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    match event.payload.decode::<ChatMessage>() {
                        Ok(message) => println!("[{}] {}", message.sender, message.message),
                        Err(_) => println!("{}", event.payload.0),
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
