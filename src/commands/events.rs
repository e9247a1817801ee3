//! Community event commands.

use clap::{Args, Subcommand};

use mandal_core::AppResult;
use mandal_core::traits::RowStore;
use mandal_entity::Event;

use super::AppContext;

/// Arguments for event commands
#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Event subcommand
    #[command(subcommand)]
    pub command: EventsCommand,
}

/// Event subcommands
#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List upcoming events, soonest first
    List,
}

/// Execute event commands
pub async fn execute(args: &EventsArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    ctx.require_identity().await?;

    match &args.command {
        EventsCommand::List => {
            let rows = ctx.rows.select(&Event::list_filter()).await?;
            let events: Vec<Event> = rows
                .iter()
                .map(|row| row.decode())
                .collect::<AppResult<_>>()?;
            if events.is_empty() {
                println!("No events found.");
            }
            for event in events {
                let date = event
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "(no date)".to_string());
                println!(
                    "#{:<6} {}  {}  {}",
                    event.id,
                    date,
                    event.title,
                    event.description.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(())
}
