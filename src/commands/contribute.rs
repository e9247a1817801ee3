//! Contribution commands.

use clap::{Args, Subcommand};

use mandal_core::AppResult;
use mandal_service::ContributionService;

use super::AppContext;

/// Arguments for contribution commands
#[derive(Debug, Args)]
pub struct ContributeArgs {
    /// Contribution subcommand
    #[command(subcommand)]
    pub command: ContributeCommand,
}

/// Contribution subcommands
#[derive(Debug, Subcommand)]
pub enum ContributeCommand {
    /// List all contributions, newest first
    List,
    /// Record a contribution collected in person
    Offline {
        /// Contributor name
        contributor: String,
        /// Amount
        amount: f64,
    },
    /// Start an online contribution and print the checkout session
    Online {
        /// Contributor name
        contributor: String,
        /// Amount
        amount: f64,
    },
}

/// Execute contribution commands
pub async fn execute(args: &ContributeArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    ctx.require_identity().await?;
    let service = ContributionService::new(ctx.rows.clone(), ctx.functions.clone());

    match &args.command {
        ContributeCommand::List => {
            for c in service.list().await? {
                println!(
                    "#{:<6} {:<24} {:>10.2}  {:?}/{:?}",
                    c.id, c.contributor, c.amount, c.method, c.status
                );
            }
        }
        ContributeCommand::Offline {
            contributor,
            amount,
        } => {
            let stored = service.record_offline(contributor, *amount).await?;
            println!("Recorded contribution #{} from {}", stored.id, stored.contributor);
        }
        ContributeCommand::Online {
            contributor,
            amount,
        } => {
            let handoff = service.pay_online(contributor, *amount).await?;
            println!(
                "Contribution #{} is pending payment",
                handoff.contribution.id
            );
            println!("Checkout session: {}", handoff.payment_session_id);
        }
    }
    Ok(())
}
