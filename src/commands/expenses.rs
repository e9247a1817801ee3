//! Expense commands.

use clap::{Args, Subcommand};

use mandal_core::AppResult;
use mandal_core::traits::RowStore;
use mandal_entity::{Expense, expense};

use super::AppContext;

/// Arguments for expense commands
#[derive(Debug, Args)]
pub struct ExpensesArgs {
    /// Expense subcommand
    #[command(subcommand)]
    pub command: ExpensesCommand,
}

/// Expense subcommands
#[derive(Debug, Subcommand)]
pub enum ExpensesCommand {
    /// List expenses, newest first, with the running total
    List,
}

/// Execute expense commands
pub async fn execute(args: &ExpensesArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    ctx.require_identity().await?;

    match &args.command {
        ExpensesCommand::List => {
            let rows = ctx.rows.select(&Expense::list_filter()).await?;
            let expenses: Vec<Expense> = rows
                .iter()
                .map(|row| row.decode())
                .collect::<AppResult<_>>()?;
            for item in &expenses {
                println!("#{:<6} {:>10.2}  {}", item.id, item.amount, item.description);
            }
            println!("Total: {:.2}", expense::total(&expenses));
        }
    }
    Ok(())
}
