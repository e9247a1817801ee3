//! Account commands: login, signup, logout, whoami.

use clap::Args;

use mandal_auth::guard::RouteDecision;
use mandal_auth::operations::{ALREADY_EXISTS_MESSAGE, SignUpStatus, VERIFICATION_SENT_MESSAGE};
use mandal_core::types::auth::FederatedOptions;
use mandal_core::{AppError, AppResult};

use super::AppContext;

/// Arguments for `mandal login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address (will prompt if not provided)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
    /// Use the federated provider instead of a password
    #[arg(long)]
    pub federated: bool,
}

/// Arguments for `mandal signup`
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Email address (will prompt if not provided)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Sign in with a password or via the federated provider.
pub async fn login(args: &LoginArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;

    if args.federated {
        let options = FederatedOptions {
            provider: ctx.config.auth.federated_provider.clone(),
            redirect_to: ctx.config.auth.redirect_to.clone(),
        };
        let url = ctx.operations.sign_in_with_provider(&options).await?;
        println!("Open this URL in your browser to continue signing in:");
        println!("{url}");
        return Ok(());
    }

    let email = prompt_email(args.email.as_deref())?;
    let password = prompt_password(args.password.as_deref(), false)?;

    let identity = ctx.operations.sign_in(&email, &password).await?;
    println!("Signed in as {}", identity.email);
    Ok(())
}

/// Register a new account.
pub async fn signup(args: &SignupArgs, env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;

    let email = prompt_email(args.email.as_deref())?;
    let password = prompt_password(args.password.as_deref(), true)?;

    match ctx.operations.sign_up(&email, &password).await? {
        SignUpStatus::VerificationEmailSent => println!("{VERIFICATION_SENT_MESSAGE}"),
        SignUpStatus::AlreadyExistsUnverified => println!("{ALREADY_EXISTS_MESSAGE}"),
    }
    Ok(())
}

/// End the current session.
pub async fn logout(env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    ctx.store.resume().await;
    ctx.operations.sign_out().await?;
    println!("Signed out");
    Ok(())
}

/// Print the signed-in identity, if any.
pub async fn whoami(env: &str) -> AppResult<()> {
    let ctx = AppContext::build(env)?;
    ctx.store.resume().await;

    match ctx.guard.check() {
        RouteDecision::Allow => {
            let session = ctx.store.current();
            // Allow implies an identity is present.
            if let Some(identity) = session.identity {
                println!("{} ({})", identity.email, identity.id);
            }
        }
        _ => println!("Not signed in"),
    }
    Ok(())
}

fn prompt_email(arg: Option<&str>) -> AppResult<String> {
    match arg {
        Some(email) => Ok(email.to_string()),
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e))),
    }
}

fn prompt_password(arg: Option<&str>, confirm: bool) -> AppResult<String> {
    match arg {
        Some(password) => Ok(password.to_string()),
        None => {
            let mut prompt = dialoguer::Password::new().with_prompt("Password");
            if confirm {
                prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
            }
            prompt
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {}", e)))
        }
    }
}
