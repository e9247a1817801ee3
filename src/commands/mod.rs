//! CLI command definitions and dispatch.

pub mod auth;
pub mod chat;
pub mod contribute;
pub mod events;
pub mod expenses;
pub mod gallery;
pub mod notifications;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use mandal_auth::guard::{RouteDecision, RouteGuard};
use mandal_auth::operations::AuthOperations;
use mandal_auth::session::SessionStore;
use mandal_core::config::AppConfig;
use mandal_core::traits::{AuthApi, FunctionsApi, ObjectStore, PushTransport, RowStore};
use mandal_core::types::session::UserIdentity;
use mandal_core::{AppError, AppResult};
use mandal_provider::http::auth::HttpAuthApi;
use mandal_provider::http::functions::HttpFunctionsApi;
use mandal_provider::http::rows::HttpRowStore;
use mandal_provider::http::storage::HttpObjectStore;
use mandal_provider::ws::transport::WsPushTransport;
use mandal_provider::ProviderClient;

/// Mandal Hub — community management terminal client
#[derive(Debug, Parser)]
#[command(name = "mandal", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/<env>.toml over config/default.toml)
    #[arg(short, long, default_value = "default")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login(auth::LoginArgs),
    /// Register a new account
    Signup(auth::SignupArgs),
    /// Sign out of the current session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Community chat
    Chat(chat::ChatArgs),
    /// Broadcast notifications
    Notifications(notifications::NotificationsArgs),
    /// Contribution records and online payment
    Contribute(contribute::ContributeArgs),
    /// Photo gallery
    Gallery(gallery::GalleryArgs),
    /// Community events
    Events(events::EventsArgs),
    /// Expense records
    Expenses(expenses::ExpensesArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        match &self.command {
            Commands::Login(args) => auth::login(args, &self.env).await,
            Commands::Signup(args) => auth::signup(args, &self.env).await,
            Commands::Logout => auth::logout(&self.env).await,
            Commands::Whoami => auth::whoami(&self.env).await,
            Commands::Chat(args) => chat::execute(args, &self.env).await,
            Commands::Notifications(args) => notifications::execute(args, &self.env).await,
            Commands::Contribute(args) => contribute::execute(args, &self.env).await,
            Commands::Gallery(args) => gallery::execute(args, &self.env).await,
            Commands::Events(args) => events::execute(args, &self.env).await,
            Commands::Expenses(args) => expenses::execute(args, &self.env).await,
        }
    }
}

/// Everything a command needs, wired over the hosted provider.
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<SessionStore>,
    pub operations: AuthOperations,
    pub guard: RouteGuard,
    pub rows: Arc<dyn RowStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub functions: Arc<dyn FunctionsApi>,
    pub transport: Arc<dyn PushTransport>,
}

impl AppContext {
    /// Build the full adapter stack from the named config environment.
    pub fn build(env: &str) -> AppResult<Self> {
        let config = AppConfig::load(env)?;
        let client = ProviderClient::new(config.provider.clone())?;

        let auth: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::new(client.clone()));
        let store = Arc::new(SessionStore::new(Arc::clone(&auth)));
        store.spawn_listener();
        let operations = AuthOperations::new(Arc::clone(&auth), Arc::clone(&store));
        let guard = RouteGuard::new(Arc::clone(&store));

        let rows: Arc<dyn RowStore> = Arc::new(HttpRowStore::new(client.clone()));
        let objects: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::new(client.clone()));
        let functions: Arc<dyn FunctionsApi> =
            Arc::new(HttpFunctionsApi::new(client, config.payment.clone()));
        let transport: Arc<dyn PushTransport> = Arc::new(WsPushTransport::new(
            config.provider.clone(),
            config.realtime.clone(),
        ));

        Ok(Self {
            config,
            store,
            operations,
            guard,
            rows,
            objects,
            functions,
            transport,
        })
    }

    /// Resume the session and require a signed-in identity.
    pub async fn require_identity(&self) -> AppResult<UserIdentity> {
        self.store.resume().await;
        match self.guard.check() {
            RouteDecision::Allow => self
                .store
                .current()
                .identity
                .ok_or_else(|| AppError::session("Not signed in")),
            _ => Err(AppError::session(
                "Not signed in. Run `mandal login` first.",
            )),
        }
    }
}
