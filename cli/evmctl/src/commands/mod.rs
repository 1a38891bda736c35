//! CLI commands.

mod auth;
mod config;
mod events;
mod shell;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use evman_client::{ApiClient, EventManager, FileSessionStore};

use crate::config::{session_path, Config};
use crate::error::CliError;
use crate::notify::ConsoleNotifier;
use crate::output::OutputFormat;

/// Event manager bound to the on-disk session and the terminal.
pub type Manager = EventManager<FileSessionStore, ConsoleNotifier>;

/// evman CLI - Manage your events from the terminal.
#[derive(Debug, Parser)]
#[command(name = "evm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// API endpoint URL (overrides the saved config).
    #[arg(long, global = true, env = "EVM_API_URL")]
    api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register, log in, or log out.
    Auth(auth::AuthCommand),

    /// Manage events.
    Events(events::EventsCommand),

    /// Show or change CLI configuration.
    Config(config::ConfigCommand),

    /// Interactive session with the sign-in and event forms.
    Shell(shell::ShellCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext {
            config: Config::load()?,
            api_url: self.api_url,
            format: OutputFormat::parse(&self.format),
        };

        match self.command {
            Commands::Auth(cmd) => cmd.run(ctx).await,
            Commands::Events(cmd) => cmd.run(ctx).await,
            Commands::Config(cmd) => cmd.run(ctx).await,
            Commands::Shell(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("evm {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub api_url: Option<String>,
    pub format: OutputFormat,
}

impl CommandContext {
    /// API URL in effect, preferring flag/env over the saved config.
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(self.config.api_url())
    }

    /// Build a manager. The session is not loaded yet.
    pub fn manager(&self) -> Result<Manager> {
        let api = ApiClient::new(self.api_url())?;
        let store = FileSessionStore::new(session_path()?);
        Ok(EventManager::new(api, store, ConsoleNotifier))
    }

    /// Build a manager with the persisted session loaded, failing when signed out.
    pub fn signed_in_manager(&self) -> Result<Manager> {
        let mut manager = self.manager()?;
        if !manager.restore()? {
            return Err(CliError::NotAuthenticated.into());
        }
        Ok(manager)
    }
}
