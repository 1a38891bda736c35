//! Config commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::{config_dir, session_path, Config};
use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Show or change the saved CLI configuration.
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommand {
    /// Show the configuration in effect.
    Show,

    /// Save the API endpoint URL.
    SetUrl(SetUrlArgs),

    /// Restore the default configuration.
    Reset,
}

#[derive(Debug, Args)]
struct SetUrlArgs {
    /// API endpoint URL, e.g. https://events.example.com
    url: String,
}

#[derive(Debug, Serialize)]
struct ConfigView {
    api_url: String,
    saved_api_url: String,
    config_dir: String,
    session_file: String,
}

impl ConfigCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            ConfigSubcommand::Show => show(ctx).await,
            ConfigSubcommand::SetUrl(args) => set_url(ctx, args).await,
            ConfigSubcommand::Reset => reset(ctx).await,
        }
    }
}

async fn show(ctx: CommandContext) -> Result<()> {
    let view = ConfigView {
        api_url: ctx.api_url().to_string(),
        saved_api_url: ctx.config.api_url.clone(),
        config_dir: config_dir()?.display().to_string(),
        session_file: session_path()?.display().to_string(),
    };

    match ctx.format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => {
            println!("api_url: {}", view.api_url);
            println!("saved_api_url: {}", view.saved_api_url);
            println!("config_dir: {}", view.config_dir);
            println!("session_file: {}", view.session_file);
        }
    }

    Ok(())
}

async fn set_url(mut ctx: CommandContext, args: SetUrlArgs) -> Result<()> {
    ctx.config.api_url = args.url.trim_end_matches('/').to_string();
    ctx.config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&ctx.config),
        OutputFormat::Table => print_success(&format!("API URL set to {}", ctx.config.api_url)),
    }

    Ok(())
}

async fn reset(ctx: CommandContext) -> Result<()> {
    let config = Config::default();
    config.save()?;

    match ctx.format {
        OutputFormat::Json => print_single(&config),
        OutputFormat::Table => print_success(&format!("API URL reset to {}", config.api_url)),
    }

    Ok(())
}
