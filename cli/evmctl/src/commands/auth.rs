//! Authentication commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use evman_client::{CredentialsField, Session};
use serde::Serialize;

use crate::output::{print_receipt, print_single, print_success, OutputFormat, Receipt, ReceiptNextStep};

use super::{CommandContext, Manager};

/// Authentication commands.
#[derive(Debug, Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Create an account and log in.
    Register(RegisterArgs),

    /// Log in with email or username.
    Login(LoginArgs),

    /// Forget the saved session.
    Logout,

    /// Show current authentication status.
    Status,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    username: String,

    #[arg(long, env = "EVM_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Email or username.
    #[arg(long, visible_alias = "email")]
    identifier: String,

    #[arg(long, env = "EVM_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Serialize)]
struct SessionView {
    authenticated: bool,
    api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<String>,
}

impl SessionView {
    fn new(api_url: &str, session: Option<&Session>) -> Self {
        let user = session.and_then(|s| s.user.as_ref());
        Self {
            authenticated: session.is_some(),
            api_url: api_url.to_string(),
            username: user.and_then(|u| u.username.clone()),
            email: user.and_then(|u| u.email.clone()),
            since: session.map(|s| s.created_at.to_rfc3339()),
        }
    }
}

impl AuthCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            AuthSubcommand::Register(args) => register(ctx, args).await,
            AuthSubcommand::Login(args) => login(ctx, args).await,
            AuthSubcommand::Logout => logout(ctx).await,
            AuthSubcommand::Status => status(ctx).await,
        }
    }
}

async fn register(ctx: CommandContext, args: RegisterArgs) -> Result<()> {
    let mut manager = ctx.manager()?;
    manager.set_credential(CredentialsField::Email, args.email);
    manager.set_credential(CredentialsField::Username, args.username);
    manager.set_credential(CredentialsField::Password, args.password);

    let session = manager.submit_register().await?;
    print_signed_in(&ctx, &manager, &session, "auth.register", "Registered");
    Ok(())
}

async fn login(ctx: CommandContext, args: LoginArgs) -> Result<()> {
    let mut manager = ctx.manager()?;
    let session = manager.login(&args.identifier, &args.password).await?;
    print_signed_in(&ctx, &manager, &session, "auth.login", "Logged in");
    Ok(())
}

fn print_signed_in(
    ctx: &CommandContext,
    manager: &Manager,
    session: &Session,
    kind: &str,
    verb: &str,
) {
    let who = session
        .user
        .as_ref()
        .and_then(|u| u.username.clone().or_else(|| u.email.clone()))
        .unwrap_or_else(|| "current user".to_string());
    let view = SessionView::new(ctx.api_url(), Some(session));
    let next = vec![
        ReceiptNextStep {
            label: "Next",
            cmd: "evm events list".to_string(),
        },
        ReceiptNextStep {
            label: "Next",
            cmd: "evm events create <name> --description <text>".to_string(),
        },
    ];

    print_receipt(
        ctx.format,
        Receipt {
            message: format!(
                "{} as {} ({} events)",
                verb,
                who,
                manager.events().len()
            ),
            kind,
            resource_key: "session",
            resource: Some(&view),
            ids: serde_json::json!({ "user_id": session.user.as_ref().and_then(|u| u.id) }),
            next: &next,
        },
    );
}

async fn logout(ctx: CommandContext) -> Result<()> {
    let mut manager = ctx.manager()?;
    manager.logout()?;

    match ctx.format {
        OutputFormat::Json => print_single(&serde_json::json!({ "ok": true })),
        OutputFormat::Table => print_success("Logged out successfully."),
    }
    Ok(())
}

/// Show authentication status. Reads the saved session only.
async fn status(ctx: CommandContext) -> Result<()> {
    let mut manager = ctx.manager()?;
    manager.restore()?;
    let view = SessionView::new(ctx.api_url(), manager.session());

    match ctx.format {
        OutputFormat::Json => print_single(&view),
        OutputFormat::Table => {
            if view.authenticated {
                println!("{} Authenticated", "Status:".green().bold());
                if let Some(username) = &view.username {
                    println!("  Username: {}", username);
                }
                if let Some(email) = &view.email {
                    println!("  Email: {}", email);
                }
                if let Some(since) = &view.since {
                    println!("  Since: {}", since);
                }
                println!("  API: {}", view.api_url);
            } else {
                println!("{} Not authenticated", "Status:".red().bold());
                println!("\nRun {} to log in.", "evm auth login".cyan());
            }
        }
    }

    Ok(())
}
