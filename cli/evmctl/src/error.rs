//! Error handling and display for the CLI.

use colored::Colorize;
use evman_client::ClientError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not authenticated. Run `evm auth login` to authenticate.")]
    NotAuthenticated,

    #[error("Nothing to update. Pass --name and/or --description.")]
    NothingToUpdate,
}

/// Print an error in a user-friendly format.
///
/// Client errors were already shown as notifications, so only the hint is
/// added for them.
pub fn print_error(err: &anyhow::Error) {
    if let Some(client_err) = err.downcast_ref::<ClientError>() {
        if let Some(hint) = client_hint(client_err) {
            eprintln!("\n{}", hint.yellow());
        }
        return;
    }

    eprintln!("{} {:#}", "Error:".red().bold(), err);

    if let Some(CliError::NotAuthenticated) = err.downcast_ref::<CliError>() {
        eprintln!(
            "\n{}",
            "Hint: Run `evm auth login` or `evm auth register`.".yellow()
        );
    }
}

fn client_hint(err: &ClientError) -> Option<&'static str> {
    match err {
        ClientError::NotAuthenticated => Some("Hint: Run `evm auth login` to authenticate."),
        ClientError::Api { status: 401, .. } => {
            Some("Hint: Your session may have expired. Run `evm auth login`.")
        }
        ClientError::Api { status: 403, .. } => {
            Some("Hint: You may not have permission for this operation.")
        }
        ClientError::Network(_) => {
            Some("Hint: Check your network connection and API endpoint (`evm config show`).")
        }
        ClientError::EventNotFound(_) => Some("Hint: Run `evm events list` to see event IDs."),
        _ => None,
    }
}
