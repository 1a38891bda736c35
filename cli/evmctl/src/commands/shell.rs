//! Interactive shell.
//!
//! Renders the sign-in form while signed out and the event list plus the
//! create/edit form while signed in. `set <field> <value>` always fills the
//! form that is on screen.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use evman_client::{EventId, View};
use tabled::Table;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::events::rows;
use super::{CommandContext, Manager};

const HELP: &str = "\
Commands:
  set <field> <value>   fill a field of the visible form
                        (signed out: email, username, password;
                         signed in: name, description)
  register | login      submit the sign-in form
  list                  reload events
  edit <id>             load an event into the form
  cancel                leave edit mode
  save                  create or update from the form
  delete <id>           delete an event
  show                  redraw the screen
  logout                forget the session
  help                  show this help
  quit                  leave the shell";

/// Start an interactive session.
#[derive(Debug, Args)]
pub struct ShellCommand {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellInput {
    Set { field: String, value: String },
    Register,
    Login,
    Logout,
    List,
    Edit(EventId),
    Cancel,
    Save,
    Delete(EventId),
    Show,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<ShellInput>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word {
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("usage: set <field> <value>".to_string());
            }
            ShellInput::Set {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "register" => ShellInput::Register,
        "login" => ShellInput::Login,
        "logout" => ShellInput::Logout,
        "list" | "refresh" => ShellInput::List,
        "edit" => ShellInput::Edit(parse_id(rest)?),
        "cancel" => ShellInput::Cancel,
        "save" | "submit" => ShellInput::Save,
        "delete" => ShellInput::Delete(parse_id(rest)?),
        "show" => ShellInput::Show,
        "help" | "?" => ShellInput::Help,
        "quit" | "exit" => ShellInput::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };

    Ok(Some(input))
}

fn parse_id(value: &str) -> Result<EventId, String> {
    value
        .parse()
        .map_err(|_| format!("expected an event id, got '{value}'"))
}

impl ShellCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let mut manager = ctx.manager()?;
        if let Err(e) = manager.start().await {
            debug!(error = %e, "shell started without events");
        }
        render(&manager);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt(&manager)?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(ShellInput::Quit)) => break,
                Ok(Some(input)) => {
                    if apply(&mut manager, input).await {
                        render(&manager);
                    }
                }
                Err(message) => eprintln!("{}", message.yellow()),
            }
        }

        Ok(())
    }
}

/// Apply one input. Returns whether the screen should be redrawn.
///
/// Failed operations were already shown by the notifier.
async fn apply(manager: &mut Manager, input: ShellInput) -> bool {
    let outcome = match input {
        ShellInput::Set { field, value } => {
            if let Err(e) = manager.handle_input(&field, value) {
                let fields = match manager.view() {
                    View::SignedOut => "email, username, password",
                    View::Events { .. } => "name, description",
                };
                eprintln!("{}", format!("{e}; this form has: {fields}").yellow());
            }
            return false;
        }
        ShellInput::Register => manager.submit_register().await.map(|_| ()),
        ShellInput::Login => manager.submit_login().await.map(|_| ()),
        ShellInput::Logout => manager.logout(),
        ShellInput::List => manager.fetch_events().await.map(|_| ()),
        ShellInput::Edit(id) => manager.select_for_edit_by_id(id).map(|_| ()),
        ShellInput::Cancel => {
            manager.cancel_edit();
            Ok(())
        }
        ShellInput::Save => manager.save_event().await.map(|_| ()),
        ShellInput::Delete(id) => manager.delete_event(id).await,
        ShellInput::Show => Ok(()),
        ShellInput::Help => {
            println!("{HELP}");
            return false;
        }
        ShellInput::Quit => return false,
    };

    if let Err(e) = outcome {
        debug!(error = %e, "shell command failed");
    }
    true
}

fn prompt(manager: &Manager) -> Result<()> {
    let label = match manager.view() {
        View::SignedOut => "signed out".to_string(),
        View::Events { mode } => mode.heading().to_lowercase(),
    };
    print!("{} ", format!("evm ({label})>").cyan());
    std::io::stdout().flush()?;
    Ok(())
}

fn render(manager: &Manager) {
    println!();
    match manager.view() {
        View::SignedOut => {
            let creds = manager.credentials();
            println!("{}", "Event Manager".bold());
            println!("  Email:    {}", creds.email);
            println!("  Username: {}", creds.username);
            println!("  Password: {}", "*".repeat(creds.password.chars().count()));
            println!("{}", "register | login".dimmed());
        }
        View::Events { mode } => {
            println!("{}", "Your Events".bold());
            if manager.events().is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                println!("{}", Table::new(rows(manager.events())));
            }

            let form = manager.form();
            println!("\n{}", mode.heading().bold());
            println!("  Name:        {}", form.draft.name);
            println!("  Description: {}", form.draft.description);
            println!(
                "{}",
                format!("save ({}) | cancel | edit <id> | delete <id> | logout", mode.submit_label())
                    .dimmed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            parse_line("set description  Q1 kickoff meeting ").unwrap(),
            Some(ShellInput::Set {
                field: "description".to_string(),
                value: "Q1 kickoff meeting".to_string()
            })
        );
    }

    #[test]
    fn set_without_value_clears() {
        assert_eq!(
            parse_line("set name").unwrap(),
            Some(ShellInput::Set {
                field: "name".to_string(),
                value: String::new()
            })
        );
        assert!(parse_line("set").is_err());
    }

    #[test]
    fn ids_are_parsed() {
        assert_eq!(
            parse_line("edit 7").unwrap(),
            Some(ShellInput::Edit(EventId::from(7)))
        );
        assert_eq!(
            parse_line("delete 12").unwrap(),
            Some(ShellInput::Delete(EventId::from(12)))
        );
        assert_eq!(
            parse_line("edit 5f1a8c").unwrap(),
            Some(ShellInput::Edit(EventId::from("5f1a8c")))
        );
        assert!(parse_line("delete").is_err());
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert!(parse_line("frobnicate").is_err());
        assert_eq!(parse_line("exit").unwrap(), Some(ShellInput::Quit));
        assert_eq!(parse_line("submit").unwrap(), Some(ShellInput::Save));
    }
}
