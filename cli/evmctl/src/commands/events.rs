//! Event commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use evman_client::{Event, EventField, EventId};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_output, print_receipt, Receipt, ReceiptNextStep};

use super::CommandContext;

/// Event commands.
#[derive(Debug, Args)]
pub struct EventsCommand {
    #[command(subcommand)]
    command: EventsSubcommand,
}

#[derive(Debug, Subcommand)]
enum EventsSubcommand {
    /// List your events.
    List,

    /// Create a new event.
    Create(CreateEventArgs),

    #[command(about = "Update an event")]
    Update(UpdateEventArgs),

    /// Delete an event.
    Delete(DeleteEventArgs),
}

#[derive(Debug, Args)]
struct CreateEventArgs {
    /// Event name.
    name: String,

    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Debug, Args)]
struct UpdateEventArgs {
    /// Event ID.
    id: EventId,

    /// New name (unchanged if omitted).
    #[arg(long)]
    name: Option<String>,

    /// New description (unchanged if omitted).
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct DeleteEventArgs {
    /// Event ID.
    id: EventId,
}

impl EventsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            EventsSubcommand::List => list_events(ctx).await,
            EventsSubcommand::Create(args) => create_event(ctx, args).await,
            EventsSubcommand::Update(args) => update_event(ctx, args).await,
            EventsSubcommand::Delete(args) => delete_event(ctx, args).await,
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub(crate) struct EventRow {
    #[tabled(rename = "ID")]
    id: EventId,

    #[tabled(rename = "Name")]
    name: String,

    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            description: event.description.clone(),
        }
    }
}

pub(crate) fn rows(events: &[Event]) -> Vec<EventRow> {
    events.iter().map(EventRow::from).collect()
}

async fn list_events(ctx: CommandContext) -> Result<()> {
    let mut manager = ctx.signed_in_manager()?;
    let events = manager.fetch_events().await?;

    print_output(&rows(events), ctx.format);
    Ok(())
}

async fn create_event(ctx: CommandContext, args: CreateEventArgs) -> Result<()> {
    let mut manager = ctx.signed_in_manager()?;
    manager.set_event_field(EventField::Name, args.name);
    manager.set_event_field(EventField::Description, args.description);

    let event = manager.save_event().await?;

    print_saved(&ctx, &event, "events.create", "Created");
    Ok(())
}

async fn update_event(ctx: CommandContext, args: UpdateEventArgs) -> Result<()> {
    if args.name.is_none() && args.description.is_none() {
        return Err(CliError::NothingToUpdate.into());
    }

    let mut manager = ctx.signed_in_manager()?;
    manager.fetch_events().await?;
    manager.select_for_edit_by_id(args.id)?;

    if let Some(name) = args.name {
        manager.set_event_field(EventField::Name, name);
    }
    if let Some(description) = args.description {
        manager.set_event_field(EventField::Description, description);
    }

    let event = manager.save_event().await?;

    print_saved(&ctx, &event, "events.update", "Updated");
    Ok(())
}

async fn delete_event(ctx: CommandContext, args: DeleteEventArgs) -> Result<()> {
    let mut manager = ctx.signed_in_manager()?;
    manager.delete_event(args.id.clone()).await?;

    let next = vec![ReceiptNextStep {
        label: "Next",
        cmd: "evm events list".to_string(),
    }];
    print_receipt::<EventRow>(
        ctx.format,
        Receipt {
            message: format!(
                "Deleted event {} ({} remaining)",
                args.id,
                manager.events().len()
            ),
            kind: "events.delete",
            resource_key: "event",
            resource: None,
            ids: serde_json::json!({ "event_id": args.id }),
            next: &next,
        },
    );
    Ok(())
}

fn print_saved(ctx: &CommandContext, event: &Event, kind: &str, verb: &str) {
    let row = EventRow::from(event);
    let next = vec![
        ReceiptNextStep {
            label: "Next",
            cmd: "evm events list".to_string(),
        },
        ReceiptNextStep {
            label: "Next",
            cmd: format!("evm events update {} --description <text>", event.id),
        },
    ];

    print_receipt(
        ctx.format,
        Receipt {
            message: format!("{} event '{}' ({})", verb, event.name, event.id),
            kind,
            resource_key: "event",
            resource: Some(&row),
            ids: serde_json::json!({ "event_id": event.id }),
            next: &next,
        },
    );
}
