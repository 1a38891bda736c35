//! Output formatting for CLI commands.

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

const CLI_SCHEMA_VERSION: &str = "evman.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

/// Print data in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                let table = Table::new(data).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = format_json(data, "[]");
            println!("{}", json);
        }
    }
}

/// Print a single item as JSON.
pub fn print_single<T: Serialize>(data: &T) {
    println!("{}", format_json(data, "{}"));
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

#[derive(Debug, Serialize)]
pub struct ReceiptNextStep {
    pub label: &'static str,
    pub cmd: String,
}

/// Result of a write operation, with suggested follow-up commands.
pub struct Receipt<'a, T: Serialize> {
    pub message: String,
    pub kind: &'a str,
    pub resource_key: &'a str,
    pub resource: Option<&'a T>,
    pub ids: serde_json::Value,
    pub next: &'a [ReceiptNextStep],
}

pub fn receipt_value<T: Serialize>(receipt: &Receipt<'_, T>) -> serde_json::Value {
    let mut value = serde_json::Map::new();
    value.insert("kind".to_string(), serde_json::json!(receipt.kind));
    value.insert("ids".to_string(), receipt.ids.clone());
    value.insert(
        "next".to_string(),
        serde_json::to_value(receipt.next).unwrap_or_else(|_| serde_json::json!([])),
    );
    if let Some(resource) = receipt.resource {
        value.insert(
            receipt.resource_key.to_string(),
            serde_json::to_value(resource).unwrap_or_else(|_| serde_json::json!({})),
        );
    }
    serde_json::json!({ "receipt": value })
}

pub fn print_receipt<T: Serialize>(format: OutputFormat, receipt: Receipt<'_, T>) {
    match format {
        OutputFormat::Table => {
            print_success(&receipt.message);
            for step in receipt.next {
                print_info(&format!("{}: {}", step.label, step.cmd));
            }
        }
        OutputFormat::Json => print_single(&receipt_value(&receipt)),
    }
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let wrapped = wrap_with_schema(value);
    let sorted = sort_json_value(wrapped);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| fallback.to_string())
}

fn wrap_with_schema(value: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": value
    })
}

fn sort_json_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(values) => {
            serde_json::Value::Array(values.into_iter().map(sort_json_value).collect())
        }
        serde_json::Value::Object(entries) => {
            let mut pairs: Vec<_> = entries.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut mapped = serde_json::Map::new();
            for (key, value) in pairs {
                mapped.insert(key, sort_json_value(value));
            }
            serde_json::Value::Object(mapped)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_value_includes_resource_and_next_steps() {
        let resource = serde_json::json!({ "id": 7, "name": "Launch" });
        let next = vec![ReceiptNextStep {
            label: "Next",
            cmd: "evm events list".to_string(),
        }];
        let value = receipt_value(&Receipt {
            message: "Created event".to_string(),
            kind: "events.create",
            resource_key: "event",
            resource: Some(&resource),
            ids: serde_json::json!({ "event_id": 7 }),
            next: &next,
        });
        let expected = serde_json::json!({
            "receipt": {
                "kind": "events.create",
                "ids": { "event_id": 7 },
                "next": [{ "label": "Next", "cmd": "evm events list" }],
                "event": { "id": 7, "name": "Launch" }
            }
        });
        assert_eq!(value, expected);
    }

    #[test]
    fn receipt_value_without_resource() {
        let value = receipt_value::<serde_json::Value>(&Receipt {
            message: "Deleted event 7".to_string(),
            kind: "events.delete",
            resource_key: "event",
            resource: None,
            ids: serde_json::json!({ "event_id": 7 }),
            next: &[],
        });
        assert!(value["receipt"].get("event").is_none());
        assert_eq!(value["receipt"]["kind"], "events.delete");
    }

    #[test]
    fn json_output_is_wrapped_and_sorted() {
        let out = format_json(&serde_json::json!({ "b": 1, "a": 2 }), "{}");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["schemaVersion"], CLI_SCHEMA_VERSION);
        assert!(out.find("\"a\"").unwrap() < out.find("\"b\"").unwrap());
    }
}
