//! Resource and form types shared by the client and its front ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned event identifier.
///
/// Opaque to the client: depending on its storage the backend issues integers
/// or strings, and the id is only echoed back in request paths. Two ids are
/// equal when their textual forms are, so `7` and `"7"` name the same event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(u64),
    Text(String),
}

impl PartialEq for EventId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(n), Self::Text(t)) | (Self::Text(t), Self::Number(n)) => {
                *t == n.to_string()
            }
        }
    }
}

impl Eq for EventId {}

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event id must not be empty")]
pub struct EmptyEventId;

impl FromStr for EventId {
    type Err = EmptyEventId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyEventId);
        }
        Ok(s.parse().map_or_else(|_| Self::Text(s.to_string()), Self::Number))
    }
}

/// An event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty()
    }
}

/// The create/edit form: a draft plus the event being edited, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub draft: EventDraft,
    pub editing_event_id: Option<EventId>,
}

impl EventForm {
    pub fn mode(&self) -> FormMode {
        match &self.editing_event_id {
            Some(id) => FormMode::Edit(id.clone()),
            None => FormMode::Create,
        }
    }

    /// Load an existing event into the form and switch to edit mode.
    pub fn select(&mut self, event: &Event) {
        self.draft = EventDraft::new(event.name.clone(), event.description.clone());
        self.editing_event_id = Some(event.id.clone());
    }

    pub fn set(&mut self, field: EventField, value: impl Into<String>) {
        match field {
            EventField::Name => self.draft.name = value.into(),
            EventField::Description => self.draft.description = value.into(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Whether submitting the event form creates or updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EventId),
}

impl FormMode {
    pub fn heading(&self) -> &'static str {
        match self {
            FormMode::Create => "Create Event",
            FormMode::Edit(_) => "Edit Event",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Create",
            FormMode::Edit(_) => "Update",
        }
    }
}

/// Sign-in form input. Never persisted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialsDraft {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl CredentialsDraft {
    pub fn set(&mut self, field: CredentialsField, value: impl Into<String>) {
        match field {
            CredentialsField::Email => self.email = value.into(),
            CredentialsField::Username => self.username = value.into(),
            CredentialsField::Password => self.password = value.into(),
        }
    }

    /// Identifier used for login: the email, or the username when no email was entered.
    pub fn identifier(&self) -> &str {
        if self.email.trim().is_empty() {
            &self.username
        } else {
            &self.email
        }
    }
}

impl fmt::Debug for CredentialsDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsDraft")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsField {
    Email,
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Name,
    Description,
}

/// Field name that does not belong to the form it was sent to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for CredentialsField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "username" => Ok(Self::Username),
            "password" => Ok(Self::Password),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

impl FromStr for EventField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Which form is currently rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    SignedOut,
    Events { mode: FormMode },
}
