//! # evman-client
//!
//! Session and event client for the evman event-management API.
//!
//! The backend exposes local auth (`/api/auth/local`) that issues a bearer
//! token, and a token-guarded `/api/events` collection. This crate keeps the
//! token in a [`SessionStore`], talks to the API through [`ApiClient`], and
//! exposes the whole client state (session, events, sign-in draft, event
//! form) through [`EventManager`].
//!
//! Failures are reported twice: as a [`Notification`] to the injected
//! [`Notifier`], and as a [`ClientError`] to the caller.

pub mod api;
pub mod error;
pub mod manager;
pub mod model;
pub mod notify;
pub mod session;

pub use api::{ApiClient, DEFAULT_API_URL};
pub use error::ClientError;
pub use manager::EventManager;
pub use model::{
    CredentialsDraft, CredentialsField, EmptyEventId, Event, EventDraft, EventField, EventForm,
    EventId, FormMode, View,
};
pub use notify::{Notification, NotificationStatus, Notifier, RecordingNotifier};
pub use session::{AuthUser, FileSessionStore, MemorySessionStore, Session, SessionStore};
