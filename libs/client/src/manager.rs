//! Session & event client.
//!
//! [`EventManager`] owns the state a front end renders: the session, the
//! event list, the sign-in draft and the event form. Every mutation is
//! followed by a re-fetch so the list always mirrors the backend. Operations
//! take `&mut self`, so a manager never has two request sequences in flight.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::api::{event_path, ApiClient, EVENTS_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::error::{backend_message_or_generic, ClientError, GENERIC_FAILURE};
use crate::model::{
    CredentialsDraft, CredentialsField, Event, EventField, EventForm, EventId, UnknownField, View,
};
use crate::notify::{Notification, Notifier};
use crate::session::{AuthUser, Session, SessionStore};

pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const LOGIN_FAILED: &str = "Login failed";
pub const LOAD_FAILED: &str = "Failed to load events";
pub const SAVE_FAILED: &str = "Failed to save event";
pub const DELETE_FAILED: &str = "Failed to delete event";
pub const RESTORE_FAILED: &str = "Failed to restore session";
pub const LOGOUT_FAILED: &str = "Logout failed";
pub const EVENT_NOT_FOUND: &str = "Event not found";

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

pub struct EventManager<S, N> {
    api: ApiClient,
    store: S,
    notifier: N,
    session: Option<Session>,
    events: Vec<Event>,
    credentials: CredentialsDraft,
    form: EventForm,
}

impl<S: SessionStore, N: Notifier> EventManager<S, N> {
    pub fn new(api: ApiClient, store: S, notifier: N) -> Self {
        Self {
            api,
            store,
            notifier,
            session: None,
            events: Vec::new(),
            credentials: CredentialsDraft::default(),
            form: EventForm::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn credentials(&self) -> &CredentialsDraft {
        &self.credentials
    }

    pub fn form(&self) -> &EventForm {
        &self.form
    }

    /// The form a front end should render.
    pub fn view(&self) -> View {
        if self.is_authenticated() {
            View::Events {
                mode: self.form.mode(),
            }
        } else {
            View::SignedOut
        }
    }

    /// Restore a persisted session and, when there is one, load the events.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        if self.restore()? {
            self.fetch_events().await?;
        }
        Ok(())
    }

    /// Read the persisted session without touching the network.
    pub fn restore(&mut self) -> Result<bool, ClientError> {
        let session = self
            .store
            .load()
            .map_err(|e| self.report(RESTORE_FAILED, e.into()))?;

        debug!(authenticated = session.is_some(), "session restored");
        self.session = session;
        Ok(self.session.is_some())
    }

    pub async fn register(&mut self, credentials: &CredentialsDraft) -> Result<Session, ClientError> {
        let body = RegisterRequest {
            username: &credentials.username,
            email: &credentials.email,
            password: &credentials.password,
        };
        self.authenticate(REGISTER_PATH, &body, REGISTRATION_FAILED)
            .await
    }

    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<Session, ClientError> {
        let body = LoginRequest {
            identifier,
            password,
        };
        self.authenticate(LOGIN_PATH, &body, LOGIN_FAILED).await
    }

    /// Register with the current sign-in draft.
    pub async fn submit_register(&mut self) -> Result<Session, ClientError> {
        let credentials = self.credentials.clone();
        self.register(&credentials).await
    }

    /// Log in with the current sign-in draft.
    pub async fn submit_login(&mut self) -> Result<Session, ClientError> {
        let credentials = self.credentials.clone();
        self.login(credentials.identifier(), &credentials.password)
            .await
    }

    async fn authenticate<B: Serialize>(
        &mut self,
        path: &str,
        body: &B,
        title: &str,
    ) -> Result<Session, ClientError> {
        let response = self
            .api
            .post(path, None, body)
            .await
            .map_err(|e| self.report(title, e))?;

        let Some(token) = response.str_field("jwt").map(str::to_string) else {
            let message = backend_message_or_generic(&response.body);
            return Err(self.report(title, ClientError::Auth { message }));
        };

        let user = response
            .body
            .get("user")
            .cloned()
            .and_then(|user| serde_json::from_value::<AuthUser>(user).ok());
        let session = Session::new(token).with_user(user);

        self.store
            .save(&session)
            .map_err(|e| self.report(title, e.into()))?;
        self.session = Some(session.clone());
        info!(path, "session established");

        self.refresh().await;
        Ok(session)
    }

    /// Drop the session locally. The token is not revoked on the backend.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session = None;
        self.events.clear();
        self.form.reset();
        info!("logged out");

        self.store
            .clear()
            .map_err(|e| self.report(LOGOUT_FAILED, e.into()))
    }

    /// Replace the event list with the backend's collection.
    ///
    /// On failure the previous list is kept.
    pub async fn fetch_events(&mut self) -> Result<&[Event], ClientError> {
        let token = self.require_token(LOAD_FAILED)?;

        match self.load_events(&token).await {
            Ok(events) => {
                debug!(count = events.len(), "events loaded");
                self.events = events;
                Ok(&self.events)
            }
            Err(e) => Err(self.report(LOAD_FAILED, e)),
        }
    }

    async fn load_events(&self, token: &str) -> Result<Vec<Event>, ClientError> {
        let response = self.api.get(EVENTS_PATH, Some(token)).await?;

        if !response.status.is_success() {
            return Err(ClientError::Api {
                status: response.status.as_u16(),
                message: backend_message_or_generic(&response.body),
            });
        }

        serde_json::from_value(response.body).map_err(|source| ClientError::Decode {
            path: EVENTS_PATH.to_string(),
            source,
        })
    }

    /// Submit the event form: update when editing, create otherwise.
    pub async fn save_event(&mut self) -> Result<Event, ClientError> {
        let token = self.require_token(SAVE_FAILED)?;
        let draft = self.form.draft.clone();
        let editing = self.form.editing_event_id.clone();

        let result = match &editing {
            Some(id) => self.api.put(&event_path(id), Some(&token), &draft).await,
            None => self.api.post(EVENTS_PATH, Some(&token), &draft).await,
        };
        let response = result.map_err(|e| self.report(SAVE_FAILED, e))?;

        if !response.has_id() {
            let message = backend_message_or_generic(&response.body);
            return Err(self.report(SAVE_FAILED, ClientError::Validation { message }));
        }

        let id = serde_json::from_value::<EventId>(response.body["id"].clone()).map_err(
            |source| {
                self.report(
                    SAVE_FAILED,
                    ClientError::Decode {
                        path: EVENTS_PATH.to_string(),
                        source,
                    },
                )
            },
        )?;
        let saved = Event {
            id,
            name: string_or(&response.body, "name", &draft.name),
            description: string_or(&response.body, "description", &draft.description),
        };
        info!(id = %saved.id, updated = editing.is_some(), "event saved");

        self.refresh().await;
        self.form.reset();
        Ok(saved)
    }

    pub async fn delete_event(&mut self, id: EventId) -> Result<(), ClientError> {
        let token = self.require_token(DELETE_FAILED)?;

        let response = self
            .api
            .delete(&event_path(&id), Some(&token))
            .await
            .map_err(|e| self.report(DELETE_FAILED, e))?;

        if !response.has_id() {
            return Err(self.report(DELETE_FAILED, ClientError::Deletion { id }));
        }
        info!(%id, "event deleted");

        if self.form.editing_event_id.as_ref() == Some(&id) {
            self.form.reset();
        }
        self.refresh().await;
        Ok(())
    }

    /// Load an event into the form and switch to edit mode.
    pub fn select_for_edit(&mut self, event: &Event) {
        self.form.select(event);
    }

    /// Like [`select_for_edit`](Self::select_for_edit), looking the event up in the current list.
    pub fn select_for_edit_by_id(&mut self, id: EventId) -> Result<&EventForm, ClientError> {
        let Some(event) = self.events.iter().find(|e| e.id == id) else {
            return Err(self.report(EVENT_NOT_FOUND, ClientError::EventNotFound(id)));
        };
        self.form.select(event);
        Ok(&self.form)
    }

    /// Leave edit mode and clear the form.
    pub fn cancel_edit(&mut self) {
        self.form.reset();
    }

    pub fn set_credential(&mut self, field: CredentialsField, value: impl Into<String>) {
        self.credentials.set(field, value);
    }

    pub fn set_event_field(&mut self, field: EventField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Route a named input to the form that is currently rendered.
    pub fn handle_input(&mut self, name: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        match self.view() {
            View::SignedOut => self.set_credential(name.parse()?, value),
            View::Events { .. } => self.set_event_field(name.parse()?, value),
        }
        Ok(())
    }

    fn require_token(&self, title: &str) -> Result<String, ClientError> {
        match &self.session {
            Some(session) => Ok(session.token.clone()),
            None => Err(self.report(title, ClientError::NotAuthenticated)),
        }
    }

    /// Re-fetch after a successful mutation. A failed fetch has already been
    /// reported and does not undo the mutation.
    async fn refresh(&mut self) {
        if let Err(e) = self.fetch_events().await {
            debug!(error = %e, "refresh failed");
        }
    }

    /// Log a failure, show it to the user, and hand it back.
    fn report(&self, title: &str, err: ClientError) -> ClientError {
        if err.is_transport() {
            error!(title, error = %err, "request failed");
        } else {
            warn!(title, error = %err, "operation rejected");
        }

        let description = match &err {
            ClientError::Auth { message } | ClientError::Validation { message } => message.clone(),
            ClientError::Deletion { .. } => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        };
        self.notifier.notify(Notification::error(title, description));
        err
    }
}

fn string_or(body: &Value, key: &str, fallback: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}
