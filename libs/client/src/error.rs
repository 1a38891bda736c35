//! Client errors and backend error payload handling.

use serde_json::Value;
use thiserror::Error;

use crate::model::EventId;
use crate::session::StoreError;

/// Description used when the backend gives no usable reason.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Registration or login rejected.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Event create or update rejected.
    #[error("Failed to save event: {message}")]
    Validation { message: String },

    #[error("Failed to delete event {id}")]
    Deletion { id: EventId },

    #[error("Not authenticated. Run `evm auth login` to authenticate.")]
    NotAuthenticated,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Event {0} is not in the current list")]
    EventNotFound(EventId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Network or parse failure, as opposed to a rejection by the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Decode { .. })
    }
}

/// Extract the reason from a backend error body.
///
/// The auth and content endpoints nest validation messages as
/// `message[0].messages[0].message`. Flat `message` strings and
/// `error.message` objects are accepted as well.
pub fn backend_message(body: &Value) -> Option<String> {
    let nested = body
        .pointer("/message/0/messages/0/message")
        .and_then(Value::as_str);
    let flat = body.get("message").and_then(Value::as_str);
    let wrapped = body.pointer("/error/message").and_then(Value::as_str);

    nested
        .or(flat)
        .or(wrapped)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Like [`backend_message`], falling back to [`GENERIC_FAILURE`].
pub fn backend_message_or_generic(body: &Value) -> String {
    backend_message(body).unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_validation_message() {
        let body = json!({
            "statusCode": 400,
            "message": [{ "messages": [{ "id": "Auth.form.error.email.taken", "message": "Email is already taken." }] }]
        });
        assert_eq!(
            backend_message(&body).as_deref(),
            Some("Email is already taken.")
        );
    }

    #[test]
    fn falls_back_to_other_shapes() {
        assert_eq!(
            backend_message(&json!({ "message": "Forbidden" })).as_deref(),
            Some("Forbidden")
        );
        assert_eq!(
            backend_message(&json!({ "error": { "status": 400, "message": "Invalid identifier or password" } }))
                .as_deref(),
            Some("Invalid identifier or password")
        );
    }

    #[test]
    fn malformed_payload_is_generic() {
        for body in [
            json!({}),
            json!({ "message": [] }),
            json!({ "message": [{ "messages": [] }] }),
            json!({ "message": [{ "messages": [{ "message": 42 }] }] }),
            json!([1, 2, 3]),
            json!(null),
        ] {
            assert_eq!(backend_message_or_generic(&body), GENERIC_FAILURE, "{body}");
        }
    }

    #[test]
    fn transport_classification() {
        let decode = ClientError::Decode {
            path: "/api/events".to_string(),
            source: serde_json::from_str::<Value>("{").unwrap_err(),
        };
        assert!(decode.is_transport());
        assert!(!ClientError::NotAuthenticated.is_transport());
        assert!(!ClientError::Api {
            status: 403,
            message: "Forbidden".to_string()
        }
        .is_transport());
    }
}
