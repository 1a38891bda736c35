//! HTTP client for the event-management API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::model::EventId;

/// Backend location used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:1337";

pub const REGISTER_PATH: &str = "/api/auth/local/register";
pub const LOGIN_PATH: &str = "/api/auth/local";
pub const EVENTS_PATH: &str = "/api/events";

/// Resource path of a single event.
pub fn event_path(id: &EventId) -> String {
    format!("{EVENTS_PATH}/{id}")
}

/// Status and decoded JSON body of a response.
///
/// The backend signals success through the body shape (`jwt`, `id`), so
/// callers get the body regardless of status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Non-empty string field at the top level of the body.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.body
            .get(key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether the body carries a non-null `id`.
    pub fn has_id(&self) -> bool {
        self.body.get("id").is_some_and(|id| !id.is_null())
    }
}

/// API client. Authentication is passed per request since the token changes
/// over the life of a session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("evman-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiResponse, ClientError> {
        self.send(Method::GET, path, self.request(Method::GET, path, token))
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        let request = self.request(Method::POST, path, token).json(body);
        self.send(Method::POST, path, request).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        let request = self.request(Method::PUT, path, token).json(body);
        self.send(Method::PUT, path, request).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<ApiResponse, ClientError> {
        self.send(Method::DELETE, path, self.request(Method::DELETE, path, token))
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(%method, path, status = status.as_u16(), bytes = bytes.len(), "API response");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
                path: path.to_string(),
                source,
            })?
        };

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_building() {
        let client = ApiClient::new("http://localhost:1337/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1337");
        assert_eq!(
            client.url(&event_path(&EventId::from(7))),
            "http://localhost:1337/api/events/7"
        );
        assert_eq!(
            client.url(&event_path(&EventId::from("5f1a"))),
            "http://localhost:1337/api/events/5f1a"
        );
    }

    #[test]
    fn success_markers() {
        let ok = ApiResponse {
            status: StatusCode::OK,
            body: json!({ "jwt": "T1", "id": 7 }),
        };
        assert_eq!(ok.str_field("jwt"), Some("T1"));
        assert!(ok.has_id());

        let rejected = ApiResponse {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "jwt": "", "id": null }),
        };
        assert_eq!(rejected.str_field("jwt"), None);
        assert!(!rejected.has_id());
    }
}
