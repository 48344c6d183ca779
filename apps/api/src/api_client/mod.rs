//! API client: the single point of entry for all upstream HTTP calls.
//!
//! No other module builds `reqwest` requests. Every request carries the bearer
//! token stored under `lb_token`, read fresh per request so a token change is
//! picked up without rebuilding the client.
//!
//! No retry policy: a failed call is terminal and the call site decides what
//! to do with it (see `outcome`).
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{multipart::Form, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, TOKEN_KEY};

pub mod outcome;

/// Message shown when the upstream gives no usable error text.
pub const GENERIC_FAILURE: &str = "Request failed. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Cannot connect to service: {0}")]
    Connect(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Connect(e.to_string())
        } else {
            ApiError::Http(e)
        }
    }
}

impl ApiError {
    /// Server-reported messages are shown verbatim; everything else is generic.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } | ApiError::Rejected(message) => message.clone(),
            ApiError::Timeout | ApiError::Connect(_) => {
                "Service unavailable. Please try again later.".to_string()
            }
            ApiError::Http(_) | ApiError::Parse(_) => GENERIC_FAILURE.to_string(),
        }
    }

    /// True for transport-level failures (nothing reached a server handler).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout | ApiError::Connect(_) | ApiError::Http(_)
        )
    }
}

/// The `{success, data, error}` envelope used by the backend.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Rejected(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Rejected("Response did not include data".to_string()))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attaches `Authorization: Bearer <lb_token>` when a token is stored.
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.get(TOKEN_KEY).await {
            Ok(Some(token)) if !token.trim().is_empty() => request.bearer_auth(token.trim()),
            Ok(_) => request,
            Err(e) => {
                warn!("Could not read session token, sending request unauthenticated: {e}");
                request
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).await.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("{GENERIC_FAILURE} (status {})", status.as_u16()));
            debug!("Upstream returned {status}: {body}");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(ApiError::Parse)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self.send(self.client.get(&url).query(query)).await?;
        Self::read_json(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("POST {url}");
        let response = self.send(self.client.post(&url).json(body)).await?;
        Self::read_json(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("POST (multipart) {url}");
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        Self::read_json(response).await
    }

    pub async fn get_bytes(&self, path: &str, query: &[(&str, String)]) -> Result<Bytes, ApiError> {
        let url = self.url(path);
        debug!("GET (binary) {url}");
        let response = self.send(self.client.get(&url).query(query)).await?;
        Ok(response.bytes().await?)
    }
}

/// Pulls a human-readable message out of an error body:
/// `{"error": "..."}`, `{"message": "..."}` or `{"error": {"message": "..."}}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = match value.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
    .or_else(|| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    })?;

    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}


#[cfg(test)]
mod tests {
    use super::test_support::{dead_upstream, spawn_upstream};
    use super::*;
    use crate::storage::MemoryStore;
    use axum::{http::HeaderMap, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    fn client(base: &str, store: Arc<MemoryStore>) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5), store).unwrap()
    }

    #[test]
    fn test_extract_error_message_string_field() {
        let body = r#"{"success": false, "error": "Skills array is required"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Skills array is required")
        );
    }

    #[test]
    fn test_extract_error_message_nested() {
        let body = r#"{"error": {"code": "X", "message": "nested"}}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("nested"));
    }

    #[test]
    fn test_extract_error_message_non_json() {
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(r#"{"error": "  "}"#), None);
    }

    #[test]
    fn test_envelope_rejected_carries_message() {
        let env: Envelope<Value> =
            serde_json::from_value(json!({"success": false, "error": "Analysis failed"})).unwrap();
        let err = env.into_data().unwrap_err();
        assert_eq!(err.user_message(), "Analysis failed");
    }

    #[test]
    fn test_envelope_without_success_flag_uses_data() {
        let env: Envelope<u32> = serde_json::from_value(json!({"data": 7})).unwrap();
        assert_eq!(env.into_data().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_stored() {
        let router = Router::new().route(
            "/echo",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Json(json!({ "auth": auth }))
            }),
        );
        let base = spawn_upstream(router).await;
        let store = Arc::new(MemoryStore::new());
        let api = client(&base, store.clone());

        let before: Value = api.get_json("/echo", &[]).await.unwrap();
        assert_eq!(before["auth"], "");

        store.set(TOKEN_KEY, "secret-token").await.unwrap();
        let after: Value = api.get_json("/echo", &[]).await.unwrap();
        assert_eq!(after["auth"], "Bearer secret-token");
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced_verbatim() {
        let router = Router::new().route(
            "/fail",
            get(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"success": false, "error": "Resume text is required"})),
                )
            }),
        );
        let base = spawn_upstream(router).await;
        let api = client(&base, Arc::new(MemoryStore::new()));

        let err = api.get_json::<Value>("fail", &[]).await.unwrap_err();
        match &err {
            ApiError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message, "Resume text is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "Resume text is required");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let base = dead_upstream().await;
        let api = client(&base, Arc::new(MemoryStore::new()));
        let err = api.get_json::<Value>("/anything", &[]).await.unwrap_err();
        assert!(err.is_transport(), "expected transport error, got {err:?}");
    }
}
