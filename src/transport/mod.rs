//! Transport seam between the store and the remote search service.
//!
//! The store never talks HTTP directly. It hands a [`TransportRequest`] to a
//! [`Transport`] and gets a status plus body back. [`HttpTransport`] is the
//! default; a `SearchConfig` may carry replacement transports for the search
//! and suggest paths, and [`from_fn`] adapts a plain async closure.

mod error;
mod http;

pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, DEFAULT_TIMEOUT_SECS};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;

use crate::models::SearchState;

/// Fixed user agent sent on every request
pub const USER_AGENT: &str = "FacetedSearchStore/Preview";

/// Headers sent with every request for the given query key
pub fn request_headers(query_key: &str) -> Vec<(String, String)> {
    vec![
        ("api-key".to_string(), query_key.to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("x-ms-client-user-agent".to_string(), USER_AGENT.to_string()),
    ]
}

/// A fully shaped request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
    /// Snapshot the request was planned from
    pub state: Arc<SearchState>,
}

/// Raw response: status code plus undecoded body
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 200 response carrying `body` serialized as JSON
    pub fn ok_json(body: &serde_json::Value) -> Self {
        Self::new(200, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body, treating non-success statuses as errors
    pub fn json<T: DeserializeOwned>(&self) -> TransportResult<T> {
        if !self.is_success() {
            return Err(TransportError::Status {
                status: self.status,
                body: if self.body.is_empty() {
                    "No response body".to_string()
                } else {
                    self.body.clone()
                },
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Executes requests against the search service
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> TransportResult<TransportResponse>;
}

/// Transport backed by an async closure receiving the planned-from state and
/// the request body
pub struct FnTransport<F> {
    handler: F,
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(Arc<SearchState>, serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TransportResult<TransportResponse>> + Send + 'static,
{
    async fn execute(&self, request: TransportRequest) -> TransportResult<TransportResponse> {
        (self.handler)(request.state, request.body).await
    }
}

/// Wrap an async closure as a shareable transport
pub fn from_fn<F, Fut>(handler: F) -> Arc<dyn Transport>
where
    F: Fn(Arc<SearchState>, serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TransportResult<TransportResponse>> + Send + 'static,
{
    Arc::new(FnTransport { handler })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchResponseBody;
    use serde_json::json;

    #[test]
    fn test_request_headers() {
        let headers = request_headers("K");
        assert_eq!(headers.len(), 4);
        assert!(headers.contains(&("api-key".to_string(), "K".to_string())));
        assert!(headers.contains(&("User-Agent".to_string(), USER_AGENT.to_string())));
        assert!(headers.contains(&(
            "x-ms-client-user-agent".to_string(),
            USER_AGENT.to_string()
        )));
    }

    #[test]
    fn test_response_json() {
        let response =
            TransportResponse::ok_json(&json!({"value": [{"id": 1}], "@odata.count": 1}));
        let body: SearchResponseBody = response.json().unwrap();
        assert_eq!(body.count, Some(1));
    }

    #[test]
    fn test_response_status_error() {
        let response = TransportResponse::new(503, "");
        let err = response.json::<SearchResponseBody>().unwrap_err();
        assert_eq!(
            err,
            TransportError::Status {
                status: 503,
                body: "No response body".to_string()
            }
        );
    }

    #[test]
    fn test_response_malformed_json() {
        let response = TransportResponse::new(200, "{not json");
        let err = response.json::<SearchResponseBody>().unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fn_transport_receives_body() {
        let transport = from_fn(|_state, body| async move {
            Ok(TransportResponse::ok_json(&json!({ "echo": body["search"] })))
        });

        let response = transport
            .execute(TransportRequest {
                uri: "unused".to_string(),
                headers: Vec::new(),
                body: json!({"search": "hello"}),
                state: Arc::new(SearchState::default()),
            })
            .await
            .unwrap();

        let echoed: serde_json::Value = response.json().unwrap();
        assert_eq!(echoed["echo"], "hello");
    }
}
