use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{Transport, TransportError, TransportRequest, TransportResponse, TransportResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default transport: JSON POST over HTTPS
#[derive(Clone)]
pub struct HttpTransport {
    pub(crate) client: Client,
    pub(crate) timeout_secs: u64,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(timeout_secs: u64) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> TransportResult<TransportResponse> {
        let mut builder = self.client.post(&request.uri);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(format!(
                        "Search request timed out after {} seconds",
                        self.timeout_secs
                    ))
                } else if e.is_connect() {
                    TransportError::Connect(format!("Failed to connect to search service: {}", e))
                } else {
                    TransportError::Request(format!("Search request failed: {}", e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(format!("Failed to read response body: {}", e)))?;

        debug!(
            uri = %request.uri,
            status = status,
            response_length = body.len(),
            "Search service responded"
        );

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new(10);
        assert!(transport.is_ok());
        assert_eq!(transport.unwrap().timeout_secs, 10);
    }
}
