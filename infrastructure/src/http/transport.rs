//! HTTP implementation of [`AgentTransport`]
//!
//! Each agent exposes its service state over HTTP. A null request
//! payload is a plain GET of the endpoint address; a non-null payload
//! is POSTed as a JSON body. Either way the response body is decoded
//! as JSON. The per-call deadline is enforced by the dispatcher, so
//! the client here carries no timeout of its own.

use agentq_application::ports::transport::{AgentTransport, TransportError};
use agentq_domain::{AgentEndpoint, QueryRequest};
use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

const USER_AGENT: &str = concat!("agent-quorum/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed agent transport.
///
/// The inner client holds the connection pool and is shared read-only
/// across concurrent sessions.
pub struct HttpAgentTransport {
    client: reqwest::Client,
}

impl HttpAgentTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a caller-configured client (proxies, TLS settings, pools).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpAgentTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentTransport for HttpAgentTransport {
    async fn send(
        &self,
        endpoint: &AgentEndpoint,
        request: &QueryRequest,
    ) -> Result<Value, TransportError> {
        trace!(agent = %endpoint.id, address = %endpoint.address, "sending request");

        let builder = if request.payload.is_null() {
            self.client.get(&endpoint.address)
        } else {
            self.client.post(&endpoint.address).json(&request.payload)
        };
        let response = builder
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                detail: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_connection_error() {
        // Port 1 on loopback is never listening; the connect fails fast.
        let transport = HttpAgentTransport::new();
        let endpoint = AgentEndpoint::new("a", "http://127.0.0.1:1/state");

        let result = transport.send(&endpoint, &QueryRequest::default()).await;

        match result {
            Err(TransportError::Connection(_)) => {}
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_null_payload_takes_the_post_path() {
        let transport = HttpAgentTransport::new();
        let endpoint = AgentEndpoint::new("a", "http://127.0.0.1:1/state");
        let request = QueryRequest::new(serde_json::json!({ "query": "state" }));

        // The POST with a JSON body still fails at connect, not while
        // building the request.
        let result = transport.send(&endpoint, &request).await;

        match result {
            Err(TransportError::Connection(_)) => {}
            other => panic!("expected connection error, got {other:?}"),
        }
    }
}
