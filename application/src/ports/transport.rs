//! Agent transport port
//!
//! Defines how the application layer reaches one agent endpoint.
//! Implementations (HTTP or other RPC transports) live in the
//! infrastructure layer; the dispatcher adds the per-call timeout on
//! top, so implementations do not need their own deadline handling.

use agentq_domain::{AgentEndpoint, FailureKind, QueryRequest};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors a transport call can settle with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("http status {code}: {detail}")]
    Status { code: u16, detail: String },

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("request timed out")]
    Timeout,
}

impl TransportError {
    /// Map a transport failure onto the per-agent failure taxonomy.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            TransportError::Connection(_) => FailureKind::Connection,
            TransportError::Status { .. } => FailureKind::Application,
            TransportError::InvalidBody(_) => FailureKind::Malformed,
            TransportError::Timeout => FailureKind::Timeout,
        }
    }
}

/// Capability to send one request to one agent endpoint.
///
/// Calls must be independent: the failure or slowness of one endpoint
/// must never affect another. Implementations are shared read-only
/// across concurrent sessions.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Send the request to one endpoint and return its decoded body.
    async fn send(
        &self,
        endpoint: &AgentEndpoint,
        request: &QueryRequest,
    ) -> Result<Value, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_mapping() {
        assert_eq!(
            TransportError::Connection("refused".into()).failure_kind(),
            FailureKind::Connection
        );
        assert_eq!(
            TransportError::Status {
                code: 500,
                detail: "internal".into()
            }
            .failure_kind(),
            FailureKind::Application
        );
        assert_eq!(
            TransportError::InvalidBody("not json".into()).failure_kind(),
            FailureKind::Malformed
        );
        assert_eq!(TransportError::Timeout.failure_kind(), FailureKind::Timeout);
    }
}
