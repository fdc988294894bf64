//! Query request - the logical request a session fans out
//!
//! A [`QueryRequest`] is immutable once a session starts: every
//! dispatcher pass (including retry passes) reuses the same payload, so
//! the underlying agent call must be safe to repeat.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default per-call timeout applied to each agent call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of additional dispatcher passes after an
/// `Insufficient` outcome.
pub const DEFAULT_RETRY_BUDGET: usize = 1;

/// The logical request payload plus per-call timeout and retry budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Application payload forwarded to every agent
    pub payload: Value,
    /// Per-call timeout; exceeding it settles the call as a timeout
    pub timeout: Duration,
    /// Additional dispatcher passes allowed after an insufficient pass
    pub retry_budget: usize,
}

impl QueryRequest {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            timeout: DEFAULT_TIMEOUT,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_budget(mut self, retry_budget: usize) -> Self {
        self.retry_budget = retry_budget;
        self
    }
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let request = QueryRequest::default();
        assert_eq!(request.payload, Value::Null);
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
        assert_eq!(request.retry_budget, DEFAULT_RETRY_BUDGET);
    }

    #[test]
    fn test_builders() {
        let request = QueryRequest::new(json!({"query": "state"}))
            .with_timeout(Duration::from_millis(500))
            .with_retry_budget(3);
        assert_eq!(request.timeout, Duration::from_millis(500));
        assert_eq!(request.retry_budget, 3);
        assert_eq!(request.payload["query"], "state");
    }
}
