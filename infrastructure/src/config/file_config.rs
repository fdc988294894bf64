//! Configuration file schema (`agent-quorum.toml`)
//!
//! Example configuration:
//!
//! ```toml
//! [service]
//! endpoints = [
//!     { id = "agent-0", url = "http://agent-0:8000/state" },
//!     { id = "agent-1", url = "http://agent-1:8000/state" },
//!     { id = "agent-2", url = "http://agent-2:8000/state" },
//!     { id = "agent-3", url = "http://agent-3:8000/state" },
//! ]
//!
//! [quorum]
//! max_faulty = 1
//! # threshold = 3        # defaults to N - max_faulty
//! timeout_ms = 10000
//! retry_budget = 1
//! early_exit = true
//! ```

use agentq_application::config::DispatchOptions;
use agentq_domain::{AgentEndpoint, ConfigError, EndpointSet, FaultTolerance, QueryRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// One agent endpoint from the `[service]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEndpoint {
    pub id: String,
    pub url: String,
}

/// The `[service]` section: which agents make up the service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    pub endpoints: Vec<FileEndpoint>,
}

/// The `[quorum]` section: fault model and dispatch knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQuorumConfig {
    /// Assumed maximum number of faulty agents (F)
    pub max_faulty: usize,
    /// Explicit threshold override; defaults to N - F
    pub threshold: Option<usize>,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
    /// Additional dispatcher passes after an insufficient outcome
    pub retry_budget: usize,
    /// Cancel outstanding calls once the verdict is mathematically decided
    pub early_exit: bool,
}

impl Default for FileQuorumConfig {
    fn default() -> Self {
        Self {
            max_faulty: 0,
            threshold: None,
            timeout_ms: 10_000,
            retry_budget: 1,
            early_exit: true,
        }
    }
}

/// Root configuration file schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub service: FileServiceConfig,
    pub quorum: FileQuorumConfig,
}

impl FileConfig {
    /// Build the validated endpoint set. Fails fast on an inconsistent
    /// fault model, duplicate agent ids, or an empty endpoint list.
    pub fn endpoint_set(&self) -> Result<EndpointSet, ConfigError> {
        let endpoints: Vec<AgentEndpoint> = self
            .service
            .endpoints
            .iter()
            .map(|e| AgentEndpoint::new(e.id.as_str(), e.url.as_str()))
            .collect();
        let mut tolerance = FaultTolerance::new(endpoints.len(), self.quorum.max_faulty);
        if let Some(threshold) = self.quorum.threshold {
            tolerance = tolerance.with_threshold(threshold);
        }
        EndpointSet::new(endpoints, tolerance)
    }

    /// Build a request with the configured timeout and retry budget.
    pub fn request(&self, payload: Value) -> QueryRequest {
        QueryRequest::new(payload)
            .with_timeout(Duration::from_millis(self.quorum.timeout_ms))
            .with_retry_budget(self.quorum.retry_budget)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            early_exit: self.quorum.early_exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert!(config.service.endpoints.is_empty());
        assert_eq!(config.quorum.max_faulty, 0);
        assert_eq!(config.quorum.timeout_ms, 10_000);
        assert_eq!(config.quorum.retry_budget, 1);
        assert!(config.quorum.early_exit);
    }

    #[test]
    fn test_parse_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            [service]
            endpoints = [
                { id = "agent-0", url = "http://agent-0:8000/state" },
                { id = "agent-1", url = "http://agent-1:8000/state" },
                { id = "agent-2", url = "http://agent-2:8000/state" },
                { id = "agent-3", url = "http://agent-3:8000/state" },
            ]

            [quorum]
            max_faulty = 1
            timeout_ms = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.service.endpoints.len(), 4);
        assert_eq!(config.quorum.max_faulty, 1);
        assert_eq!(config.quorum.timeout_ms, 2500);

        let set = config.endpoint_set().unwrap();
        assert_eq!(set.threshold(), 3);

        let request = config.request(json!(null));
        assert_eq!(request.timeout, Duration::from_millis(2500));
        assert_eq!(request.retry_budget, 1);
    }

    #[test]
    fn test_inconsistent_fault_model_fails() {
        let config: FileConfig = toml::from_str(
            r#"
            [service]
            endpoints = [{ id = "a", url = "http://a/state" }]

            [quorum]
            max_faulty = 1
            "#,
        )
        .unwrap();

        assert_eq!(
            config.endpoint_set().unwrap_err(),
            ConfigError::TooManyFaulty {
                total: 1,
                max_faulty: 1
            }
        );
    }

    #[test]
    fn test_explicit_threshold() {
        let config: FileConfig = toml::from_str(
            r#"
            [service]
            endpoints = [
                { id = "a", url = "http://a/state" },
                { id = "b", url = "http://b/state" },
                { id = "c", url = "http://c/state" },
            ]

            [quorum]
            max_faulty = 1
            threshold = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint_set().unwrap().threshold(), 3);
    }
}
