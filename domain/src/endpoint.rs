//! Agent endpoints and the declared fault model
//!
//! An [`EndpointSet`] is the unit a query session operates on: an
//! ordered, immutable collection of agent endpoints plus the
//! [`FaultTolerance`] declared for the service. Membership is fixed for
//! the duration of a session; concurrent sessions can share the same
//! set (wrap it in an `Arc`) because nothing here is mutated during
//! resolution.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Stable identity of one agent in the service.
///
/// # Example
///
/// ```
/// use agentq_domain::AgentId;
///
/// let id: AgentId = "agent-0".parse().unwrap();
/// assert_eq!(id.as_str(), "agent-0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AgentId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ConfigError::EmptyAgentId);
        }
        Ok(Self(s.trim().to_string()))
    }
}

/// One agent endpoint: identity, address, and advisory reachability
/// metadata.
///
/// The metadata is append-only history (last observed latency, last
/// observed failure). It is never consulted by the resolver and never
/// required for correctness of a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEndpoint {
    /// Stable agent identity
    pub id: AgentId,
    /// Address the transport dials (e.g., an HTTP URL)
    pub address: String,
    /// Last observed round-trip latency, if any
    pub last_latency: Option<Duration>,
    /// Last observed failure description, if any
    pub last_failure: Option<String>,
}

impl AgentEndpoint {
    pub fn new(id: impl Into<AgentId>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            last_latency: None,
            last_failure: None,
        }
    }

    pub fn with_last_latency(mut self, latency: Duration) -> Self {
        self.last_latency = Some(latency);
        self
    }

    pub fn with_last_failure(mut self, failure: impl Into<String>) -> Self {
        self.last_failure = Some(failure.into());
        self
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        AgentId::new(s)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        AgentId::new(s)
    }
}

/// Declared fault tolerance for a service of N agents.
///
/// `max_faulty` (F) is the number of agents assumed to be offline, slow,
/// or adversarial. The quorum threshold T defaults to `N - F`; an
/// explicit threshold can override that, but it still has to pass
/// [`validate`](Self::validate).
///
/// # Example
///
/// ```
/// use agentq_domain::FaultTolerance;
///
/// let tolerance = FaultTolerance::new(4, 1);
/// assert!(tolerance.validate().is_ok());
/// assert_eq!(tolerance.threshold(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultTolerance {
    /// Total number of agents (N)
    pub total: usize,
    /// Assumed maximum number of faulty agents (F)
    pub max_faulty: usize,
    /// Explicit threshold override (T); defaults to N - F when absent
    pub threshold: Option<usize>,
}

impl FaultTolerance {
    pub fn new(total: usize, max_faulty: usize) -> Self {
        Self {
            total,
            max_faulty,
            threshold: None,
        }
    }

    /// Override the default `N - F` threshold.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// The quorum threshold T: minimum agreeing replies to accept.
    pub fn threshold(&self) -> usize {
        self.threshold.unwrap_or(self.total - self.max_faulty)
    }

    /// Check the fault model for consistency.
    ///
    /// Fails on N = 0, F >= N, T = 0, or T > N. Callers must validate
    /// before dispatching; a bad model is a fatal error, not something
    /// to clamp.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total == 0 {
            return Err(ConfigError::NoAgents);
        }
        if self.max_faulty >= self.total {
            return Err(ConfigError::TooManyFaulty {
                total: self.total,
                max_faulty: self.max_faulty,
            });
        }
        let threshold = self.threshold();
        if threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if threshold > self.total {
            return Err(ConfigError::ThresholdTooHigh {
                threshold,
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Ordered, immutable collection of agent endpoints plus the declared
/// fault tolerance. Validated at construction: the fault model must be
/// consistent, the declared total must match the endpoint count, and
/// agent ids must be unique (so no endpoint can ever contribute more
/// than one unit of support).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSet {
    endpoints: Vec<AgentEndpoint>,
    tolerance: FaultTolerance,
}

impl EndpointSet {
    pub fn new(
        endpoints: Vec<AgentEndpoint>,
        tolerance: FaultTolerance,
    ) -> Result<Self, ConfigError> {
        tolerance.validate()?;
        if tolerance.total != endpoints.len() {
            return Err(ConfigError::AgentCountMismatch {
                declared: tolerance.total,
                actual: endpoints.len(),
            });
        }
        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            if !seen.insert(&endpoint.id) {
                return Err(ConfigError::DuplicateAgent(endpoint.id.clone()));
            }
        }
        Ok(Self {
            endpoints,
            tolerance,
        })
    }

    /// Build a set with the default fault model `T = N - F`.
    pub fn with_max_faulty(
        endpoints: Vec<AgentEndpoint>,
        max_faulty: usize,
    ) -> Result<Self, ConfigError> {
        let tolerance = FaultTolerance::new(endpoints.len(), max_faulty);
        Self::new(endpoints, tolerance)
    }

    pub fn endpoints(&self) -> &[AgentEndpoint] {
        &self.endpoints
    }

    pub fn tolerance(&self) -> &FaultTolerance {
        &self.tolerance
    }

    /// The quorum threshold T for this set.
    pub fn threshold(&self) -> usize {
        self.tolerance.threshold()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentEndpoint> {
        self.endpoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(n: usize) -> Vec<AgentEndpoint> {
        (0..n)
            .map(|i| AgentEndpoint::new(format!("agent-{i}"), format!("http://agent-{i}:8000")))
            .collect()
    }

    #[test]
    fn test_default_threshold_is_n_minus_f() {
        let tolerance = FaultTolerance::new(4, 1);
        assert_eq!(tolerance.threshold(), 3);

        let tolerance = FaultTolerance::new(7, 2);
        assert_eq!(tolerance.threshold(), 5);
    }

    #[test]
    fn test_explicit_threshold_override() {
        let tolerance = FaultTolerance::new(5, 1).with_threshold(4);
        assert_eq!(tolerance.threshold(), 4);
        assert!(tolerance.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_agents() {
        assert_eq!(
            FaultTolerance::new(0, 0).validate(),
            Err(ConfigError::NoAgents)
        );
    }

    #[test]
    fn test_validate_rejects_f_not_below_n() {
        assert_eq!(
            FaultTolerance::new(3, 3).validate(),
            Err(ConfigError::TooManyFaulty {
                total: 3,
                max_faulty: 3
            })
        );
        assert!(FaultTolerance::new(3, 2).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_threshold_above_n() {
        let tolerance = FaultTolerance::new(4, 1).with_threshold(5);
        assert_eq!(
            tolerance.validate(),
            Err(ConfigError::ThresholdTooHigh {
                threshold: 5,
                total: 4
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let tolerance = FaultTolerance::new(4, 1).with_threshold(0);
        assert_eq!(tolerance.validate(), Err(ConfigError::ZeroThreshold));
    }

    #[test]
    fn test_endpoint_set_rejects_duplicate_ids() {
        let mut eps = endpoints(3);
        eps[2].id = AgentId::new("agent-0");
        let result = EndpointSet::with_max_faulty(eps, 1);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateAgent(AgentId::new("agent-0"))
        );
    }

    #[test]
    fn test_endpoint_set_rejects_count_mismatch() {
        let result = EndpointSet::new(endpoints(3), FaultTolerance::new(4, 1));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::AgentCountMismatch {
                declared: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_endpoint_set_preserves_order() {
        let set = EndpointSet::with_max_faulty(endpoints(4), 1).unwrap();
        let ids: Vec<_> = set.iter().map(|e| e.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["agent-0", "agent-1", "agent-2", "agent-3"]);
        assert_eq!(set.threshold(), 3);
    }

    #[test]
    fn test_agent_id_parse_rejects_empty() {
        assert!("".parse::<AgentId>().is_err());
        assert!("  ".parse::<AgentId>().is_err());
        assert!("agent-1".parse::<AgentId>().is_ok());
    }

    #[test]
    fn test_endpoint_metadata_is_advisory() {
        let endpoint = AgentEndpoint::new("a", "http://a:8000")
            .with_last_latency(Duration::from_millis(120))
            .with_last_failure("connection refused");
        assert_eq!(endpoint.last_latency, Some(Duration::from_millis(120)));
        assert_eq!(endpoint.last_failure.as_deref(), Some("connection refused"));
    }
}
