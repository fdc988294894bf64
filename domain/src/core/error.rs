//! Domain error types

use crate::endpoint::AgentId;
use thiserror::Error;

/// Fatal configuration errors.
///
/// These are raised while constructing an [`EndpointSet`] or validating
/// its [`FaultTolerance`], always before any network activity. A
/// misconfigured fault model is never silently clamped.
///
/// [`EndpointSet`]: crate::endpoint::EndpointSet
/// [`FaultTolerance`]: crate::endpoint::FaultTolerance
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("endpoint set is empty")]
    NoAgents,

    #[error("assumed faulty count {max_faulty} must be less than total agents {total}")]
    TooManyFaulty { total: usize, max_faulty: usize },

    #[error("quorum threshold {threshold} exceeds total agents {total}")]
    ThresholdTooHigh { threshold: usize, total: usize },

    #[error("quorum threshold must be at least 1")]
    ZeroThreshold,

    #[error("duplicate agent id: {0}")]
    DuplicateAgent(AgentId),

    #[error("fault tolerance declared for {declared} agents but endpoint set has {actual}")]
    AgentCountMismatch { declared: usize, actual: usize },

    #[error("agent id must not be empty")]
    EmptyAgentId,
}
