//! Per-agent replies and their normalized answers

use crate::endpoint::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Canonical comparable projection of a successful reply payload.
///
/// Produced by the caller-supplied normalizer; the resolver only ever
/// compares these for equality, so "what counts as the same answer" is
/// entirely the normalizer's policy. Typically a digest or canonical
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedAnswer(String);

impl NormalizedAnswer {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build an answer from raw digest bytes, lowercase hex encoded.
    pub fn from_digest(bytes: &[u8]) -> Self {
        use std::fmt::Write;

        let mut hex = String::with_capacity(bytes.len() * 2);
        for byte in bytes {
            // infallible for String
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a per-agent call failed.
///
/// Transport and normalization failures are equivalent for quorum
/// purposes (non-support) but tagged distinctly for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Per-call timeout elapsed before the agent answered
    Timeout,
    /// Connection-level failure (refused, DNS, reset, cancelled)
    Connection,
    /// Body could not be decoded or normalized to a comparable value
    Malformed,
    /// Agent answered with an application-level error
    Application,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connection => write!(f, "connection"),
            FailureKind::Malformed => write!(f, "malformed"),
            FailureKind::Application => write!(f, "application"),
        }
    }
}

/// How one agent's call settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOutcome {
    /// Agent answered and the payload normalized cleanly
    Success {
        payload: Value,
        answer: NormalizedAnswer,
    },
    /// Call failed; the agent contributes no support
    Failure { kind: FailureKind, detail: String },
}

/// One endpoint's settled outcome for one dispatcher pass.
///
/// Created as calls settle (succeed, fail, or time out) and never
/// mutated afterwards. At most one reply per endpoint enters a result
/// set; later arrivals are discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub agent: AgentId,
    /// Wall time from dispatch to settlement
    pub latency: Duration,
    pub outcome: ReplyOutcome,
}

impl AgentReply {
    pub fn success(
        agent: impl Into<AgentId>,
        payload: Value,
        answer: NormalizedAnswer,
        latency: Duration,
    ) -> Self {
        Self {
            agent: agent.into(),
            latency,
            outcome: ReplyOutcome::Success { payload, answer },
        }
    }

    pub fn failure(
        agent: impl Into<AgentId>,
        kind: FailureKind,
        detail: impl Into<String>,
        latency: Duration,
    ) -> Self {
        Self {
            agent: agent.into(),
            latency,
            outcome: ReplyOutcome::Failure {
                kind,
                detail: detail.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ReplyOutcome::Success { .. })
    }

    /// The normalized answer, if this reply succeeded.
    pub fn answer(&self) -> Option<&NormalizedAnswer> {
        match &self.outcome {
            ReplyOutcome::Success { answer, .. } => Some(answer),
            ReplyOutcome::Failure { .. } => None,
        }
    }

    /// The raw payload, if this reply succeeded.
    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            ReplyOutcome::Success { payload, .. } => Some(payload),
            ReplyOutcome::Failure { .. } => None,
        }
    }

    /// The failure kind, if this reply failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            ReplyOutcome::Failure { kind, .. } => Some(*kind),
            ReplyOutcome::Success { .. } => None,
        }
    }
}
