//! Quorum verdict - the final typed outcome of one query session

use super::group::ResponseGroup;
use super::reply::NormalizedAnswer;
use crate::endpoint::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of one quorum resolution.
///
/// A session produces exactly one verdict per request; it is never
/// partially constructed. `Rejected` and `Insufficient` are ordinary,
/// expected outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum QuorumVerdict {
    /// A strict-maximum group reached the threshold
    Accepted {
        answer: NormalizedAnswer,
        /// Representative raw payload of the winning group
        payload: Value,
        /// Exactly the agents that supported the winning answer
        supporters: Vec<AgentId>,
    },
    /// Two or more groups tied at the maximum with support at or above
    /// the threshold: unresolved disagreement
    Rejected { groups: Vec<ResponseGroup> },
    /// No group reached the threshold
    Insufficient {
        /// Distinct agents that replied successfully
        successful: usize,
        /// The configured quorum threshold
        required: usize,
        reason: String,
    },
}

impl QuorumVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, QuorumVerdict::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, QuorumVerdict::Rejected { .. })
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, QuorumVerdict::Insufficient { .. })
    }

    /// Supporting agent ids for an accepted verdict.
    pub fn supporters(&self) -> Option<&[AgentId]> {
        match self {
            QuorumVerdict::Accepted { supporters, .. } => Some(supporters),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuorumVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuorumVerdict::Accepted { supporters, .. } => {
                write!(f, "accepted ({} supporters)", supporters.len())
            }
            QuorumVerdict::Rejected { groups } => {
                write!(f, "rejected ({} conflicting groups)", groups.len())
            }
            QuorumVerdict::Insufficient {
                successful,
                required,
                ..
            } => {
                write!(f, "insufficient ({successful}/{required} successful)")
            }
        }
    }
}
