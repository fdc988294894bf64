//! Domain layer for agent-quorum
//!
//! This crate contains the core model of a quorum-read client: agent
//! endpoints with their declared fault tolerance, per-agent replies, and
//! the resolution algorithm that decides whether a supermajority of
//! agents agree on an answer.
//!
//! It has no dependencies on transport or presentation concerns. The
//! resolver is a pure function over settled replies; everything async
//! lives in the application layer.

pub mod core;
pub mod endpoint;
pub mod quorum;

// Re-export commonly used types
pub use crate::core::error::ConfigError;
pub use endpoint::{AgentEndpoint, AgentId, EndpointSet, FaultTolerance};
pub use quorum::{
    group::{ResponseGroup, group_replies},
    reply::{AgentReply, FailureKind, NormalizedAnswer, ReplyOutcome},
    request::QueryRequest,
    resolver::resolve_replies,
    verdict::QuorumVerdict,
};
