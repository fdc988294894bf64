//! Quorum resolution domain
//!
//! The client-side view of multi-agent agreement: each agent's settled
//! reply is reduced to a canonical [`NormalizedAnswer`], replies are
//! partitioned into [`ResponseGroup`]s by answer equality, and
//! [`resolve_replies`] decides whether the largest group constitutes a
//! supermajority.
//!
//! The resolver is deliberately order-independent: permuting the
//! endpoint list never changes the verdict, and a tie at the top is
//! surfaced as disagreement rather than broken by arrival order.
//!
//! [`NormalizedAnswer`]: reply::NormalizedAnswer
//! [`ResponseGroup`]: group::ResponseGroup
//! [`resolve_replies`]: resolver::resolve_replies

pub mod group;
pub mod reply;
pub mod request;
pub mod resolver;
pub mod verdict;

// Re-export main types
pub use group::{ResponseGroup, group_replies};
pub use reply::{AgentReply, FailureKind, NormalizedAnswer, ReplyOutcome};
pub use request::QueryRequest;
pub use resolver::resolve_replies;
pub use verdict::QuorumVerdict;
