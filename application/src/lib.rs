//! Application layer for agent-quorum
//!
//! This crate contains the concurrent machinery around the domain
//! resolver: the ports external adapters implement (transport,
//! normalizer), the dispatcher that fans one request out to every
//! agent endpoint, and the query session use case that owns retry
//! policy. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DispatchOptions;
pub use ports::{
    normalizer::{AnswerNormalizer, NormalizeError},
    transport::{AgentTransport, TransportError},
};
pub use use_cases::dispatch::Dispatcher;
pub use use_cases::query_session::{
    QuerySessionInput, QuerySessionUseCase, SessionError, resolve,
};
