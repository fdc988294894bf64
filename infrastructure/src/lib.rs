//! Infrastructure layer for agent-quorum
//!
//! This crate contains adapters that implement the ports defined in
//! the application layer: the HTTP transport, the default answer
//! normalizers, and configuration file loading.

pub mod config;
pub mod http;
pub mod normalize;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileEndpoint, FileQuorumConfig, FileServiceConfig};
pub use http::HttpAgentTransport;
pub use normalize::{CanonicalJsonNormalizer, PayloadFieldNormalizer};
