//! HTTP adapter for the agent transport port

pub mod transport;

pub use transport::HttpAgentTransport;
