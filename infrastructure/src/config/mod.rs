//! Configuration loading for agent-quorum

pub mod file_config;
pub mod loader;

pub use file_config::{FileConfig, FileEndpoint, FileQuorumConfig, FileServiceConfig};
pub use loader::ConfigLoader;
