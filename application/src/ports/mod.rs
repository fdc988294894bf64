//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters and callers
//! must implement.

pub mod normalizer;
pub mod transport;
