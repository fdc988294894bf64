//! Dispatch options - application-layer knobs for a dispatcher pass.
//!
//! These control how a pass runs, not what counts as agreement; the
//! quorum threshold itself lives with the domain's
//! [`FaultTolerance`](agentq_domain::FaultTolerance).

use serde::{Deserialize, Serialize};

/// Options controlling one dispatcher pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOptions {
    /// Cancel outstanding calls once the leading group's support has
    /// reached the threshold and no combination of outstanding replies
    /// could change the winner. Never changes the verdict versus
    /// waiting for all replies.
    pub early_exit: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self { early_exit: true }
    }
}

impl DispatchOptions {
    pub fn without_early_exit(mut self) -> Self {
        self.early_exit = false;
        self
    }
}
