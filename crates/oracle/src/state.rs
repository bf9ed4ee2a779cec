//! Shared mutable state for the oracle, injected wherever it is needed.

use crate::depth::DepthTracker;
use crate::feedback::FeedbackStore;

/// Process-lifetime stores. Held behind an `Arc`; each store locks itself.
#[derive(Debug, Default)]
pub struct OracleState {
    pub feedback: FeedbackStore,
    pub depth: DepthTracker,
}

impl OracleState {
    pub fn new() -> Self {
        Self::default()
    }
}
