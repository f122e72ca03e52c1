//! Cooperative Resource Limits.
//!
//! Every worklist-draining step calls [`ResourceLimit::inc`]; once the step
//! budget is exhausted or the shared cancel flag is raised, all in-progress
//! loops unwind to `check`'s return with an unknown result. Clauses already
//! added to the Boolean skeleton persist across the unwind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Step budget plus an externally shared cancellation flag.
#[derive(Debug)]
pub struct ResourceLimit {
    max_steps: u64,
    steps: u64,
    cancel: Arc<AtomicBool>,
}

impl ResourceLimit {
    /// Create a limit with the given step budget.
    #[must_use]
    pub fn new(max_steps: u64) -> Self {
        Self {
            max_steps,
            steps: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle a host can use to cancel from another thread.
    #[must_use]
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Consume one step. Returns false once the budget is spent or the
    /// cancel flag is raised.
    pub fn inc(&mut self) -> bool {
        self.steps += 1;
        self.steps <= self.max_steps && !self.cancel.load(Ordering::Relaxed)
    }

    /// True iff further work is allowed without consuming a step.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.steps <= self.max_steps && !self.cancel.load(Ordering::Relaxed)
    }

    /// Steps consumed so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Reset the step counter, e.g. before re-entering `check`.
    pub fn reset(&mut self) {
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget() {
        let mut limit = ResourceLimit::new(2);
        assert!(limit.inc());
        assert!(limit.inc());
        assert!(!limit.inc());
        limit.reset();
        assert!(limit.inc());
    }

    #[test]
    fn test_cancel() {
        let mut limit = ResourceLimit::new(100);
        let flag = limit.cancel_flag();
        assert!(limit.inc());
        flag.store(true, Ordering::Relaxed);
        assert!(!limit.inc());
        assert!(!limit.ok());
    }
}
