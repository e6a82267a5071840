//! Headless debounce primitive.
//!
//! Keystroke-driven validation and estimation should not fire on every
//! character. Callers await `settle()`; if another call arrives during the
//! wait, the earlier caller is told to skip its work. No UI lifecycle
//! involved, so the behavior is testable directly.

use std::time::Duration;
use tokio::time::sleep;

use crate::resilience::generation::Generation;

/// Outcome of a debounce wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debounce {
    /// This caller is the latest; run the work.
    Run,
    /// A newer call arrived during the wait; skip.
    Skip,
}

/// Trailing-edge debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    generation: Generation,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            generation: Generation::new(),
        }
    }

    pub fn from_millis(wait_ms: u64) -> Self {
        Self::new(Duration::from_millis(wait_ms))
    }

    /// Wait out the debounce window. Returns [`Debounce::Run`] only for the
    /// newest caller.
    pub async fn settle(&self) -> Debounce {
        let ticket = self.generation.begin();
        sleep(self.wait).await;
        if self.generation.is_current(ticket) {
            Debounce::Run
        } else {
            Debounce::Skip
        }
    }

    /// Drop all pending callers without starting a new one.
    pub fn cancel(&self) {
        self.generation.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_caller_runs() {
        let debouncer = Debouncer::from_millis(10);
        assert_eq!(debouncer.settle().await, Debounce::Run);
    }

    #[tokio::test]
    async fn test_newer_call_supersedes() {
        let debouncer = Debouncer::from_millis(100);

        let early = debouncer.clone();
        let first = tokio::spawn(async move { early.settle().await });
        // Let the first caller take its ticket before the second arrives.
        sleep(Duration::from_millis(10)).await;

        let second = debouncer.settle().await;
        assert_eq!(second, Debounce::Run);
        assert_eq!(first.await.unwrap(), Debounce::Skip);
    }

    #[tokio::test]
    async fn test_cancel_skips_pending() {
        let debouncer = Debouncer::from_millis(100);

        let pending = debouncer.clone();
        let task = tokio::spawn(async move { pending.settle().await });
        sleep(Duration::from_millis(10)).await;

        debouncer.cancel();
        assert_eq!(task.await.unwrap(), Debounce::Skip);
    }
}
