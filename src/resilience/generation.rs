//! Latest-request-wins guard.
//!
//! Concurrent async fetches over shared state can resolve out of order; a
//! superseded request's result must never overwrite newer state. Each request
//! takes a ticket; only the holder of the newest ticket may publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic request-generation counter.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    counter: Arc<AtomicU64>,
}

/// A claim on one generation. Stale once any newer ticket is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier tickets.
    pub fn begin(&self) -> Ticket {
        Ticket(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.counter.load(Ordering::SeqCst) == ticket.0
    }

    /// Invalidate every outstanding ticket without starting a request.
    pub fn bump(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }
}
