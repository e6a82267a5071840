//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Keystroke → debounce.rs (trailing-edge wait, newest caller wins)
//! Async fetch → generation.rs (supersede stale results before publish)
//! ```
//!
//! # Design Decisions
//! - No locking primitive: all mutation happens on the cooperative runtime,
//!   so a generation counter is enough to stop stale-write races
//! - Debounce is decoupled from any rendering lifecycle

pub mod debounce;
pub mod generation;

pub use debounce::{Debounce, Debouncer};
pub use generation::{Generation, Ticket};
