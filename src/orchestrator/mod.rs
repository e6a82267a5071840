//! Transaction orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! PendingAction
//!     → slot.rs (one in-flight submission per action slot)
//!     → validation (pure, against the current snapshot)
//!     → approval.rs (allowance gate for token-moving actions)
//!     → chain::writer (gas estimate, sign, broadcast, receipt)
//!     → notify.rs (pending / success / failure events)
//!     → state refresh + estimation invalidation on confirmation
//! ```
//!
//! # Design Decisions
//! - Pre-signature steps may abort; a broadcast transaction never does
//! - Every terminal state releases its slot, so retry needs no reload
//! - User rejection is detected from the error cause chain and surfaced
//!   as a neutral notification, not an alarm

pub mod approval;
pub mod engine;
pub mod notify;
pub mod slot;
pub mod types;

pub use approval::{AllowanceStatus, ApprovalRequirement};
pub use engine::Orchestrator;
pub use notify::{FailureReason, Notification, NotificationSink, TracingSink};
pub use slot::{SlotPhase, SlotRegistry, TerminalKind};
pub use types::{is_user_rejection, OrchestratorError, TxOutcome};
