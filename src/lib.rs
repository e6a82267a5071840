//! Headless client for the THOR/yTHOR → METRO migration-and-staking product.
//!
//! # Architecture Overview
//!
//! ```text
//!  user input
//!      │
//!      ▼
//!  ┌────────────┐   pure    ┌─────────────┐  eth_call  ┌──────────────┐
//!  │ validation │──────────▶│ estimation  │───────────▶│ chain reader │
//!  └────────────┘           └─────────────┘            └──────┬───────┘
//!      │                                                      │
//!      ▼                                                      ▼
//!  ┌──────────────────────────────────────────┐        ┌──────────────┐
//!  │ orchestrator                             │ write  │ chain writer │
//!  │ validate → approve gate → gas → submit   │───────▶│ sign + send  │
//!  │ → receipt → classify → refresh           │        └──────────────┘
//!  └──────┬───────────────────────────┬───────┘
//!         │ notifications             │ refresh
//!         ▼                           ▼
//!  ┌──────────────┐            ┌─────────────────────────────┐
//!  │ notify sink  │            │ state (static cache, fresh  │
//!  └──────────────┘            │ dynamic snapshots)          │
//!                              └─────────────────────────────┘
//! ```
//!
//! The REST backend (reward/gas history, signed gas withdrawal) hangs off to
//! the side in `backend`; `resilience` provides the debounce and
//! latest-request-wins primitives everything above relies on.

// Core subsystems
pub mod actions;
pub mod chain;
pub mod estimation;
pub mod orchestrator;
pub mod state;
pub mod validation;

// Collaborators
pub mod backend;
pub mod tokens;

// Cross-cutting concerns
pub mod config;
pub mod observability;
pub mod resilience;

pub use actions::{ActionKind, MigrationPhase, PendingAction, WithdrawKind};
pub use chain::{Account, ChainReader, ChainWriter, ContractSet};
pub use config::{load_config, ClientConfig};
pub use orchestrator::{Orchestrator, OrchestratorError, TxOutcome};
