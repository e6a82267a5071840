//! Contract state subsystem.
//!
//! # Data Flow
//! ```text
//! escrow contract ──────▶ static_config.rs ──▶ config_cache.rs (persistent, versioned)
//!                                    │
//! escrow + staking contract ──▶ dynamic.rs (always fresh, latest-request-wins)
//!                                    │
//!                                    ▼
//!                         migration.rs (availability per phase, pure)
//! ```
//!
//! # Design Decisions
//! - Static parameters are cached across sessions; dynamic figures never are
//! - Derivations use block timestamps, not the client clock
//! - Snapshots are immutable between refreshes; only confirmed writes and
//!   explicit refreshes publish new ones

pub mod config_cache;
pub mod dynamic;
pub mod migration;
pub mod static_config;

pub use config_cache::ConfigCache;
pub use dynamic::{
    fetch_unstake_queue, DynamicState, MintedAmounts, StateStore, TokenBalances, UnstakeRequest,
    WithdrawableAmounts,
};
pub use migration::{MigrationStatus, PhaseStatus};
pub use static_config::StaticEscrowConfig;
