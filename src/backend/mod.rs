//! REST backend subsystem.
//!
//! Historical records (rewards, gas deposits, gas withdrawals) live behind a
//! small JSON API; the only write is the signed-message gas-fee withdrawal.

pub mod client;
pub mod types;

pub use client::{withdraw_gas_message, BackendClient, BackendError};
pub use types::{GasRecord, GasStatus, Page, PageQuery, RewardRecord};
