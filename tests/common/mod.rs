//! Shared utilities for integration tests.
#![allow(dead_code)]

use alloy::primitives::U256;
use std::sync::Mutex;

use metro_client::config::ClientConfig;
use metro_client::orchestrator::{Notification, NotificationSink};
use metro_client::state::StaticEscrowConfig;

/// Anvil's first well-known account key.
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A config pointing at a local (absent) node, with persistence disabled.
pub fn offline_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.chain.rpc_url = "http://localhost:8545".to_string();
    config.chain.rpc_timeout_secs = 1;
    config.cache.path = String::new();
    config
}

pub fn units(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18))
}

/// A static escrow config with generous caps, open from 2023 into the 2030s.
pub fn sample_escrow_config() -> StaticEscrowConfig {
    StaticEscrowConfig {
        cap_10m: units(10_000_000),
        cap_3m: units(3_000_000),
        cap_ythor: units(5_000_000),
        deadline_10m: 1_900_000_000,
        deadline_3m: 1_900_000_000,
        deadline_ythor: 1_950_000_000,
        ratio_10m: units(1),
        ratio_3m: units(1),
        ratio_ythor: units(1) / U256::from(2),
        migration_start_time: 1_700_000_000,
    }
}

/// Captures every notification for assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Notification>>,
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.events.lock().unwrap().push(notification);
    }
}

impl RecordingSink {
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}
