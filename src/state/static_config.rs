//! Static escrow parameters.
//!
//! Caps, deadlines, ratios, and the start time are fixed for the contract's
//! lifetime, so they are fetched once and cached persistently. Minted amounts
//! are deliberately NOT here; they move on every migration by any user.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::chain::ChainReader;
use crate::chain::ChainResult;

/// Fixed migration-escrow parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEscrowConfig {
    pub cap_10m: U256,
    pub cap_3m: U256,
    pub cap_ythor: U256,
    /// Unix seconds.
    pub deadline_10m: u64,
    pub deadline_3m: u64,
    pub deadline_ythor: u64,
    /// METRO per legacy token, 1e18-scaled.
    pub ratio_10m: U256,
    pub ratio_3m: U256,
    pub ratio_ythor: U256,
    /// Unix seconds.
    pub migration_start_time: u64,
}

impl StaticEscrowConfig {
    /// Fetch the full parameter set from the escrow in one batch.
    ///
    /// All-or-nothing: caching a half-read config would poison every
    /// availability computation afterwards.
    pub async fn fetch(reader: &ChainReader, escrow: Address) -> ChainResult<Self> {
        let contract = reader.escrow(escrow);

        let (cap_10m, cap_3m, cap_ythor) = tokio::try_join!(
            reader.contract_call(contract.cap10M().call()),
            reader.contract_call(contract.cap3M().call()),
            reader.contract_call(contract.capYThor().call()),
        )?;
        let (deadline_10m, deadline_3m, deadline_ythor) = tokio::try_join!(
            reader.contract_call(contract.deadline10M().call()),
            reader.contract_call(contract.deadline3M().call()),
            reader.contract_call(contract.deadlineYThor().call()),
        )?;
        let (ratio_10m, ratio_3m, ratio_ythor, start_time) = tokio::try_join!(
            reader.contract_call(contract.ratio10M().call()),
            reader.contract_call(contract.ratio3M().call()),
            reader.contract_call(contract.ratioYThor().call()),
            reader.contract_call(contract.migrationStartTime().call()),
        )?;

        Ok(Self {
            cap_10m,
            cap_3m,
            cap_ythor,
            deadline_10m: deadline_10m.saturating_to(),
            deadline_3m: deadline_3m.saturating_to(),
            deadline_ythor: deadline_ythor.saturating_to(),
            ratio_10m,
            ratio_3m,
            ratio_ythor,
            migration_start_time: start_time.saturating_to(),
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_config() -> StaticEscrowConfig {
    StaticEscrowConfig {
        cap_10m: U256::from(10_000_000u64) * U256::from(10u64).pow(U256::from(18)),
        cap_3m: U256::from(3_000_000u64) * U256::from(10u64).pow(U256::from(18)),
        cap_ythor: U256::from(5_000_000u64) * U256::from(10u64).pow(U256::from(18)),
        deadline_10m: 1_900_000_000,
        deadline_3m: 1_900_000_000,
        deadline_ythor: 1_950_000_000,
        ratio_10m: U256::from(10u64).pow(U256::from(18)),
        ratio_3m: U256::from(10u64).pow(U256::from(18)),
        ratio_ythor: U256::from(5u64) * U256::from(10u64).pow(U256::from(17)),
        migration_start_time: 1_700_000_000,
    }
}
