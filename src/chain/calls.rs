//! Per-method write-call schema.
//!
//! Each state-changing contract method gets a variant carrying its exact
//! argument shape; calldata is produced from the typed `sol!` call structs,
//! so there is no stringly-typed ABI surface anywhere in the write path.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::chain::contracts::{IERC20, MigrationEscrow, StakedMetro};

/// Deployed addresses of the two protocol contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractSet {
    /// THOR/yTHOR → METRO migration escrow.
    pub escrow: Address,
    /// xMETRO staking token.
    pub staked: Address,
}

impl ContractSet {
    pub fn from_config(
        config: &crate::config::schema::ContractsConfig,
    ) -> Result<Self, crate::config::validation::ValidationError> {
        use crate::config::validation::ValidationError;

        let escrow = config
            .escrow
            .parse()
            .map_err(|_| ValidationError::InvalidAddress {
                field: "contracts.escrow",
                value: config.escrow.clone(),
            })?;
        let staked =
            config
                .staked_token
                .parse()
                .map_err(|_| ValidationError::InvalidAddress {
                    field: "contracts.staked_token",
                    value: config.staked_token.clone(),
                })?;
        Ok(Self { escrow, staked })
    }
}

/// A fully-specified state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Approve {
        token: Address,
        spender: Address,
        value: U256,
    },
    MigrateThor10m {
        amount: U256,
    },
    MigrateThor3m {
        amount: U256,
    },
    MigrateYThor {
        amount: U256,
    },
    Stake {
        amount: U256,
    },
    StakeContributor {
        amount: U256,
    },
    RequestUnstake {
        amount: U256,
    },
    Withdraw {
        max_requests: U256,
    },
    WithdrawUnlockedThor {
        max_locks: U256,
    },
    WithdrawUnlockedYThor {
        max_locks: U256,
    },
    WithdrawUnlockedContributor {
        max_schedules: U256,
    },
    ClaimRewards,
    Autocompound {
        min_amount_out: U256,
        swap_data: Bytes,
    },
    EnableAutocompound,
    DisableAutocompound,
}

impl WriteCall {
    /// The contract this call is addressed to.
    pub fn target(&self, contracts: &ContractSet) -> Address {
        match self {
            WriteCall::Approve { token, .. } => *token,
            WriteCall::MigrateThor10m { .. }
            | WriteCall::MigrateThor3m { .. }
            | WriteCall::MigrateYThor { .. } => contracts.escrow,
            _ => contracts.staked,
        }
    }

    /// ABI-encoded calldata, selector included.
    pub fn calldata(&self) -> Bytes {
        let encoded = match self.clone() {
            WriteCall::Approve { spender, value, .. } => {
                IERC20::approveCall { spender, value }.abi_encode()
            }
            WriteCall::MigrateThor10m { amount } => {
                MigrationEscrow::migrateThor10mCall { amount }.abi_encode()
            }
            WriteCall::MigrateThor3m { amount } => {
                MigrationEscrow::migrateThor3mCall { amount }.abi_encode()
            }
            WriteCall::MigrateYThor { amount } => {
                MigrationEscrow::migrateYThorCall { amount }.abi_encode()
            }
            WriteCall::Stake { amount } => StakedMetro::stakeCall { amount }.abi_encode(),
            WriteCall::StakeContributor { amount } => {
                StakedMetro::stakeContributorCall { amount }.abi_encode()
            }
            WriteCall::RequestUnstake { amount } => {
                StakedMetro::requestUnstakeCall { amount }.abi_encode()
            }
            WriteCall::Withdraw { max_requests } => StakedMetro::withdrawCall {
                maxRequests: max_requests,
            }
            .abi_encode(),
            WriteCall::WithdrawUnlockedThor { max_locks } => {
                StakedMetro::withdrawUnlockedThorCall { maxLocks: max_locks }.abi_encode()
            }
            WriteCall::WithdrawUnlockedYThor { max_locks } => {
                StakedMetro::withdrawUnlockedYThorCall { maxLocks: max_locks }.abi_encode()
            }
            WriteCall::WithdrawUnlockedContributor { max_schedules } => {
                StakedMetro::withdrawUnlockedContributorCall {
                    maxSchedules: max_schedules,
                }
                .abi_encode()
            }
            WriteCall::ClaimRewards => StakedMetro::claimRewardsCall {}.abi_encode(),
            WriteCall::Autocompound {
                min_amount_out,
                swap_data,
            } => StakedMetro::autocompoundCall {
                minAmountOut: min_amount_out,
                swapData: swap_data,
            }
            .abi_encode(),
            WriteCall::EnableAutocompound => StakedMetro::enableAutocompoundCall {}.abi_encode(),
            WriteCall::DisableAutocompound => StakedMetro::disableAutocompoundCall {}.abi_encode(),
        };
        Bytes::from(encoded)
    }

    /// Method name for logging.
    pub fn method(&self) -> &'static str {
        match self {
            WriteCall::Approve { .. } => "approve",
            WriteCall::MigrateThor10m { .. } => "migrateThor10m",
            WriteCall::MigrateThor3m { .. } => "migrateThor3m",
            WriteCall::MigrateYThor { .. } => "migrateYThor",
            WriteCall::Stake { .. } => "stake",
            WriteCall::StakeContributor { .. } => "stakeContributor",
            WriteCall::RequestUnstake { .. } => "requestUnstake",
            WriteCall::Withdraw { .. } => "withdraw",
            WriteCall::WithdrawUnlockedThor { .. } => "withdrawUnlockedThor",
            WriteCall::WithdrawUnlockedYThor { .. } => "withdrawUnlockedYThor",
            WriteCall::WithdrawUnlockedContributor { .. } => "withdrawUnlockedContributor",
            WriteCall::ClaimRewards => "claimRewards",
            WriteCall::Autocompound { .. } => "autocompound",
            WriteCall::EnableAutocompound => "enableAutocompound",
            WriteCall::DisableAutocompound => "disableAutocompound",
        }
    }
}
