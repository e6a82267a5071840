//! The approval gate.
//!
//! Any action that moves a non-native token into a spender contract first
//! needs the spender's allowance to cover the amount. When it doesn't, the
//! action is replaced by an Approve that must confirm before the original
//! becomes available. Native assets and sufficient allowances skip the gate.

use alloy::primitives::{Address, U256};

use crate::actions::{ActionKind, MigrationPhase, PendingAction};
use crate::chain::{ChainReader, ChainResult, ContractSet};
use crate::tokens::KnownTokens;

/// What the gate needs to hold before an action may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRequirement {
    pub token: Address,
    pub spender: Address,
    /// Base units the action intends to move.
    pub amount: U256,
}

/// Gate status for one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceStatus {
    Sufficient,
    Insufficient { current: U256 },
}

/// Which token an action moves, and into which spender. `None` when no
/// token leaves the wallet (unstake, claim, withdraw, toggles, approve
/// itself).
pub fn requirement(
    kind: &ActionKind,
    amount: U256,
    contracts: &ContractSet,
    tokens: &KnownTokens,
) -> Option<ApprovalRequirement> {
    let (token, spender) = match kind {
        ActionKind::Migrate(MigrationPhase::Thor10M | MigrationPhase::Thor3M) => {
            (tokens.thor.address, contracts.escrow)
        }
        ActionKind::Migrate(MigrationPhase::YThor) => (tokens.ythor.address, contracts.escrow),
        ActionKind::Stake { .. } => (tokens.metro.address, contracts.staked),
        _ => return None,
    };

    if token == Address::ZERO {
        return None;
    }

    Some(ApprovalRequirement {
        token,
        spender,
        amount,
    })
}

/// Compare the current on-chain allowance against the requirement.
pub async fn check(
    reader: &ChainReader,
    requirement: &ApprovalRequirement,
    owner: Address,
) -> ChainResult<AllowanceStatus> {
    let current = reader
        .erc20_allowance(requirement.token, owner, requirement.spender)
        .await?;

    if current >= requirement.amount {
        Ok(AllowanceStatus::Sufficient)
    } else {
        Ok(AllowanceStatus::Insufficient { current })
    }
}

/// The replacement Approve action for an unsatisfied requirement.
///
/// In max-approve mode the full representable value is granted so the gate
/// is only ever paid once per token/spender pair.
pub fn approve_action(
    requirement: &ApprovalRequirement,
    max_approve: bool,
    decimals: u8,
) -> PendingAction {
    let amount = if max_approve {
        crate::validation::amount::format_base_units(U256::MAX, decimals)
    } else {
        crate::validation::amount::format_base_units(requirement.amount, decimals)
    };
    PendingAction::with_amount(
        ActionKind::Approve {
            token: requirement.token,
            spender: requirement.spender,
        },
        amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TokensConfig;

    fn fixtures() -> (ContractSet, KnownTokens) {
        let contracts = ContractSet {
            escrow: Address::repeat_byte(0x11),
            staked: Address::repeat_byte(0x22),
        };
        let tokens = KnownTokens::from_config(&TokensConfig::default(), 8453).unwrap();
        (contracts, tokens)
    }

    #[test]
    fn test_migrate_moves_legacy_token_into_escrow() {
        let (contracts, tokens) = fixtures();
        let req = requirement(
            &ActionKind::Migrate(MigrationPhase::Thor10M),
            U256::from(5),
            &contracts,
            &tokens,
        )
        .unwrap();
        assert_eq!(req.token, tokens.thor.address);
        assert_eq!(req.spender, contracts.escrow);

        let req = requirement(
            &ActionKind::Migrate(MigrationPhase::YThor),
            U256::from(5),
            &contracts,
            &tokens,
        )
        .unwrap();
        assert_eq!(req.token, tokens.ythor.address);
    }

    #[test]
    fn test_stake_moves_metro_into_staked_token() {
        let (contracts, tokens) = fixtures();
        let req = requirement(
            &ActionKind::Stake { contributor: true },
            U256::from(5),
            &contracts,
            &tokens,
        )
        .unwrap();
        assert_eq!(req.token, tokens.metro.address);
        assert_eq!(req.spender, contracts.staked);
    }

    #[test]
    fn test_non_moving_actions_skip_the_gate() {
        let (contracts, tokens) = fixtures();
        for kind in [
            ActionKind::Unstake,
            ActionKind::Claim,
            ActionKind::Autocompound,
            ActionKind::SetAutocompound(true),
            ActionKind::Approve {
                token: tokens.metro.address,
                spender: contracts.staked,
            },
        ] {
            assert!(requirement(&kind, U256::from(5), &contracts, &tokens).is_none());
        }
    }

    #[test]
    fn test_approve_action_exact_amount() {
        let (contracts, tokens) = fixtures();
        let req = ApprovalRequirement {
            token: tokens.metro.address,
            spender: contracts.staked,
            amount: U256::from(10u64) * U256::from(10u64).pow(U256::from(18)),
        };
        let action = approve_action(&req, false, 18);
        assert_eq!(action.amount.as_deref(), Some("10"));
        assert!(matches!(action.kind, ActionKind::Approve { .. }));
    }
}
