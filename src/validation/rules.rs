//! Pure validation of user-initiated actions.
//!
//! Callable synchronously on every keystroke; no I/O, no hidden state.
//! The caller supplies the balance relevant to the action (token balance for
//! stake/migrate, share balance for unstake, claimable amount for claim and
//! autocompound, withdrawable amount for withdraw).

use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::actions::{ActionKind, PendingAction};
use crate::state::migration::MigrationStatus;
use crate::validation::amount::parse_amount;

/// Why an action is not permitted. `None` from [`validate`] means permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount must be greater than 0")]
    InvalidAmount,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Amount exceeds available migration limit")]
    CapExceeded,
    #[error("Migration window is closed")]
    WindowClosed,
    #[error("Invalid receiver address")]
    InvalidReceiver,
}

/// Inputs a validation pass runs against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    /// Decimals of the token the typed amount is denominated in.
    pub decimals: u8,
    /// The balance relevant to the action, in base units.
    pub balance: U256,
    /// Migration availability; required only for migrate actions.
    pub migration: Option<MigrationStatus>,
}

/// Decide whether `action` is permitted under `ctx`, and if not, why.
pub fn validate(action: &PendingAction, ctx: &ValidationContext) -> Option<ValidationError> {
    let amount = if action.kind.takes_amount() {
        match action.amount.as_deref() {
            Some(raw) => match parse_amount(raw, ctx.decimals) {
                Ok(value) => Some(value),
                Err(_) => return Some(ValidationError::InvalidAmount),
            },
            None => return Some(ValidationError::InvalidAmount),
        }
    } else {
        None
    };

    match action.kind {
        ActionKind::Approve { .. } => None,

        ActionKind::Migrate(phase) => {
            let amount = amount.unwrap_or_default();
            if amount > ctx.balance {
                return Some(ValidationError::InsufficientBalance);
            }
            // Unknown availability reads as a closed window, never as open.
            let Some(migration) = ctx.migration.as_ref() else {
                return Some(ValidationError::WindowClosed);
            };
            if amount > migration.phase(phase).available {
                return Some(ValidationError::CapExceeded);
            }
            if !migration.is_open(phase) {
                return Some(ValidationError::WindowClosed);
            }
            None
        }

        ActionKind::Stake { contributor } => {
            let amount = amount.unwrap_or_default();
            if amount > ctx.balance {
                return Some(ValidationError::InsufficientBalance);
            }
            if contributor {
                if let Some(receiver) = action.receiver.as_deref() {
                    if receiver.parse::<Address>().is_err() {
                        return Some(ValidationError::InvalidReceiver);
                    }
                }
            }
            None
        }

        ActionKind::Unstake | ActionKind::Autocompound => {
            if amount.unwrap_or_default() > ctx.balance {
                return Some(ValidationError::InsufficientBalance);
            }
            None
        }

        ActionKind::Claim | ActionKind::Withdraw(_) => {
            if ctx.balance.is_zero() {
                return Some(ValidationError::InsufficientBalance);
            }
            None
        }

        ActionKind::SetAutocompound(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{MigrationPhase, WithdrawKind};
    use crate::state::dynamic::MintedAmounts;
    use crate::state::static_config::sample_config;

    fn units(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18))
    }

    fn ctx(balance: U256) -> ValidationContext {
        ValidationContext {
            decimals: 18,
            balance,
            migration: None,
        }
    }

    fn migration_ctx(balance: U256, now: u64) -> ValidationContext {
        ValidationContext {
            decimals: 18,
            balance,
            migration: Some(MigrationStatus::derive(
                &sample_config(),
                &MintedAmounts::default(),
                now,
            )),
        }
    }

    fn stake(amount: &str) -> PendingAction {
        PendingAction::with_amount(ActionKind::Stake { contributor: false }, amount)
    }

    #[test]
    fn test_zero_amount_is_invalid_regardless_of_balance() {
        for balance in [U256::ZERO, units(50)] {
            assert_eq!(
                validate(&stake("0"), &ctx(balance)),
                Some(ValidationError::InvalidAmount)
            );
        }
    }

    #[test]
    fn test_negative_and_garbage_amounts_are_invalid() {
        assert_eq!(
            validate(&stake("-1"), &ctx(units(50))),
            Some(ValidationError::InvalidAmount)
        );
        assert_eq!(
            validate(&stake("abc"), &ctx(units(50))),
            Some(ValidationError::InvalidAmount)
        );
        assert_eq!(
            validate(&PendingAction::new(ActionKind::Unstake), &ctx(units(50))),
            Some(ValidationError::InvalidAmount)
        );
    }

    #[test]
    fn test_amount_over_balance() {
        assert_eq!(
            validate(&stake("100"), &ctx(units(50))),
            Some(ValidationError::InsufficientBalance)
        );
    }

    #[test]
    fn test_amount_within_balance_passes() {
        assert_eq!(validate(&stake("50"), &ctx(units(50))), None);
        assert_eq!(validate(&stake("0.5"), &ctx(units(50))), None);
    }

    #[test]
    fn test_migrate_cap_exceeded() {
        // Cap leaves 500 available; balance is plenty.
        let config = sample_config();
        let minted = MintedAmounts {
            thor_10m: config.cap_10m - units(500),
            thor_3m: U256::ZERO,
            ythor: U256::ZERO,
        };
        let ctx = ValidationContext {
            decimals: 18,
            balance: units(10_000),
            migration: Some(MigrationStatus::derive(&config, &minted, 1_800_000_000)),
        };
        let action =
            PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "1000");
        assert_eq!(validate(&action, &ctx), Some(ValidationError::CapExceeded));
    }

    #[test]
    fn test_migrate_window_not_started() {
        let ctx = migration_ctx(units(100), 1_600_000_000);
        let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "10");
        assert_eq!(validate(&action, &ctx), Some(ValidationError::WindowClosed));
    }

    #[test]
    fn test_migrate_phase_expired() {
        let ctx = migration_ctx(units(100), 1_920_000_000);
        let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor3M), "10");
        assert_eq!(validate(&action, &ctx), Some(ValidationError::WindowClosed));
        // The yTHOR phase is still open at that time.
        let ythor = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::YThor), "10");
        assert_eq!(validate(&ythor, &ctx), None);
    }

    #[test]
    fn test_migrate_without_config_is_closed() {
        let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "10");
        assert_eq!(
            validate(&action, &ctx(units(100))),
            Some(ValidationError::WindowClosed)
        );
    }

    #[test]
    fn test_migrate_open_window_passes() {
        let ctx = migration_ctx(units(100), 1_800_000_000);
        let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "100");
        assert_eq!(validate(&action, &ctx), None);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let ctx = migration_ctx(units(100), 1_800_000_000);
        let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "10");
        let first = validate(&action, &ctx);
        let second = validate(&action, &ctx);
        assert_eq!(first, second);
        assert_eq!(first, None);
    }

    #[test]
    fn test_contributor_receiver_format() {
        let mut action =
            PendingAction::with_amount(ActionKind::Stake { contributor: true }, "10");
        action.receiver = Some("not-an-address".to_string());
        assert_eq!(
            validate(&action, &ctx(units(50))),
            Some(ValidationError::InvalidReceiver)
        );

        action.receiver = Some(format!("{:?}", Address::repeat_byte(1)));
        assert_eq!(validate(&action, &ctx(units(50))), None);
    }

    #[test]
    fn test_claim_requires_positive_claimable() {
        let claim = PendingAction::new(ActionKind::Claim);
        assert_eq!(
            validate(&claim, &ctx(U256::ZERO)),
            Some(ValidationError::InsufficientBalance)
        );
        assert_eq!(validate(&claim, &ctx(U256::from(1))), None);
    }

    #[test]
    fn test_withdraw_requires_positive_withdrawable() {
        let withdraw = PendingAction::new(ActionKind::Withdraw(WithdrawKind::Thor));
        assert_eq!(
            validate(&withdraw, &ctx(U256::ZERO)),
            Some(ValidationError::InsufficientBalance)
        );
    }

    #[test]
    fn test_toggle_always_passes() {
        let toggle = PendingAction::new(ActionKind::SetAutocompound(true));
        assert_eq!(validate(&toggle, &ctx(U256::ZERO)), None);
    }
}
