//! Validation behavior through the public API.

use alloy::primitives::U256;

use metro_client::actions::{ActionKind, MigrationPhase, PendingAction};
use metro_client::state::dynamic::MintedAmounts;
use metro_client::state::MigrationStatus;
use metro_client::validation::{validate, ValidationContext, ValidationError};

mod common;
use common::{sample_escrow_config, units};

fn ctx(balance: U256) -> ValidationContext {
    ValidationContext {
        decimals: 18,
        balance,
        migration: None,
    }
}

fn stake(amount: &str) -> PendingAction {
    PendingAction::with_amount(ActionKind::Stake { contributor: false }, amount)
}

#[test]
fn amount_over_balance_is_insufficient() {
    // amount="100", balance="50"
    assert_eq!(
        validate(&stake("100"), &ctx(units(50))),
        Some(ValidationError::InsufficientBalance)
    );
}

#[test]
fn zero_amount_is_invalid() {
    // amount="0", balance="50"
    assert_eq!(
        validate(&stake("0"), &ctx(units(50))),
        Some(ValidationError::InvalidAmount)
    );
}

#[test]
fn migrate_beyond_phase_availability_exceeds_cap() {
    // phase cap available = 500, migrate amount = 1000
    let config = sample_escrow_config();
    let minted = MintedAmounts {
        thor_10m: config.cap_10m - units(500),
        thor_3m: U256::ZERO,
        ythor: U256::ZERO,
    };
    let migration = MigrationStatus::derive(&config, &minted, 1_800_000_000);

    let ctx = ValidationContext {
        decimals: 18,
        balance: units(100_000),
        migration: Some(migration),
    };
    let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "1000");
    assert_eq!(validate(&action, &ctx), Some(ValidationError::CapExceeded));
}

#[test]
fn migrate_within_availability_passes() {
    let config = sample_escrow_config();
    let migration = MigrationStatus::derive(&config, &MintedAmounts::default(), 1_800_000_000);
    let ctx = ValidationContext {
        decimals: 18,
        balance: units(1_000),
        migration: Some(migration),
    };
    let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "1000");
    assert_eq!(validate(&action, &ctx), None);
}

#[test]
fn migrate_before_start_or_after_deadline_is_closed() {
    let config = sample_escrow_config();
    let minted = MintedAmounts::default();
    let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "10");

    for now in [config.migration_start_time - 1, config.deadline_10m] {
        let migration = MigrationStatus::derive(&config, &minted, now);
        let ctx = ValidationContext {
            decimals: 18,
            balance: units(100),
            migration: Some(migration),
        };
        assert_eq!(validate(&action, &ctx), Some(ValidationError::WindowClosed));
    }
}

#[test]
fn repeated_validation_yields_identical_results() {
    let config = sample_escrow_config();
    let migration = MigrationStatus::derive(&config, &MintedAmounts::default(), 1_800_000_000);
    let ctx = ValidationContext {
        decimals: 18,
        balance: units(100),
        migration: Some(migration),
    };
    let action = PendingAction::with_amount(ActionKind::Migrate(MigrationPhase::Thor10M), "50");

    let results: Vec<_> = (0..5).map(|_| validate(&action, &ctx)).collect();
    assert!(results.iter().all(|r| *r == results[0]));
}
