//! User-initiated financial actions.

use alloy::primitives::Address;

/// Migration phase of the legacy tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationPhase {
    /// THOR under the 10M cap.
    Thor10M,
    /// THOR under the 3M cap.
    Thor3M,
    /// yTHOR under its own cap.
    YThor,
}

impl MigrationPhase {
    pub fn label(&self) -> &'static str {
        match self {
            MigrationPhase::Thor10M => "10M",
            MigrationPhase::Thor3M => "3M",
            MigrationPhase::YThor => "yTHOR",
        }
    }
}

/// The four unlock paths funds can be withdrawn through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WithdrawKind {
    /// Matured unstake requests.
    Normal,
    /// Unlocked THOR migration locks.
    Thor,
    /// Unlocked yTHOR vesting.
    YThor,
    /// Unlocked contributor vesting.
    Contributor,
}

impl WithdrawKind {
    pub fn label(&self) -> &'static str {
        match self {
            WithdrawKind::Normal => "Normal",
            WithdrawKind::Thor => "THOR",
            WithdrawKind::YThor => "yTHOR",
            WithdrawKind::Contributor => "Contributor",
        }
    }
}

/// Kind of a user-initiated action, one orchestration slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Grant allowance to a spender contract.
    Approve { token: Address, spender: Address },
    /// Convert a legacy token into METRO.
    Migrate(MigrationPhase),
    /// Deposit METRO for xMETRO shares.
    Stake { contributor: bool },
    /// Start the unstake cooldown for xMETRO shares.
    Unstake,
    /// Withdraw matured funds through one of the unlock paths.
    Withdraw(WithdrawKind),
    /// Claim accrued reward tokens.
    Claim,
    /// Swap claimed rewards back into the staked token once.
    Autocompound,
    /// Turn the autocompound flag on or off.
    SetAutocompound(bool),
}

impl ActionKind {
    /// Slot identifier. One in-flight transaction per slot; independent
    /// slots may interleave freely.
    pub fn slot(&self) -> &'static str {
        match self {
            ActionKind::Approve { .. } => "approve",
            ActionKind::Migrate(_) => "migrate",
            ActionKind::Stake { .. } => "stake",
            ActionKind::Unstake => "unstake",
            ActionKind::Withdraw(WithdrawKind::Normal) => "withdraw:normal",
            ActionKind::Withdraw(WithdrawKind::Thor) => "withdraw:thor",
            ActionKind::Withdraw(WithdrawKind::YThor) => "withdraw:ythor",
            ActionKind::Withdraw(WithdrawKind::Contributor) => "withdraw:contributor",
            ActionKind::Claim => "claim",
            ActionKind::Autocompound => "autocompound",
            ActionKind::SetAutocompound(_) => "autocompound-toggle",
        }
    }

    /// Human-facing label for notifications.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Approve { .. } => "Approve",
            ActionKind::Migrate(_) => "Migration",
            ActionKind::Stake { .. } => "Stake",
            ActionKind::Unstake => "Unstake",
            ActionKind::Withdraw(_) => "Withdraw",
            ActionKind::Claim => "Claim",
            ActionKind::Autocompound => "Autocompound",
            ActionKind::SetAutocompound(true) => "Enable Auto Compound",
            ActionKind::SetAutocompound(false) => "Disable Auto Compound",
        }
    }

    /// Whether this action carries a user-typed amount.
    pub fn takes_amount(&self) -> bool {
        matches!(
            self,
            ActionKind::Approve { .. }
                | ActionKind::Migrate(_)
                | ActionKind::Stake { .. }
                | ActionKind::Unstake
                | ActionKind::Autocompound
        )
    }
}

/// One user interaction, created per intent and destroyed after the slot
/// reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub kind: ActionKind,
    /// Decimal string as typed by the user, e.g. "100.5".
    pub amount: Option<String>,
    /// Receiver override for contributor staking, when the UI collects one.
    pub receiver: Option<String>,
}

impl PendingAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            amount: None,
            receiver: None,
        }
    }

    pub fn with_amount(kind: ActionKind, amount: impl Into<String>) -> Self {
        Self {
            kind,
            amount: Some(amount.into()),
            receiver: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_distinct_per_withdraw_kind() {
        let a = ActionKind::Withdraw(WithdrawKind::Normal).slot();
        let b = ActionKind::Withdraw(WithdrawKind::Thor).slot();
        assert_ne!(a, b);
    }

    #[test]
    fn test_stake_and_claim_use_independent_slots() {
        assert_ne!(
            ActionKind::Stake { contributor: false }.slot(),
            ActionKind::Claim.slot()
        );
    }

    #[test]
    fn test_amount_bearing_kinds() {
        assert!(ActionKind::Unstake.takes_amount());
        assert!(!ActionKind::Claim.takes_amount());
        assert!(!ActionKind::SetAutocompound(true).takes_amount());
    }
}
