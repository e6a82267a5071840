//! Migration availability, derived per phase.

use alloy::primitives::U256;

use crate::actions::MigrationPhase;
use crate::state::dynamic::MintedAmounts;
use crate::state::static_config::StaticEscrowConfig;

const RATIO_SCALE: u64 = 1_000_000_000_000_000_000;

/// Availability of one migration phase at a given block time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStatus {
    pub cap: U256,
    pub minted: U256,
    /// `cap − minted`, saturating.
    pub available: U256,
    /// METRO per legacy token, 1e18-scaled.
    pub ratio: U256,
    pub deadline: u64,
    pub expired: bool,
}

impl PhaseStatus {
    fn derive(cap: U256, minted: U256, ratio: U256, deadline: u64, now: u64) -> Self {
        Self {
            cap,
            minted,
            available: cap.saturating_sub(minted),
            ratio,
            deadline,
            expired: now >= deadline,
        }
    }

    /// METRO received for `amount` legacy tokens under this phase's ratio.
    pub fn preview_output(&self, amount: U256) -> U256 {
        amount * self.ratio / U256::from(RATIO_SCALE)
    }
}

/// Snapshot of the whole migration window.
///
/// Derived purely from static config, minted amounts, and the latest block
/// timestamp; the client clock is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub started: bool,
    pub start_time: u64,
    pub thor_10m: PhaseStatus,
    pub thor_3m: PhaseStatus,
    pub ythor: PhaseStatus,
}

impl MigrationStatus {
    pub fn derive(config: &StaticEscrowConfig, minted: &MintedAmounts, now: u64) -> Self {
        Self {
            started: now >= config.migration_start_time,
            start_time: config.migration_start_time,
            thor_10m: PhaseStatus::derive(
                config.cap_10m,
                minted.thor_10m,
                config.ratio_10m,
                config.deadline_10m,
                now,
            ),
            thor_3m: PhaseStatus::derive(
                config.cap_3m,
                minted.thor_3m,
                config.ratio_3m,
                config.deadline_3m,
                now,
            ),
            ythor: PhaseStatus::derive(
                config.cap_ythor,
                minted.ythor,
                config.ratio_ythor,
                config.deadline_ythor,
                now,
            ),
        }
    }

    pub fn phase(&self, phase: MigrationPhase) -> &PhaseStatus {
        match phase {
            MigrationPhase::Thor10M => &self.thor_10m,
            MigrationPhase::Thor3M => &self.thor_3m,
            MigrationPhase::YThor => &self.ythor,
        }
    }

    /// Whether the given phase accepts migrations right now.
    pub fn is_open(&self, phase: MigrationPhase) -> bool {
        self.started && !self.phase(phase).expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::static_config::sample_config;

    fn minted(thor_10m: u64) -> MintedAmounts {
        MintedAmounts {
            thor_10m: U256::from(thor_10m) * U256::from(10u64).pow(U256::from(18)),
            thor_3m: U256::ZERO,
            ythor: U256::ZERO,
        }
    }

    #[test]
    fn test_available_is_cap_minus_minted() {
        let status = MigrationStatus::derive(&sample_config(), &minted(4_000_000), 1_800_000_000);
        let expected = U256::from(6_000_000u64) * U256::from(10u64).pow(U256::from(18));
        assert_eq!(status.thor_10m.available, expected);
    }

    #[test]
    fn test_available_saturates_at_zero() {
        let status = MigrationStatus::derive(&sample_config(), &minted(11_000_000), 1_800_000_000);
        assert_eq!(status.thor_10m.available, U256::ZERO);
    }

    #[test]
    fn test_window_not_started() {
        let config = sample_config();
        let status = MigrationStatus::derive(&config, &minted(0), config.migration_start_time - 1);
        assert!(!status.started);
        assert!(!status.is_open(MigrationPhase::Thor10M));
    }

    #[test]
    fn test_phase_expiry_is_per_phase() {
        let config = sample_config();
        // Between the THOR deadlines and the later yTHOR deadline.
        let status = MigrationStatus::derive(&config, &minted(0), 1_920_000_000);
        assert!(status.thor_10m.expired);
        assert!(!status.ythor.expired);
        assert!(!status.is_open(MigrationPhase::Thor10M));
        assert!(status.is_open(MigrationPhase::YThor));
    }

    #[test]
    fn test_deadline_moment_counts_as_expired() {
        let config = sample_config();
        let status = MigrationStatus::derive(&config, &minted(0), config.deadline_10m);
        assert!(status.thor_10m.expired);
    }

    #[test]
    fn test_derivation_is_pure() {
        let config = sample_config();
        let m = minted(1_000);
        let a = MigrationStatus::derive(&config, &m, 1_800_000_000);
        let b = MigrationStatus::derive(&config, &m, 1_800_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_preview_output_applies_ratio() {
        let status = MigrationStatus::derive(&sample_config(), &minted(0), 1_800_000_000);
        let amount = U256::from(100u64) * U256::from(10u64).pow(U256::from(18));
        // yTHOR ratio in the sample is 0.5e18.
        assert_eq!(
            status.ythor.preview_output(amount),
            U256::from(50u64) * U256::from(10u64).pow(U256::from(18))
        );
    }
}
