//! Speculative preview of pending actions.
//!
//! Every estimate is a read-only `eth_call` with the would-be arguments from
//! the caller's account; chain state is never touched. Simulation failure is
//! an expected outcome (not yet approved, insufficient balance) and stays
//! silent apart from a debug log.
//!
//! Results follow latest-request-wins: when inputs change while an estimate
//! is in flight, the stale result is discarded and never published.

use alloy::primitives::{Bytes, U256};
use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::actions::ActionKind;
use crate::chain::types::Account;
use crate::chain::{ChainReader, ContractSet};
use crate::resilience::Generation;
use crate::state::migration::PhaseStatus;

/// A preview of what an action would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimationResult {
    pub action: ActionKind,
    /// Output amount in base units (shares minted, METRO out, ...).
    pub output: U256,
    /// When unstaked funds become withdrawable; only for unstake previews.
    pub unlock_time: Option<u64>,
}

/// Outcome of one estimation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimationOutcome {
    /// The preview, also published as the engine's latest result.
    Ready(EstimationResult),
    /// A newer request started before this one resolved; nothing published.
    Superseded,
    /// Simulation failed; expected and silent.
    Unavailable,
}

/// Cancellable estimation over the protocol contracts.
pub struct EstimationEngine {
    reader: ChainReader,
    contracts: ContractSet,
    generation: Generation,
    latest: ArcSwapOption<EstimationResult>,
}

impl EstimationEngine {
    pub fn new(reader: ChainReader, contracts: ContractSet) -> Self {
        Self {
            reader,
            contracts,
            generation: Generation::new(),
            latest: ArcSwapOption::empty(),
        }
    }

    /// The most recent preview that survived to publication.
    pub fn latest(&self) -> Option<Arc<EstimationResult>> {
        self.latest.load_full()
    }

    /// Discard the published preview and supersede everything in flight.
    /// Called whenever an estimation input changes and after every
    /// confirmed write.
    pub fn invalidate(&self) {
        self.generation.bump();
        self.latest.store(None);
    }

    /// Preview the xMETRO shares minted by staking `amount` METRO.
    pub async fn estimate_stake(
        &self,
        account: &Account,
        amount: U256,
        contributor: bool,
    ) -> EstimationOutcome {
        let ticket = self.generation.begin();
        let staked = self.reader.staked(self.contracts.staked);
        let user = account.address;

        let simulated = if contributor {
            self.reader
                .contract_call(staked.stakeContributor(amount).from(user).call())
                .await
        } else {
            self.reader
                .contract_call(staked.stake(amount).from(user).call())
                .await
        };

        let minted_shares = match simulated {
            Ok(shares) => shares,
            Err(e) => {
                tracing::debug!(error = %e, "Stake simulation failed (normal when not approved)");
                return EstimationOutcome::Unavailable;
            }
        };

        self.publish(
            ticket,
            EstimationResult {
                action: ActionKind::Stake { contributor },
                output: minted_shares,
                unlock_time: None,
            },
        )
    }

    /// Preview an unstake request: verifies the call would succeed and
    /// computes the unlock time from the on-chain delay constant and the
    /// latest block timestamp.
    pub async fn estimate_unstake(&self, account: &Account, amount: U256) -> EstimationOutcome {
        let ticket = self.generation.begin();
        let staked = self.reader.staked(self.contracts.staked);
        let user = account.address;

        if let Err(e) = self
            .reader
            .contract_call(staked.requestUnstake(amount).from(user).call())
            .await
        {
            tracing::debug!(error = %e, "Unstake simulation failed (normal on insufficient shares)");
            return EstimationOutcome::Unavailable;
        }

        let delay = match self
            .reader
            .contract_call(staked.unstakeDelay().call())
            .await
        {
            Ok(delay) => delay,
            Err(e) => {
                tracing::debug!(error = %e, "Unlock delay query failed");
                return EstimationOutcome::Unavailable;
            }
        };

        let block = match self.reader.latest_block().await {
            Ok(block) => block,
            Err(e) => {
                tracing::debug!(error = %e, "Block query failed during unstake estimation");
                return EstimationOutcome::Unavailable;
            }
        };

        self.publish(
            ticket,
            EstimationResult {
                action: ActionKind::Unstake,
                output: amount,
                unlock_time: Some(block.timestamp.saturating_add(delay.saturating_to())),
            },
        )
    }

    /// Preview the METRO produced by compounding claimed rewards through
    /// the given swap path. Uses `minAmountOut = 0`; slippage is applied by
    /// the orchestrator at submission time.
    pub async fn estimate_autocompound(
        &self,
        account: &Account,
        swap_data: Bytes,
    ) -> EstimationOutcome {
        let ticket = self.generation.begin();
        let staked = self.reader.staked(self.contracts.staked);

        let simulated = self
            .reader
            .contract_call(
                staked
                    .autocompound(U256::ZERO, swap_data)
                    .from(account.address)
                    .call(),
            )
            .await;

        let amount_out = match simulated {
            Ok(out) => out,
            Err(e) => {
                tracing::debug!(error = %e, "Autocompound simulation failed");
                return EstimationOutcome::Unavailable;
            }
        };

        self.publish(
            ticket,
            EstimationResult {
                action: ActionKind::Autocompound,
                output: amount_out,
                unlock_time: None,
            },
        )
    }

    /// Preview a migration's METRO output. Pure ratio arithmetic, no RPC.
    pub fn estimate_migrate(
        &self,
        action: ActionKind,
        phase: &PhaseStatus,
        amount: U256,
    ) -> EstimationOutcome {
        let ticket = self.generation.begin();
        self.publish(
            ticket,
            EstimationResult {
                action,
                output: phase.preview_output(amount),
                unlock_time: None,
            },
        )
    }

    fn publish(
        &self,
        ticket: crate::resilience::Ticket,
        result: EstimationResult,
    ) -> EstimationOutcome {
        if !self.generation.is_current(ticket) {
            return EstimationOutcome::Superseded;
        }
        self.latest.store(Some(Arc::new(result)));
        EstimationOutcome::Ready(result)
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> &Generation {
        &self.generation
    }
}
