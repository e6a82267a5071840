//! Orchestrator error taxonomy and outcomes.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::chain::ChainError;
use crate::validation::ValidationError;

/// A confirmed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub hash: TxHash,
    pub block_number: Option<u64>,
}

/// Errors surfaced by the submission pipeline.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A prior submission in the same slot is still in flight. The second
    /// call is a no-op; nothing was broadcast.
    #[error("another transaction is pending in the {0} slot")]
    SlotBusy(&'static str),

    /// No connected account.
    #[error("wallet not connected")]
    NotConnected,

    /// Connected to the wrong chain.
    #[error("wrong network: expected chain {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// Local validation rejected the action; nothing reached the chain.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The spender's allowance is insufficient; the approve action must
    /// complete and confirm before this action becomes available.
    #[error("approval required: spender {spender} lacks allowance for token {token}")]
    ApprovalRequired { token: Address, spender: Address },

    /// The receipt reported revert.
    #[error("transaction reverted: {hash}")]
    Reverted { hash: TxHash },

    /// The user declined to sign.
    #[error("user rejected transaction")]
    UserRejected,

    /// A preview this action depends on could not be produced.
    #[error("estimation failed")]
    EstimationFailed,

    /// Everything else from the chain collaborator.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Whether an error (anywhere in its cause chain) reads as the user
/// declining the signature request. Matched case-insensitively, the way
/// wallet libraries phrase it.
pub fn is_user_rejection(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if e.to_string().to_lowercase().contains("user rejected") {
            return true;
        }
        current = e.source();
    }
    false
}
