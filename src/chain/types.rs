//! Chain-specific types and error definitions.

use alloy::primitives::Address;
use thiserror::Error;

pub use crate::config::schema::ChainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// The connected wallet account, as supplied by the wallet collaborator.
///
/// Appears on connect, is cleared on disconnect or chain switch. This layer
/// never creates or mutates one on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
    pub chain_id: u64,
}

impl Account {
    pub fn new(address: Address, chain_id: u64) -> Self {
        Self { address, chain_id }
    }

    /// Whether the account is on the expected chain.
    pub fn is_on_chain(&self, chain_id: u64) -> bool {
        self.chain_id == chain_id
    }
}

/// Latest observed block data, used for timestamp-based calculations
/// instead of the client clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub number: u64,
    pub timestamp: u64,
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transport-level failure from the provider.
    #[error("transport error: {0}")]
    Transport(#[from] alloy::transports::TransportError),

    /// A typed contract call failed (revert, decode error, transport).
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    /// Transaction was not confirmed within the configured bound.
    #[error("transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Signer or transaction building error.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded the configured maximum.
    #[error("gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(8453u64);
        assert_eq!(chain_id.0, 8453);
        assert_eq!(u64::from(chain_id), 8453);
    }

    #[test]
    fn test_account_chain_check() {
        let account = Account::new(Address::ZERO, 8453);
        assert!(account.is_on_chain(8453));
        assert!(!account.is_on_chain(1));
    }

    #[test]
    fn test_error_display() {
        let err = ChainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = ChainError::GasPriceTooHigh {
            current_gwei: 600,
            max_gwei: 500,
        };
        assert!(err.to_string().contains("600"));
    }
}
