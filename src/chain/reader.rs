//! Read-only chain access.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Query chain state (blocks, balances, allowances, receipts)
//! - Hand out typed contract instances for view calls and simulations
//! - Enforce a timeout on every RPC round trip

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionReceipt;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::contracts::{IERC20, MigrationEscrow, StakedMetro};
use crate::chain::types::{BlockInfo, ChainConfig, ChainError, ChainId, ChainResult};

/// Blockchain read client with failover support.
#[derive(Clone)]
pub struct ChainReader {
    /// Providers in priority order (primary first).
    providers: Vec<RootProvider>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl ChainReader {
    /// Create a new reader from configuration.
    ///
    /// Connection is lazy; a reachable node is not required here. The chain ID
    /// is verified best-effort so a misconfigured endpoint shows up in logs
    /// instead of as silent wrong-chain reads.
    pub async fn new(config: ChainConfig) -> ChainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(RootProvider::new_http(primary));

        for url_str in &config.failover_urls {
            match url_str.parse() {
                Ok(url) => providers.push(RootProvider::new_http(url)),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let reader = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match reader.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Chain reader initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Chain reader initialized but chain verification failed"
                );
            }
        }

        Ok(reader)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Run a primitive query against each provider in turn until one answers.
    async fn failover<'a, T, F, Fut>(&'a self, what: &'static str, call: F) -> ChainResult<T>
    where
        F: Fn(&'a RootProvider) -> Fut,
        Fut: Future<Output = Result<T, alloy::transports::TransportError>> + 'a,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, query = what, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, query = what, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ChainError::Rpc(format!("all RPC providers failed: {what}")))
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        self.failover("chain_id", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> ChainResult<u64> {
        self.failover("block_number", |p| async move { p.get_block_number().await })
            .await
    }

    /// Get the latest block's number and timestamp.
    ///
    /// Unlock-time math uses this instead of the client clock.
    pub async fn latest_block(&self) -> ChainResult<BlockInfo> {
        let block = self
            .failover("latest_block", |p| async move {
                p.get_block_by_number(BlockNumberOrTag::Latest).await
            })
            .await?
            .ok_or_else(|| ChainError::Rpc("node returned no latest block".to_string()))?;

        Ok(BlockInfo {
            number: block.header.number,
            timestamp: block.header.timestamp,
        })
    }

    /// Get the native-asset balance of an address.
    pub async fn get_balance(&self, address: Address) -> ChainResult<U256> {
        self.failover("balance", move |p| async move { p.get_balance(address).await })
            .await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> ChainResult<u64> {
        self.failover("transaction_count", move |p| async move {
            p.get_transaction_count(address).await
        })
        .await
    }

    /// Get a transaction receipt by hash, `None` while still pending.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ChainResult<Option<TransactionReceipt>> {
        self.failover("receipt", move |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> ChainResult<u128> {
        self.failover("gas_price", |p| async move { p.get_gas_price().await })
            .await
    }

    /// ERC-20 balance of `owner`.
    pub async fn erc20_balance(&self, token: Address, owner: Address) -> ChainResult<U256> {
        let erc20 = IERC20::new(token, self.primary().clone());
        self.contract_call(erc20.balanceOf(owner).call()).await
    }

    /// ERC-20 allowance granted by `owner` to `spender`.
    pub async fn erc20_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> ChainResult<U256> {
        let erc20 = IERC20::new(token, self.primary().clone());
        self.contract_call(erc20.allowance(owner, spender).call())
            .await
    }

    /// Typed handle on the migration escrow.
    pub fn escrow(&self, address: Address) -> MigrationEscrow::MigrationEscrowInstance<RootProvider> {
        MigrationEscrow::new(address, self.primary().clone())
    }

    /// Typed handle on the xMETRO staking token.
    pub fn staked(&self, address: Address) -> StakedMetro::StakedMetroInstance<RootProvider> {
        StakedMetro::new(address, self.primary().clone())
    }

    /// Await a typed contract call under the configured RPC timeout.
    pub(crate) async fn contract_call<T>(
        &self,
        fut: impl Future<Output = Result<T, alloy::contract::Error>>,
    ) -> ChainResult<T> {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ChainError::Contract(e)),
            Err(_) => Err(ChainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Check if the chain is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Get the primary provider.
    pub fn primary(&self) -> &RootProvider {
        &self.providers[0]
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

impl std::fmt::Debug for ChainReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainReader")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
