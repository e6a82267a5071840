//! Transaction signing and submission.
//!
//! # Responsibilities
//! - Load the signing key (environment variable only, never logged)
//! - Build, sign, and broadcast state-changing calls
//! - Best-effort gas estimation with a safety margin
//! - Await transaction finality with a bounded poll loop
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, timeout};

use crate::chain::calls::{ContractSet, WriteCall};
use crate::chain::types::{ChainConfig, ChainError, ChainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "METRO_PRIVATE_KEY";

/// Blockchain write client.
///
/// Broadcasts serialize on an internal lock so concurrent action slots cannot
/// race each other to the same nonce.
pub struct ChainWriter {
    provider: RootProvider,
    signer: PrivateKeySigner,
    wallet: EthereumWallet,
    config: ChainConfig,
    timeout_duration: Duration,
    broadcast_lock: Mutex<()>,
}

impl ChainWriter {
    /// Create a writer from a hex-encoded private key string.
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str, config: ChainConfig) -> ChainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("invalid private key format: {}", e)))?;

        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        tracing::info!(
            address = %signer.address(),
            chain_id = config.chain_id,
            "Chain writer initialized"
        );

        Ok(Self {
            provider: RootProvider::new_http(url),
            wallet: EthereumWallet::from(signer.clone()),
            signer,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
            broadcast_lock: Mutex::new(()),
        })
    }

    /// Load the signing key from `METRO_PRIVATE_KEY`.
    pub fn from_env(config: ChainConfig) -> ChainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ChainError::Wallet(format!("environment variable {} not set", PRIVATE_KEY_ENV_VAR))
        })?;
        Self::from_private_key(&private_key, config)
    }

    /// The signer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The chain ID this writer signs for.
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Best-effort gas estimate with the configured safety margin applied.
    ///
    /// `None` means estimation failed; the caller submits with the configured
    /// fallback limit instead. Estimation failure is logged, never fatal.
    pub async fn estimate_gas_limit(
        &self,
        call: &WriteCall,
        contracts: &ContractSet,
    ) -> Option<u64> {
        let tx = TransactionRequest::default()
            .with_from(self.address())
            .with_to(call.target(contracts))
            .with_input(call.calldata());

        let estimate = timeout(self.timeout_duration, async {
            self.provider.estimate_gas(tx).await
        })
        .await;

        match estimate {
            Ok(Ok(gas)) => {
                let padded = (gas as f64 * self.config.gas_limit_multiplier) as u64;
                Some(padded)
            }
            Ok(Err(e)) => {
                tracing::warn!(method = call.method(), error = %e, "Gas estimation failed");
                None
            }
            Err(_) => {
                tracing::warn!(method = call.method(), "Gas estimation timed out");
                None
            }
        }
    }

    /// Sign and broadcast a call, returning its transaction hash.
    ///
    /// Once this returns, the transaction is in flight and cannot be
    /// cancelled from this layer.
    pub async fn send(
        &self,
        call: &WriteCall,
        contracts: &ContractSet,
        gas_limit: u64,
    ) -> ChainResult<TxHash> {
        let _guard = self.broadcast_lock.lock().await;

        let from = self.address();
        let nonce = timeout(self.timeout_duration, async {
            self.provider.get_transaction_count(from).await
        })
        .await
        .map_err(|_| ChainError::Timeout(self.config.rpc_timeout_secs))??;

        let gas_price = timeout(self.timeout_duration, async {
            self.provider.get_gas_price().await
        })
        .await
        .map_err(|_| ChainError::Timeout(self.config.rpc_timeout_secs))??;

        let gas_price_gwei = gas_price / 1_000_000_000;
        if gas_price_gwei > self.config.max_gas_price_gwei as u128 {
            return Err(ChainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: self.config.max_gas_price_gwei,
            });
        }

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(call.target(contracts))
            .with_input(call.calldata())
            .with_value(U256::ZERO)
            .with_nonce(nonce)
            .with_gas_price(gas_price)
            .with_chain_id(self.config.chain_id)
            .with_gas_limit(gas_limit);

        let envelope = tx
            .build(&self.wallet)
            .await
            .map_err(|e| ChainError::Wallet(format!("signing failed: {}", e)))?;

        let pending = timeout(self.timeout_duration, async {
            self.provider
                .send_raw_transaction(envelope.encoded_2718().as_slice())
                .await
        })
        .await
        .map_err(|_| ChainError::Timeout(self.config.rpc_timeout_secs))??;

        let tx_hash = *pending.tx_hash();
        tracing::info!(method = call.method(), tx_hash = %tx_hash, nonce, "Transaction broadcast");
        Ok(tx_hash)
    }

    /// Wait for a transaction to reach finality.
    ///
    /// Polls for the receipt and then for the configured confirmation depth,
    /// bounded by `receipt_timeout_secs`. A reverted receipt is returned as-is;
    /// classifying it is the caller's job.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> ChainResult<TransactionReceipt> {
        let required_confirmations = self.config.confirmation_blocks;
        let timeout_duration = Duration::from_secs(self.config.receipt_timeout_secs);
        let poll_interval = Duration::from_millis(self.config.receipt_poll_interval_ms);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.get_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Ok(receipt);
                }

                let current_block = timeout(self.timeout_duration, async {
                    self.provider.get_block_number().await
                })
                .await
                .map_err(|_| ChainError::Timeout(self.config.rpc_timeout_secs))??;

                let tx_block = receipt.block_number.unwrap_or(current_block);
                let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

                if confirmations >= required_confirmations {
                    return Ok(receipt);
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(ChainError::ConfirmationTimeout(
                self.config.receipt_timeout_secs,
            )),
        }
    }

    async fn get_receipt(&self, tx_hash: TxHash) -> ChainResult<Option<TransactionReceipt>> {
        timeout(self.timeout_duration, async {
            self.provider.get_transaction_receipt(tx_hash).await
        })
        .await
        .map_err(|_| ChainError::Timeout(self.config.rpc_timeout_secs))?
        .map_err(ChainError::from)
    }

    /// Sign arbitrary message bytes (with the Ethereum prefix) and return the
    /// signature as a 0x-prefixed hex string, for off-chain attestations.
    pub async fn sign_message(&self, message: &[u8]) -> ChainResult<String> {
        let signature = self
            .signer
            .sign_message(message)
            .await
            .map_err(|e| ChainError::Wallet(format!("message signing failed: {}", e)))?;
        Ok(format!("0x{}", alloy::hex::encode(signature.as_bytes())))
    }
}

impl std::fmt::Debug for ChainWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainWriter")
            .field("address", &self.signer.address())
            .field("chain_id", &self.config.chain_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_config() -> ChainConfig {
        ChainConfig {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            ..ChainConfig::default()
        }
    }

    #[test]
    fn test_writer_from_private_key() {
        let writer = ChainWriter::from_private_key(TEST_PRIVATE_KEY, test_config()).unwrap();
        assert_eq!(
            writer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_writer_with_0x_prefix() {
        let writer =
            ChainWriter::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY), test_config())
                .unwrap();
        assert_eq!(
            writer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = ChainWriter::from_private_key("invalid_key", test_config());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("invalid private key"));
    }

    #[tokio::test]
    async fn test_sign_message() {
        let writer = ChainWriter::from_private_key(TEST_PRIVATE_KEY, test_config()).unwrap();
        let signature = writer.sign_message(b"Hello, World!").await.unwrap();
        // 0x + 65 bytes hex
        assert_eq!(signature.len(), 2 + 130);
        assert!(signature.starts_with("0x"));
    }
}
