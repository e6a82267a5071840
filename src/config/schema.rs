//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal config is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Chain access (RPC endpoints, timeouts, gas policy).
    pub chain: ChainConfig,

    /// Deployed protocol contract addresses.
    pub contracts: ContractsConfig,

    /// Token descriptors for the migration and staking pairs.
    pub tokens: TokensConfig,

    /// REST backend settings.
    pub backend: BackendConfig,

    /// Static-config cache persistence.
    pub cache: CacheConfig,

    /// Orchestration policy (debounce, slippage, approval mode).
    pub orchestrator: OrchestratorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain access configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (8453 for Base).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,

    /// Upper bound on waiting for a transaction receipt, in seconds.
    pub receipt_timeout_secs: u64,

    /// Receipt poll interval in milliseconds.
    pub receipt_poll_interval_ms: u64,

    /// Safety margin applied to gas estimates (1.2 = +20%).
    pub gas_limit_multiplier: f64,

    /// Gas limit used when estimation fails.
    pub fallback_gas_limit: u64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://mainnet.base.org".to_string(),
            failover_urls: Vec::new(),
            chain_id: 8453,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            receipt_timeout_secs: 300,
            receipt_poll_interval_ms: 2000,
            gas_limit_multiplier: 1.2,
            fallback_gas_limit: 400_000,
            max_gas_price_gwei: 500,
        }
    }
}

/// Deployed protocol contract addresses (hex strings, parsed on load).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// THOR/yTHOR → METRO migration escrow.
    pub escrow: String,

    /// xMETRO staking token.
    pub staked_token: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            escrow: "0x7A3f8aBcE0a195E33a2AB0D2A8c80e0f9b0B1cC1".to_string(),
            staked_token: "0x4Ed1dFa05D75Ca746Af88217a113a168E1F879B4".to_string(),
        }
    }
}

/// A single token's static description.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub address: String,
}

/// Token descriptors for everything the product touches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokensConfig {
    pub thor: TokenConfig,
    pub ythor: TokenConfig,
    pub metro: TokenConfig,
    pub xmetro: TokenConfig,
    pub reward: TokenConfig,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            thor: TokenConfig {
                symbol: "THOR".to_string(),
                name: "THORSwap Token".to_string(),
                decimals: 18,
                address: "0xD5e771e9CDE455B8d855D83a44670A2bD9b369eE".to_string(),
            },
            ythor: TokenConfig {
                symbol: "yTHOR".to_string(),
                name: "Vesting THOR".to_string(),
                decimals: 18,
                address: "0x3d054D7a5eed98f03544e02ba9cd2934fC7befd0".to_string(),
            },
            metro: TokenConfig {
                symbol: "METRO".to_string(),
                name: "METRO Token".to_string(),
                decimals: 18,
                address: "0xEBD847a7bAC2Bf0E00e8057Fed519b22b4598365".to_string(),
            },
            xmetro: TokenConfig {
                symbol: "xMETRO".to_string(),
                name: "xMETRO Token".to_string(),
                decimals: 18,
                address: "0x4Ed1dFa05D75Ca746Af88217a113a168E1F879B4".to_string(),
            },
            reward: TokenConfig {
                symbol: "USDC".to_string(),
                name: "USD Coin".to_string(),
                decimals: 18,
                address: "0x72742449CE7d19A1d3aEd5579795D70c4B23AAc0".to_string(),
            },
        }
    }
}

/// REST backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the history/gas API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://test-api-metro.dapdap.net/".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Static-config cache persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Path of the cache file. Empty disables persistence.
    pub path: String,

    /// Cache namespace version; a bump invalidates old entries.
    pub version: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "metro-config-cache.json".to_string(),
            version: 1,
        }
    }
}

/// Orchestration policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// How long a terminal slot state stays visible before the slot reads
    /// as idle again, in milliseconds.
    pub terminal_hold_ms: u64,

    /// Debounce applied to keystroke-driven validation, in milliseconds.
    pub validation_debounce_ms: u64,

    /// Debounce applied to estimation requests, in milliseconds.
    pub estimation_debounce_ms: u64,

    /// Approve the maximum representable value instead of the exact amount.
    pub max_approve: bool,

    /// Slippage tolerance for autocompound swaps, in basis points.
    pub slippage_bps: u64,

    /// Batch limit passed to the withdraw-style calls (maxRequests/maxLocks).
    pub withdraw_batch_limit: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            terminal_hold_ms: 3000,
            validation_debounce_ms: 300,
            estimation_debounce_ms: 500,
            max_approve: true,
            slippage_bps: 100,
            withdraw_batch_limit: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
