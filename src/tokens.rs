//! Token descriptors.

use alloy::primitives::Address;

use crate::config::schema::{TokenConfig, TokensConfig};
use crate::config::validation::ValidationError;

/// Static description of a token. Immutable once configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub address: Address,
    pub chain_id: u64,
}

impl TokenDescriptor {
    fn from_config(config: &TokenConfig, chain_id: u64) -> Result<Self, ValidationError> {
        let address = config
            .address
            .parse()
            .map_err(|_| ValidationError::InvalidAddress {
                field: "token",
                value: config.address.clone(),
            })?;
        Ok(Self {
            symbol: config.symbol.clone(),
            name: config.name.clone(),
            decimals: config.decimals,
            address,
            chain_id,
        })
    }
}

/// The full set of tokens the product touches.
#[derive(Debug, Clone)]
pub struct KnownTokens {
    /// Legacy token, 10M/3M phases.
    pub thor: TokenDescriptor,
    /// Legacy vesting token.
    pub ythor: TokenDescriptor,
    /// The new token.
    pub metro: TokenDescriptor,
    /// Share receipt token minted on stake.
    pub xmetro: TokenDescriptor,
    /// Secondary reward token.
    pub reward: TokenDescriptor,
}

impl KnownTokens {
    pub fn from_config(config: &TokensConfig, chain_id: u64) -> Result<Self, ValidationError> {
        Ok(Self {
            thor: TokenDescriptor::from_config(&config.thor, chain_id)?,
            ythor: TokenDescriptor::from_config(&config.ythor, chain_id)?,
            metro: TokenDescriptor::from_config(&config.metro, chain_id)?,
            xmetro: TokenDescriptor::from_config(&config.xmetro, chain_id)?,
            reward: TokenDescriptor::from_config(&config.reward, chain_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens_from_default_config() {
        let tokens = KnownTokens::from_config(&TokensConfig::default(), 8453).unwrap();
        assert_eq!(tokens.metro.symbol, "METRO");
        assert_eq!(tokens.metro.decimals, 18);
        assert_eq!(tokens.metro.chain_id, 8453);
    }

    #[test]
    fn test_bad_token_address_rejected() {
        let mut config = TokensConfig::default();
        config.metro.address = "0xnope".to_string();
        assert!(KnownTokens::from_config(&config, 8453).is_err());
    }
}
