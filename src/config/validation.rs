//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse and check contract and token addresses
//! - Reject values that would make the gas policy or timeouts nonsensical

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::ClientConfig;

/// A semantic configuration error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("chain_id must be non-zero")]
    ZeroChainId,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("gas_limit_multiplier must be at least 1.0, got {0}")]
    GasMultiplierTooLow(f64),

    #[error("slippage_bps must be below 10000, got {0}")]
    SlippageTooHigh(u64),
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// Validate a parsed configuration, collecting every problem at once.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain.chain_id == 0 {
        errors.push(ValidationError::ZeroChainId);
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "rpc_timeout_secs",
        });
    }
    if config.chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "receipt_timeout_secs",
        });
    }
    if config.chain.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "receipt_poll_interval_ms",
        });
    }
    if config.chain.gas_limit_multiplier < 1.0 {
        errors.push(ValidationError::GasMultiplierTooLow(
            config.chain.gas_limit_multiplier,
        ));
    }
    if config.orchestrator.slippage_bps >= 10_000 {
        errors.push(ValidationError::SlippageTooHigh(
            config.orchestrator.slippage_bps,
        ));
    }

    check_address("contracts.escrow", &config.contracts.escrow, &mut errors);
    check_address(
        "contracts.staked_token",
        &config.contracts.staked_token,
        &mut errors,
    );
    check_address("tokens.thor", &config.tokens.thor.address, &mut errors);
    check_address("tokens.ythor", &config.tokens.ythor.address, &mut errors);
    check_address("tokens.metro", &config.tokens.metro.address, &mut errors);
    check_address("tokens.xmetro", &config.tokens.xmetro.address, &mut errors);
    check_address("tokens.reward", &config.tokens.reward.address, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_address_collected() {
        let mut config = ClientConfig::default();
        config.contracts.escrow = "not-an-address".to_string();
        config.chain.chain_id = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_gas_multiplier_floor() {
        let mut config = ClientConfig::default();
        config.chain.gas_limit_multiplier = 0.5;
        assert!(validate_config(&config).is_err());
    }
}
