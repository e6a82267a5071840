//! REST backend client.
//!
//! Paginated history endpoints keyed by account address, plus the one POST
//! that authorizes an off-chain gas-fee withdrawal with a signed message.

use alloy::primitives::Address;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::backend::types::{Envelope, GasRecord, GasStatus, Page, PageQuery, RewardRecord};
use crate::config::schema::BackendConfig;

const REWARD_RECORDS_PATH: &str = "v1/reward/records";
const GAS_STATUS_PATH: &str = "v1/gas/status";
const GAS_DEPOSITS_PATH: &str = "v1/gas/deposits";
const GAS_WITHDRAWALS_PATH: &str = "v1/gas/withdrawals";
const GAS_WITHDRAW_PATH: &str = "v1/gas/withdraw";

/// Errors from the REST collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct WithdrawGasRequest {
    address: String,
    signature: String,
}

/// JSON client for the history/gas API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url: Url = config.base_url.parse()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        address: Address,
        query: PageQuery,
    ) -> Result<Page<T>, BackendError> {
        let url = self.base_url.join(path)?;
        let params = [
            ("address", lowercase(address)),
            ("page", query.page.to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        let response = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let envelope: Envelope<Page<T>> = response.json().await?;
        Ok(envelope.data)
    }

    /// Reward payout history for an account.
    pub async fn reward_records(
        &self,
        address: Address,
        query: PageQuery,
    ) -> Result<Page<RewardRecord>, BackendError> {
        self.get_page(REWARD_RECORDS_PATH, address, query).await
    }

    /// Current autocompound gas-fee account status.
    pub async fn gas_status(&self, address: Address) -> Result<GasStatus, BackendError> {
        let url = self.base_url.join(GAS_STATUS_PATH)?;
        let response = self
            .http
            .get(url)
            .query(&[("address", lowercase(address))])
            .send()
            .await?
            .error_for_status()?;
        let envelope: Envelope<GasStatus> = response.json().await?;
        Ok(envelope.data)
    }

    /// Gas deposit history for an account.
    pub async fn gas_deposits(
        &self,
        address: Address,
        query: PageQuery,
    ) -> Result<Page<GasRecord>, BackendError> {
        self.get_page(GAS_DEPOSITS_PATH, address, query).await
    }

    /// Gas withdrawal history for an account.
    pub async fn gas_withdrawals(
        &self,
        address: Address,
        query: PageQuery,
    ) -> Result<Page<GasRecord>, BackendError> {
        self.get_page(GAS_WITHDRAWALS_PATH, address, query).await
    }

    /// Authorize a gas-fee withdrawal. `signature` must be the wallet's
    /// signature over [`withdraw_gas_message`] for the same address.
    pub async fn withdraw_gas(
        &self,
        address: Address,
        signature: String,
    ) -> Result<(), BackendError> {
        let url = self.base_url.join(GAS_WITHDRAW_PATH)?;
        self.http
            .post(url)
            .json(&WithdrawGasRequest {
                address: lowercase(address),
                signature,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// The exact message the wallet signs to authorize a gas-fee withdrawal.
pub fn withdraw_gas_message(address: Address) -> String {
    format!(
        "Confirm Withdraw AutoCompound Gas Fee Receive: {}",
        lowercase(address)
    )
}

fn lowercase(address: Address) -> String {
    address.to_string().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_default_config() {
        let client = BackendClient::new(&BackendConfig::default()).unwrap();
        assert_eq!(client.base_url.scheme(), "https");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = BackendConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(
            BackendClient::new(&config),
            Err(BackendError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_withdraw_message_uses_lowercased_address() {
        let address: Address = "0xF39fd6E51AAD88f6f4CE6AB8827279CFffb92266"
            .parse()
            .unwrap();
        assert_eq!(
            withdraw_gas_message(address),
            "Confirm Withdraw AutoCompound Gas Fee Receive: 0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_paths_join_against_base() {
        let base: Url = "https://test-api-metro.dapdap.net/".parse().unwrap();
        let joined = base.join(REWARD_RECORDS_PATH).unwrap();
        assert_eq!(
            joined.as_str(),
            "https://test-api-metro.dapdap.net/v1/reward/records"
        );
    }
}
