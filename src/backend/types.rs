//! REST backend wire types.

use serde::{Deserialize, Serialize};

/// The API wraps every payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Page<T> {
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub total_page: u64,
}

/// Page selector for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

/// One reward payout record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RewardRecord {
    pub amount: String,
    pub token: String,
    pub tx_hash: String,
    pub created_at: u64,
}

/// One gas deposit or withdrawal record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GasRecord {
    pub amount: String,
    pub tx_hash: String,
    pub created_at: u64,
}

/// Autocompound gas-fee account status.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GasStatus {
    pub balance_gas_fee: String,
    pub enable: bool,
    pub total_gas_fee: String,
    pub used_gas_fee: String,
    pub withdraw: bool,
    pub withdraw_gas_fee: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_with_missing_fields() {
        let page: Page<RewardRecord> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_envelope_unwraps() {
        let raw = r#"{"data": {"data": [{"amount": "1.5"}], "total": 1, "page": 1}}"#;
        let envelope: Envelope<Page<RewardRecord>> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data.data[0].amount, "1.5");
        assert_eq!(envelope.data.total, 1);
    }

    #[test]
    fn test_gas_status_wire_format() {
        let raw = r#"{
            "balance_gas_fee": "0.01",
            "enable": true,
            "total_gas_fee": "0.05",
            "used_gas_fee": "0.04",
            "withdraw": false,
            "withdraw_gas_fee": "0"
        }"#;
        let status: GasStatus = serde_json::from_str(raw).unwrap();
        assert!(status.enable);
        assert_eq!(status.balance_gas_fee, "0.01");
    }
}
