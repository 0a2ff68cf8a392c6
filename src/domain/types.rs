use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::BlockchainError;

/// Length in bytes of an account address.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte account address.
///
/// Displayed in long form (`0x` followed by 64 lowercase hex characters).
/// Parsing accepts the short form used for framework addresses (`0x1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    pub const ONE: Self = Self::from_u8(1);

    const fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = value;
        Self(bytes)
    }

    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Long-form hex representation with `0x` prefix.
    #[must_use]
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_literal())
    }
}

impl FromStr for AccountAddress {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > ADDRESS_LENGTH * 2 {
            return Err(BlockchainError::InvalidAddress(format!(
                "expected 1 to {} hex digits, got {}",
                ADDRESS_LENGTH * 2,
                digits.len()
            )));
        }

        // Left-pad short forms so "0x1" parses as the framework address.
        let padded = format!("{:0>width$}", digits, width = ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| BlockchainError::InvalidAddress(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_literal())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for u64 values the REST API encodes as decimal strings.
pub mod u64_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Ledger summary returned by the fullnode index endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde(with = "u64_string")]
    pub epoch: u64,
    #[serde(with = "u64_string")]
    pub ledger_version: u64,
    #[serde(with = "u64_string")]
    pub oldest_ledger_version: u64,
    #[serde(with = "u64_string")]
    pub ledger_timestamp: u64,
    #[serde(with = "u64_string")]
    pub block_height: u64,
    #[serde(with = "u64_string")]
    pub oldest_block_height: u64,
    pub node_role: String,
}

/// On-chain account state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountData {
    #[serde(with = "u64_string")]
    pub sequence_number: u64,
    pub authentication_key: String,
}

/// A Move resource stored under an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

/// Body of a view function request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewRequest {
    /// Fully qualified function id, e.g. `0x1::coin::balance`.
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

/// JSON entry function payload as accepted by transaction encoding endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

impl EntryFunctionPayload {
    #[must_use]
    pub fn new(
        function: String,
        type_arguments: Vec<String>,
        arguments: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            payload_type: "entry_function_payload".to_string(),
            function,
            type_arguments,
            arguments,
        }
    }
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health report for the shared clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub database: HealthStatus,
    pub network: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(database: HealthStatus, network: HealthStatus) -> Self {
        let status = match (&database, &network) {
            (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
            (HealthStatus::Unhealthy, HealthStatus::Unhealthy) => HealthStatus::Unhealthy,
            _ => HealthStatus::Degraded,
        };

        Self {
            status,
            database,
            network,
            timestamp: Utc::now(),
        }
    }
}
