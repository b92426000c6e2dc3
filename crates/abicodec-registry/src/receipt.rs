//! Transaction-receipt log types and helpers.
//!
//! These are thin adapters over the log decoder: a receipt carries a list
//! of raw logs with hex-string payloads, and decoding filters to the logs
//! whose `topics[0]` is known to the registry.

use abicodec_core::error::AbiError;
use abicodec_evm::log::DecodedLog;
use serde::{Deserialize, Serialize};

/// A raw log as carried in a transaction receipt. Hex fields are
/// `0x`-prefixed strings; bookkeeping fields are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Contract address that emitted the log.
    pub address: String,
    /// `topics[0]` is the event signature hash for non-anonymous events;
    /// the rest are indexed parameters.
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters.
    #[serde(default = "default_hex")]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
}

fn default_hex() -> String {
    "0x".to_string()
}

/// A transaction receipt, reduced to what log decoding consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// A decoded log together with the metadata of the raw log it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedReceiptLog {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
    pub event: DecodedLog,
}

/// Parse a `0x`-prefixed 32-byte topic string.
pub(crate) fn parse_topic(topic: &str) -> Result<[u8; 32], AbiError> {
    let raw = topic.trim().strip_prefix("0x").unwrap_or(topic.trim());
    let bytes = hex::decode(raw).map_err(|e| AbiError::InvalidHex {
        reason: format!("topic '{topic}': {e}"),
    })?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| AbiError::InvalidHex {
        reason: format!("topic '{topic}' is not 32 bytes"),
    })
}

/// Parse a `0x`-prefixed hex data block.
pub(crate) fn parse_data(data: &str) -> Result<Vec<u8>, AbiError> {
    let raw = data.trim().strip_prefix("0x").unwrap_or(data.trim());
    hex::decode(raw).map_err(|e| AbiError::InvalidHex { reason: format!("data: {e}") })
}
