//! The contract codec façade: registry lookup glued to the codec kernel.
//!
//! Call-data is `selector ++ encode(input_types, args)`; return-data is
//! `encode(output_types, results)`; a log is one topic per indexed
//! parameter plus an encoded data block. `ContractCodec` owns the parsed
//! interface and exposes the operations callers actually use.

use abicodec_core::{error::AbiError, types::ParamType, value::Value};
use abicodec_evm::{decoder, encoder, log::DecodedLog};
use tracing::trace;

use crate::receipt::{
    parse_data, parse_topic, DecodedReceiptLog, LogEntry, TransactionReceipt,
};
use crate::registry::InterfaceRegistry;

/// Encoder/decoder for one contract interface.
pub struct ContractCodec {
    registry: InterfaceRegistry,
}

impl ContractCodec {
    /// Parse an interface document and build the codec.
    pub fn from_json(abi_json: &str) -> Result<Self, AbiError> {
        Ok(Self { registry: InterfaceRegistry::from_json(abi_json)? })
    }

    pub fn registry(&self) -> &InterfaceRegistry {
        &self.registry
    }

    /// Encode a function call: 4-byte selector followed by the encoded
    /// argument block.
    pub fn encode_function(&self, name: &str, args: &[Value]) -> Result<Vec<u8>, AbiError> {
        let function = self
            .registry
            .function(name)
            .ok_or_else(|| AbiError::UnknownFunction { name: name.to_string() })?;
        if args.len() != function.inputs.len() {
            return Err(AbiError::ArityMismatch {
                expected: function.inputs.len(),
                got: args.len(),
            });
        }
        trace!(function = %function.signature(), "encoding call");
        let mut call_data = function.selector().to_vec();
        call_data.extend_from_slice(&encoder::encode(&function.input_types(), args)?);
        Ok(call_data)
    }

    /// Decode call-data for a named function, validating the leading
    /// selector bytes.
    pub fn decode_function(&self, name: &str, call_data: &[u8]) -> Result<Vec<Value>, AbiError> {
        let function = self
            .registry
            .function(name)
            .ok_or_else(|| AbiError::UnknownFunction { name: name.to_string() })?;
        let (selector, payload) = split_selector(call_data)?;
        if selector != function.selector() {
            return Err(AbiError::SelectorMismatch {
                expected: function.selector_hex(),
                got: format!("0x{}", hex::encode(selector)),
            });
        }
        decoder::decode(&function.input_types(), payload)
    }

    /// Decode call-data by selector dispatch, returning the matched
    /// function name alongside the argument values.
    pub fn decode_call(&self, call_data: &[u8]) -> Result<(String, Vec<Value>), AbiError> {
        let (selector, payload) = split_selector(call_data)?;
        let function = self.registry.function_by_selector(&selector).ok_or_else(|| {
            AbiError::UnknownFunction { name: format!("0x{}", hex::encode(selector)) }
        })?;
        let values = decoder::decode(&function.input_types(), payload)?;
        Ok((function.name.clone(), values))
    }

    /// Decode a function's return-data block.
    pub fn decode_function_result(
        &self,
        name: &str,
        data: &[u8],
    ) -> Result<Vec<Value>, AbiError> {
        let function = self
            .registry
            .function(name)
            .ok_or_else(|| AbiError::UnknownFunction { name: name.to_string() })?;
        decoder::decode(&function.output_types(), data)
    }

    /// Encode a bare parameter list (no selector).
    pub fn encode_params(types: &[ParamType], values: &[Value]) -> Result<Vec<u8>, AbiError> {
        encoder::encode(types, values)
    }

    /// Decode a bare parameter list (no selector).
    pub fn decode_params(types: &[ParamType], data: &[u8]) -> Result<Vec<Value>, AbiError> {
        decoder::decode(types, data)
    }

    /// Decode an event log. The event is located by `name` when given,
    /// otherwise by matching `topics[0]` against the registry.
    pub fn decode_log(
        &self,
        data: &[u8],
        topics: &[String],
        name: Option<&str>,
    ) -> Result<DecodedLog, AbiError> {
        let topic_words: Result<Vec<[u8; 32]>, AbiError> =
            topics.iter().map(|t| parse_topic(t)).collect();
        let topic_words = topic_words?;

        let event = match name {
            Some(n) => self
                .registry
                .event(n)
                .ok_or_else(|| AbiError::UnknownEvent { name: n.to_string() })?,
            None => topic_words
                .first()
                .and_then(|t| self.registry.event_by_topic(t))
                .ok_or_else(|| AbiError::UnknownEvent {
                    name: topics.first().cloned().unwrap_or_else(|| "<no topics>".into()),
                })?,
        };
        abicodec_evm::log::decode_log(event, data, &topic_words)
    }

    /// Decode every log in a receipt whose `topics[0]` is known to the
    /// registry. Unknown topics and undecodable logs are skipped.
    pub fn decode_receipt_logs(&self, receipt: &TransactionReceipt) -> Vec<DecodedReceiptLog> {
        receipt.logs.iter().filter_map(|log| self.try_decode_receipt_log(log)).collect()
    }

    /// Linear scan of a receipt's decodable logs for a specific event name.
    pub fn receipt_logs_named(
        &self,
        receipt: &TransactionReceipt,
        name: &str,
    ) -> Vec<DecodedReceiptLog> {
        self.decode_receipt_logs(receipt)
            .into_iter()
            .filter(|entry| entry.event.name == name)
            .collect()
    }

    fn try_decode_receipt_log(&self, log: &LogEntry) -> Option<DecodedReceiptLog> {
        let first = log.topics.first()?;
        let topic0 = parse_topic(first).ok()?;
        let event = self.registry.event_by_topic(&topic0)?;

        let topic_words: Result<Vec<[u8; 32]>, _> =
            log.topics.iter().map(|t| parse_topic(t)).collect();
        let data = parse_data(&log.data).ok()?;
        let decoded = abicodec_evm::log::decode_log(event, &data, &topic_words.ok()?).ok()?;

        Some(DecodedReceiptLog {
            address: log.address.clone(),
            block_number: log.block_number,
            transaction_hash: log.transaction_hash.clone(),
            log_index: log.log_index,
            event: decoded,
        })
    }

    /// The cached 4-byte selector of a named function.
    pub fn function_selector(&self, name: &str) -> Result<[u8; 4], AbiError> {
        self.registry
            .function(name)
            .map(|f| f.selector())
            .ok_or_else(|| AbiError::UnknownFunction { name: name.to_string() })
    }

    /// The cached 32-byte topic hash of a named event.
    pub fn event_topic(&self, name: &str) -> Result<[u8; 32], AbiError> {
        self.registry
            .event(name)
            .map(|e| e.topic())
            .ok_or_else(|| AbiError::UnknownEvent { name: name.to_string() })
    }
}

/// Split call-data into its selector and argument payload.
fn split_selector(call_data: &[u8]) -> Result<([u8; 4], &[u8]), AbiError> {
    if call_data.len() < 4 {
        return Err(AbiError::Truncated { at: 0, needed: 4, available: call_data.len() });
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&call_data[..4]);
    Ok((selector, &call_data[4..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    const ERC20_ABI: &str = r#"[
        {"type": "function", "name": "transfer",
         "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
         "outputs": [{"name": "", "type": "bool"}]},
        {"type": "event", "name": "Transfer",
         "inputs": [
            {"name": "from", "type": "address", "indexed": true},
            {"name": "to", "type": "address", "indexed": true},
            {"name": "value", "type": "uint256", "indexed": false}
         ]}
    ]"#;

    fn codec() -> ContractCodec {
        ContractCodec::from_json(ERC20_ABI).unwrap()
    }

    fn transfer_args() -> Vec<Value> {
        vec![
            Value::Address(
                "0x742d35cc6634c0532925a3b8d8e9eed89b7a6de6".parse::<Address>().unwrap(),
            ),
            Value::Uint(U256::from(1_000_000_000_000_000_000u64)),
        ]
    }

    #[test]
    fn encode_function_prepends_selector() {
        let call_data = codec().encode_function("transfer", &transfer_args()).unwrap();
        assert_eq!(call_data.len(), 68);
        assert_eq!(&call_data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn decode_function_roundtrips() {
        let c = codec();
        let call_data = c.encode_function("transfer", &transfer_args()).unwrap();
        let values = c.decode_function("transfer", &call_data).unwrap();
        assert_eq!(values, transfer_args());
    }

    #[test]
    fn decode_call_dispatches_by_selector() {
        let c = codec();
        let call_data = c.encode_function("transfer", &transfer_args()).unwrap();
        let (name, values) = c.decode_call(&call_data).unwrap();
        assert_eq!(name, "transfer");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn wrong_selector_rejected() {
        let c = codec();
        let mut call_data = c.encode_function("transfer", &transfer_args()).unwrap();
        call_data[0] ^= 0xff;
        let err = c.decode_function("transfer", &call_data);
        assert!(matches!(err, Err(AbiError::SelectorMismatch { .. })));
    }

    #[test]
    fn short_calldata_rejected() {
        let err = codec().decode_function("transfer", &[0xa9, 0x05]);
        assert!(matches!(err, Err(AbiError::Truncated { .. })));
    }

    #[test]
    fn unknown_function_rejected() {
        let err = codec().encode_function("mint", &[]);
        assert!(matches!(err, Err(AbiError::UnknownFunction { .. })));
    }

    #[test]
    fn wrong_arity_rejected() {
        let err = codec().encode_function("transfer", &[Value::Bool(true)]);
        assert!(matches!(err, Err(AbiError::ArityMismatch { expected: 2, got: 1 })));
    }

    #[test]
    fn decode_result_uses_output_types() {
        let c = codec();
        let mut data = vec![0u8; 32];
        data[31] = 1;
        let values = c.decode_function_result("transfer", &data).unwrap();
        assert_eq!(values, vec![Value::Bool(true)]);
    }

    #[test]
    fn bare_parameter_lists_roundtrip() {
        let types = vec![ParamType::Uint(256), ParamType::Str];
        let values = vec![Value::Uint(U256::from(9u64)), Value::Str("params".into())];
        let encoded = ContractCodec::encode_params(&types, &values).unwrap();
        assert_eq!(ContractCodec::decode_params(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn selector_and_topic_lookups() {
        let c = codec();
        assert_eq!(hex::encode(c.function_selector("transfer").unwrap()), "a9059cbb");
        assert_eq!(
            hex::encode(c.event_topic("Transfer").unwrap()),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert!(matches!(
            c.event_topic("Approval"),
            Err(AbiError::UnknownEvent { .. })
        ));
    }

    #[test]
    fn decode_log_by_topic_lookup() {
        let c = codec();
        let topics = vec![
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef".to_string(),
            "0x000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa96045".to_string(),
            "0x000000000000000000000000ab5801a7d398351b8be11c439e05c5b3259aec9b".to_string(),
        ];
        let mut data = vec![0u8; 32];
        data[24..].copy_from_slice(&1_000_000_000_000_000_000u64.to_be_bytes());

        let decoded = c.decode_log(&data, &topics, None).unwrap();
        assert_eq!(decoded.name, "Transfer");
        assert_eq!(
            decoded.param("value").unwrap().as_uint().unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );

        let by_name = c.decode_log(&data, &topics, Some("Transfer")).unwrap();
        assert_eq!(by_name, decoded);
    }

    #[test]
    fn unknown_topic_without_name_rejected() {
        let c = codec();
        let topics = vec![format!("0x{}", hex::encode([0u8; 32]))];
        let err = c.decode_log(&[], &topics, None);
        assert!(matches!(err, Err(AbiError::UnknownEvent { .. })));
    }
}
