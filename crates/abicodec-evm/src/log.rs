//! Event-log decoding: topics plus data block into a named record.
//!
//! Indexed parameters live in `topics[1..]` (or `topics[0..]` for anonymous
//! events); the rest are ABI-encoded into the log's data block. An indexed
//! parameter of dynamic type is stored as the keccak-256 of its encoding:
//! the original value is unrecoverable from the log alone, so the raw
//! 32-byte topic is passed through instead.

use abicodec_core::{
    error::AbiError,
    event::Event,
    types::ParamType,
    value::Value,
};
use serde::{Deserialize, Serialize};

use crate::decoder;

/// A decoded event log: the event name and its parameters as an ordered
/// named record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedLog {
    pub name: String,
    /// Parameters in declaration order. Unnamed parameters carry synthetic
    /// `field0`, `field1`, … names.
    pub params: Vec<(String, Value)>,
}

impl DecodedLog {
    /// Look up a decoded parameter by name.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Decode a single log against an event definition.
///
/// For non-anonymous events `topics[0]` is the signature slot and is not
/// decoded; the caller is responsible for having matched it against
/// [`Event::topic`] already.
pub fn decode_log(
    event: &Event,
    data: &[u8],
    topics: &[[u8; 32]],
) -> Result<DecodedLog, AbiError> {
    let indexed = event.indexed_inputs();
    let skip = if event.anonymous { 0 } else { 1 };
    let needed = indexed.len() + skip;
    if topics.len() < needed {
        return Err(AbiError::TopicCount { expected: needed, got: topics.len() });
    }

    let mut indexed_values = Vec::with_capacity(indexed.len());
    for (i, param) in indexed.iter().enumerate() {
        let topic = &topics[i + skip];
        let value = if param.ty.is_dynamic() {
            // keccak256 of the value's encoding, not the value.
            Value::Bytes(topic.to_vec())
        } else {
            decode_topic_word(&param.ty, topic)?
        };
        indexed_values.push(value);
    }

    let data_types: Vec<ParamType> =
        event.data_inputs().iter().map(|p| p.ty.clone()).collect();
    let data_values = decoder::decode(&data_types, data)?;

    // Merge back into declaration order.
    let mut indexed_iter = indexed_values.into_iter();
    let mut data_iter = data_values.into_iter();
    let mut params = Vec::with_capacity(event.inputs.len());
    for (i, input) in event.inputs.iter().enumerate() {
        let value = if input.indexed {
            indexed_iter.next().unwrap_or(Value::Null)
        } else {
            data_iter.next().unwrap_or(Value::Null)
        };
        let name = if input.name.is_empty() {
            format!("field{i}")
        } else {
            input.name.clone()
        };
        params.push((name, value));
    }

    Ok(DecodedLog { name: event.name.clone(), params })
}

/// Decode one static value from a 32-byte topic word.
fn decode_topic_word(ty: &ParamType, topic: &[u8; 32]) -> Result<Value, AbiError> {
    let mut values = decoder::decode(std::slice::from_ref(ty), topic)?;
    Ok(values.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use abicodec_core::event::EventParam;
    use alloy_primitives::{Address, U256};

    const TRANSFER_FROM: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";
    const TRANSFER_TO: &str = "0xab5801a7d398351b8be11c439e05c5b3259aec9b";

    fn transfer_event() -> Event {
        Event::new(
            "Transfer",
            vec![
                EventParam::new("from", ParamType::Address, true),
                EventParam::new("to", ParamType::Address, true),
                EventParam::new("value", ParamType::Uint(256), false),
            ],
            false,
        )
    }

    fn padded_address(addr: &str) -> [u8; 32] {
        let bytes = hex::decode(addr.trim_start_matches("0x")).unwrap();
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&bytes);
        word
    }

    fn one_ether_word() -> Vec<u8> {
        let mut data = vec![0u8; 32];
        data[24..].copy_from_slice(&1_000_000_000_000_000_000u64.to_be_bytes());
        data
    }

    #[test]
    fn transfer_log_decodes_to_named_record() {
        let ev = transfer_event();
        let topics = vec![ev.topic(), padded_address(TRANSFER_FROM), padded_address(TRANSFER_TO)];
        let decoded = decode_log(&ev, &one_ether_word(), &topics).unwrap();

        assert_eq!(decoded.name, "Transfer");
        assert_eq!(
            decoded.param("from").unwrap().as_address().unwrap(),
            TRANSFER_FROM.parse::<Address>().unwrap()
        );
        assert_eq!(
            decoded.param("to").unwrap().as_address().unwrap(),
            TRANSFER_TO.parse::<Address>().unwrap()
        );
        assert_eq!(
            decoded.param("value").unwrap().as_uint().unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn missing_topic_is_rejected() {
        let ev = transfer_event();
        let topics = vec![ev.topic(), padded_address(TRANSFER_FROM)];
        let err = decode_log(&ev, &one_ether_word(), &topics);
        assert!(matches!(err, Err(AbiError::TopicCount { expected: 3, got: 2 })));
    }

    #[test]
    fn anonymous_event_uses_all_topics() {
        let ev = Event::new(
            "Ping",
            vec![EventParam::new("who", ParamType::Address, true)],
            true,
        );
        let topics = vec![padded_address(TRANSFER_FROM)];
        let decoded = decode_log(&ev, &[], &topics).unwrap();
        assert_eq!(
            decoded.param("who").unwrap().as_address().unwrap(),
            TRANSFER_FROM.parse::<Address>().unwrap()
        );
    }

    #[test]
    fn indexed_dynamic_parameter_passes_hash_through() {
        let ev = Event::new(
            "Named",
            vec![EventParam::new("label", ParamType::Str, true)],
            false,
        );
        let hash = abicodec_core::keccak256(b"hello");
        let decoded = decode_log(&ev, &[], &[ev.topic(), hash]).unwrap();
        assert_eq!(decoded.param("label").unwrap().as_bytes().unwrap(), &hash);
    }

    #[test]
    fn unnamed_parameters_get_positional_names() {
        let ev = Event::new(
            "Raw",
            vec![
                EventParam::new("", ParamType::Uint(256), true),
                EventParam::new("", ParamType::Bool, false),
            ],
            false,
        );
        let mut flag = vec![0u8; 32];
        flag[31] = 1;
        let mut topic = [0u8; 32];
        topic[31] = 9;
        let decoded = decode_log(&ev, &flag, &[ev.topic(), topic]).unwrap();
        assert_eq!(decoded.params[0].0, "field0");
        assert_eq!(decoded.params[1].0, "field1");
        assert_eq!(decoded.param("field1").unwrap().as_bool(), Some(true));
    }
}
