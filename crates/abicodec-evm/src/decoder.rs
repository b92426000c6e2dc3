//! ABI decoder: byte block plus a type list in, owned values out.
//!
//! The decoder mirrors the encoder's head/tail walk. Every dynamic value is
//! re-parsed from a fresh sub-slice beginning at its own layout origin, so
//! interior offsets are naturally relative to the enclosing block and no
//! absolute positions thread through the recursion. Every read is preceded
//! by a bounds check; a malformed buffer can fail but never read out of
//! bounds.

use abicodec_core::{
    error::AbiError,
    types::{ParamType, WORD},
    value::Value,
};
use alloy_primitives::{Address, I256, U256};
use tracing::trace;

use crate::encoder::{check_depth, int_fits};

/// Decode `data` against `types` into a value list.
///
/// An empty buffer yields the empty list when `types` is empty, and a list
/// of [`Value::Null`] absence markers otherwise; callers that require the
/// parameters to be present must check for the markers themselves.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Value>, AbiError> {
    if types.is_empty() {
        return Ok(Vec::new());
    }
    if data.is_empty() {
        return Ok(vec![Value::Null; types.len()]);
    }
    trace!(params = types.len(), len = data.len(), "decoding parameter list");
    let refs: Vec<&ParamType> = types.iter().collect();
    decode_sequence(&refs, data, 0)
}

/// Walk one parameter list over `block`. Static values parse in place at
/// the head cursor; dynamic values parse at the offset their head slot
/// names, relative to the start of `block`.
fn decode_sequence(
    types: &[&ParamType],
    block: &[u8],
    depth: usize,
) -> Result<Vec<Value>, AbiError> {
    check_depth(depth)?;
    let mut out = Vec::with_capacity(types.len());
    let mut cursor = 0usize;

    for ty in types {
        if ty.is_dynamic() {
            let offset = read_offset(block, cursor)?;
            let (value, _) = decode_value(ty, &block[offset..], depth + 1)?;
            out.push(value);
            cursor += WORD;
        } else {
            let rest = block.get(cursor..).ok_or(AbiError::Truncated {
                at: cursor,
                needed: ty.head_width(),
                available: block.len().saturating_sub(cursor),
            })?;
            let (value, consumed) = decode_value(ty, rest, depth + 1)?;
            out.push(value);
            cursor += consumed;
        }
    }
    Ok(out)
}

/// Parse one value whose encoding starts at the beginning of `block`.
/// Returns the value together with the number of head bytes consumed
/// (meaningful for static types only).
fn decode_value(ty: &ParamType, block: &[u8], depth: usize) -> Result<(Value, usize), AbiError> {
    check_depth(depth)?;
    match ty {
        ParamType::Uint(bits) => {
            let v = U256::from_be_bytes(word_at(block, 0)?);
            if *bits < 256 && (v >> *bits as usize) != U256::ZERO {
                return Err(AbiError::RangeError { ty: ty.to_string(), value: v.to_string() });
            }
            Ok((Value::Uint(v), WORD))
        }
        ParamType::Int(bits) => {
            let v = I256::from_raw(U256::from_be_bytes(word_at(block, 0)?));
            if !int_fits(v, *bits as usize) {
                return Err(AbiError::RangeError { ty: ty.to_string(), value: v.to_string() });
            }
            Ok((Value::Int(v), WORD))
        }
        ParamType::Bool => {
            let word = word_at(block, 0)?;
            Ok((Value::Bool(word[WORD - 1] != 0), WORD))
        }
        ParamType::Address => {
            let word = word_at(block, 0)?;
            Ok((Value::Address(Address::from_slice(&word[12..])), WORD))
        }
        ParamType::FixedBytes(n) => {
            let word = word_at(block, 0)?;
            Ok((Value::Bytes(word[..*n].to_vec()), WORD))
        }
        ParamType::Bytes => {
            let (payload, consumed) = read_len_prefixed(block)?;
            Ok((Value::Bytes(payload), consumed))
        }
        ParamType::Str => {
            let (payload, consumed) = read_len_prefixed(block)?;
            let s = String::from_utf8(payload)
                .map_err(|e| AbiError::InvalidUtf8 { reason: e.to_string() })?;
            Ok((Value::Str(s), consumed))
        }
        ParamType::FixedArray(elem, n) => {
            let types: Vec<&ParamType> = std::iter::repeat(elem.as_ref()).take(*n).collect();
            let values = decode_sequence(&types, block, depth)?;
            Ok((Value::Array(values), *n * elem.head_width()))
        }
        ParamType::Array(elem) => {
            let len = read_array_length(block)?;
            let types: Vec<&ParamType> = std::iter::repeat(elem.as_ref()).take(len).collect();
            let values = decode_sequence(&types, &block[WORD..], depth)?;
            Ok((Value::Array(values), WORD))
        }
        ParamType::Tuple(fields) => {
            let types: Vec<&ParamType> = fields.iter().map(|(_, t)| t).collect();
            let values = decode_sequence(&types, block, depth)?;
            let named: Vec<(String, Value)> = fields
                .iter()
                .enumerate()
                .zip(values)
                .map(|((i, (name, _)), v)| {
                    let name =
                        if name.is_empty() { i.to_string() } else { name.clone() };
                    (name, v)
                })
                .collect();
            let consumed: usize = types.iter().map(|t| t.head_width()).sum();
            Ok((Value::Tuple(named), consumed))
        }
    }
}

/// Copy the 32-byte word at `at`, bounds-checked.
fn word_at(block: &[u8], at: usize) -> Result<[u8; WORD], AbiError> {
    match block.get(at..at + WORD) {
        Some(slice) => {
            let mut word = [0u8; WORD];
            word.copy_from_slice(slice);
            Ok(word)
        }
        None => Err(AbiError::Truncated {
            at,
            needed: WORD,
            available: block.len().saturating_sub(at),
        }),
    }
}

/// Read the offset word at `at` and validate it points inside `block`.
fn read_offset(block: &[u8], at: usize) -> Result<usize, AbiError> {
    let raw = U256::from_be_bytes(word_at(block, at)?);
    if raw > U256::from(block.len()) {
        return Err(AbiError::InvalidOffset {
            offset: raw.saturating_to::<usize>(),
            len: block.len(),
        });
    }
    Ok(raw.to::<usize>())
}

/// Read a length word followed by exactly that many payload bytes.
/// Consumed size counts the padding up to the next word boundary.
fn read_len_prefixed(block: &[u8]) -> Result<(Vec<u8>, usize), AbiError> {
    let len_word = U256::from_be_bytes(word_at(block, 0)?);
    let available = block.len() - WORD;
    if len_word > U256::from(available) {
        return Err(AbiError::Truncated {
            at: WORD,
            needed: len_word.saturating_to::<usize>(),
            available,
        });
    }
    let len = len_word.to::<usize>();
    let payload = block[WORD..WORD + len].to_vec();
    Ok((payload, WORD + len.div_ceil(WORD) * WORD))
}

/// Read a dynamic array's element count, rejecting counts that cannot fit
/// in the remaining buffer (one head word per element at minimum) before
/// any allocation happens.
fn read_array_length(block: &[u8]) -> Result<usize, AbiError> {
    let len_word = U256::from_be_bytes(word_at(block, 0)?);
    let max_elems = (block.len() - WORD) / WORD;
    if len_word > U256::from(max_elems) {
        return Err(AbiError::Truncated {
            at: WORD,
            needed: len_word.saturating_to::<usize>().saturating_mul(WORD),
            available: block.len() - WORD,
        });
    }
    Ok(len_word.to::<usize>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    fn word_with_trailing(v: u8) -> Vec<u8> {
        let mut w = vec![0u8; 32];
        w[31] = v;
        w
    }

    #[test]
    fn uint8_value_256_is_out_of_range() {
        let mut data = vec![0u8; 32];
        data[30] = 0x01; // 256
        let err = decode(&[ParamType::Uint(8)], &data);
        assert!(matches!(err, Err(AbiError::RangeError { .. })));
    }

    #[test]
    fn empty_buffer_yields_null_markers() {
        let values = decode(&[ParamType::Uint(256), ParamType::Bool], &[]).unwrap();
        assert_eq!(values, vec![Value::Null, Value::Null]);
        assert!(decode(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn truncated_word_rejected() {
        let err = decode(&[ParamType::Uint(256)], &[0u8; 31]);
        assert!(matches!(err, Err(AbiError::Truncated { .. })));
    }

    #[test]
    fn offset_past_end_rejected() {
        let mut data = vec![0u8; 32];
        data[31] = 0xff; // offset 255 into a 32-byte block
        let err = decode(&[ParamType::Bytes], &data);
        assert!(matches!(err, Err(AbiError::InvalidOffset { offset: 255, len: 32 })));
    }

    #[test]
    fn bytes_payload_must_match_declared_length() {
        // offset 0x20, then a length word claiming 64 bytes with none present
        let mut data = vec![0u8; 64];
        data[31] = 0x20;
        data[63] = 64;
        let err = decode(&[ParamType::Bytes], &data);
        assert!(matches!(err, Err(AbiError::Truncated { .. })));
    }

    #[test]
    fn absurd_array_length_rejected_before_allocation() {
        // offset 0x20, then a length word of 2^64
        let mut data = vec![0u8; 64];
        data[31] = 0x20;
        data[32 + 23] = 0x01;
        let err = decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &data);
        assert!(matches!(err, Err(AbiError::Truncated { .. })));
    }

    #[test]
    fn invalid_utf8_string_rejected() {
        let mut data = vec![0u8; 96];
        data[31] = 0x20; // offset
        data[63] = 2; // length
        data[64] = 0xff;
        data[65] = 0xfe;
        let err = decode(&[ParamType::Str], &data);
        assert!(matches!(err, Err(AbiError::InvalidUtf8 { .. })));
    }

    #[test]
    fn bool_reads_last_byte() {
        let values =
            decode(&[ParamType::Bool, ParamType::Bool], &[word_with_trailing(1), word_with_trailing(0)].concat())
                .unwrap();
        assert_eq!(values, vec![Value::Bool(true), Value::Bool(false)]);
    }

    #[test]
    fn transfer_arguments_roundtrip() {
        let types = vec![ParamType::Address, ParamType::Uint(256)];
        let values = vec![
            Value::Address("0x742d35cc6634c0532925a3b8d8e9eed89b7a6de6".parse().unwrap()),
            Value::Uint(U256::from(1_000_000_000_000_000_000u64)),
        ];
        let encoded = encode(&types, &values).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn bytes_and_uint_roundtrip() {
        let types = vec![ParamType::Bytes, ParamType::Uint(256)];
        let values = vec![Value::Bytes(vec![0x12, 0x34]), Value::Uint(U256::from(42u64))];
        let encoded = encode(&types, &values).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn dynamic_array_of_dynamic_tuples_roundtrips() {
        // The stress case for block-relative offsets: every level of this
        // type introduces its own offset table.
        let ty: ParamType = "((string,uint256[])[],bytes)".parse().unwrap();
        let row = |s: &str, ns: &[u64]| {
            Value::Tuple(vec![
                ("0".into(), Value::Str(s.into())),
                (
                    "1".into(),
                    Value::Array(ns.iter().map(|n| Value::Uint(U256::from(*n))).collect()),
                ),
            ])
        };
        let values = vec![Value::Tuple(vec![
            (
                "0".into(),
                Value::Array(vec![row("first", &[1, 2, 3]), row("", &[]), row("third", &[9])]),
            ),
            ("1".into(), Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef])),
        ])];
        let types = vec![ty];
        let encoded = encode(&types, &values).unwrap();
        assert_eq!(encoded.len() % 32, 0);
        assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn fixed_array_of_strings_roundtrips() {
        let ty: ParamType = "string[3]".parse().unwrap();
        let values = vec![Value::Array(vec![
            Value::Str("a".into()),
            Value::Str("".into()),
            Value::Str("ccc".into()),
        ])];
        let encoded = encode(&[ty.clone()], &values).unwrap();
        assert_eq!(decode(&[ty], &encoded).unwrap(), values);
    }

    #[test]
    fn named_tuple_fields_survive_decode() {
        let ty: ParamType = "(uint256 amount, address to)".parse().unwrap();
        let encoded = encode(
            &[ty.clone()],
            &[Value::Tuple(vec![
                ("amount".into(), Value::Uint(U256::from(5u64))),
                ("to".into(), Value::Address(Address::ZERO)),
            ])],
        )
        .unwrap();
        let decoded = decode(&[ty], &encoded).unwrap();
        if let Value::Tuple(fields) = &decoded[0] {
            assert_eq!(fields[0].0, "amount");
            assert_eq!(fields[1].0, "to");
        } else {
            panic!("expected tuple, got {:?}", decoded[0]);
        }
    }
}
