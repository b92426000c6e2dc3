//! ABI encoder: values plus a matching type list in, 32-byte-word layout out.
//!
//! The layout is head/tail: the head holds static values inline and one
//! offset word per dynamic value; the tails follow in parameter order. Every
//! offset is relative to the start of the block being encoded, so a nested
//! tuple's or array's interior offsets count from that entity's own first
//! byte. Each recursive call builds its block in isolation and the parent
//! only ever concatenates.

use abicodec_core::{
    error::AbiError,
    types::{ParamType, MAX_TYPE_DEPTH, WORD},
    value::Value,
};
use alloy_primitives::{I256, U256};
use tracing::trace;

/// Encode `values` against `types` into a contiguous ABI byte block.
///
/// The output length is always a multiple of 32. Fails without producing
/// any output if the lists differ in length, a value does not match its
/// declared type, or an integer exceeds its declared width.
pub fn encode(types: &[ParamType], values: &[Value]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::ArityMismatch { expected: types.len(), got: values.len() });
    }
    trace!(params = types.len(), "encoding parameter list");
    let items: Vec<(&ParamType, &Value)> = types.iter().zip(values.iter()).collect();
    encode_sequence(&items, 0)
}

/// Encode one parameter list with the head/tail split. Offsets written into
/// the head are relative to the start of the returned block.
fn encode_sequence(items: &[(&ParamType, &Value)], depth: usize) -> Result<Vec<u8>, AbiError> {
    check_depth(depth)?;
    let head_size: usize = items.iter().map(|(ty, _)| ty.head_width()).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail: Vec<u8> = Vec::new();

    for (ty, value) in items {
        if ty.is_dynamic() {
            let offset = U256::from(head_size + tail.len());
            head.extend_from_slice(&offset.to_be_bytes::<WORD>());
            tail.extend_from_slice(&encode_value(ty, value, depth + 1)?);
        } else {
            head.extend_from_slice(&encode_value(ty, value, depth + 1)?);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Encode a single value as its own block (no outer offset slot).
fn encode_value(ty: &ParamType, value: &Value, depth: usize) -> Result<Vec<u8>, AbiError> {
    check_depth(depth)?;
    match (ty, value) {
        (ParamType::Uint(bits), Value::Uint(v)) => {
            if *bits < 256 && (*v >> *bits as usize) != U256::ZERO {
                return Err(range_error(ty, value));
            }
            Ok(v.to_be_bytes::<WORD>().to_vec())
        }
        (ParamType::Int(bits), Value::Int(v)) => {
            if !int_fits(*v, *bits as usize) {
                return Err(range_error(ty, value));
            }
            Ok(v.into_raw().to_be_bytes::<WORD>().to_vec())
        }
        (ParamType::Bool, Value::Bool(b)) => {
            let mut word = [0u8; WORD];
            word[WORD - 1] = *b as u8;
            Ok(word.to_vec())
        }
        (ParamType::Address, Value::Address(a)) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(a.as_slice());
            Ok(word.to_vec())
        }
        (ParamType::FixedBytes(n), Value::Bytes(b)) => {
            if b.len() != *n {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    got: format!("{} bytes", b.len()),
                });
            }
            let mut word = [0u8; WORD];
            word[..b.len()].copy_from_slice(b);
            Ok(word.to_vec())
        }
        (ParamType::Bytes, Value::Bytes(b)) => Ok(encode_len_prefixed(b)),
        (ParamType::Str, Value::Str(s)) => Ok(encode_len_prefixed(s.as_bytes())),
        (ParamType::FixedArray(elem, n), Value::Array(items)) => {
            if items.len() != *n {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    got: format!("{} elements", items.len()),
                });
            }
            let pairs: Vec<(&ParamType, &Value)> =
                items.iter().map(|v| (elem.as_ref(), v)).collect();
            encode_sequence(&pairs, depth)
        }
        (ParamType::Array(elem), Value::Array(items)) => {
            let mut out = U256::from(items.len()).to_be_bytes::<WORD>().to_vec();
            let pairs: Vec<(&ParamType, &Value)> =
                items.iter().map(|v| (elem.as_ref(), v)).collect();
            out.extend_from_slice(&encode_sequence(&pairs, depth)?);
            Ok(out)
        }
        (ParamType::Tuple(fields), Value::Tuple(values)) => {
            if values.len() != fields.len() {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    got: format!("{} fields", values.len()),
                });
            }
            let pairs: Vec<(&ParamType, &Value)> = fields
                .iter()
                .zip(values.iter())
                .map(|((_, fty), (_, v))| (fty, v))
                .collect();
            encode_sequence(&pairs, depth)
        }
        // Positional lists are accepted for tuple types: field names carry
        // no layout meaning.
        (ParamType::Tuple(fields), Value::Array(values)) => {
            if values.len() != fields.len() {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    got: format!("{} elements", values.len()),
                });
            }
            let pairs: Vec<(&ParamType, &Value)> = fields
                .iter()
                .zip(values.iter())
                .map(|((_, fty), v)| (fty, v))
                .collect();
            encode_sequence(&pairs, depth)
        }
        _ => Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
            got: value.kind().to_string(),
        }),
    }
}

/// Length word followed by the payload zero-padded to the next word.
fn encode_len_prefixed(payload: &[u8]) -> Vec<u8> {
    let padded = payload.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&U256::from(payload.len()).to_be_bytes::<WORD>());
    out.extend_from_slice(payload);
    out.resize(WORD + padded, 0);
    out
}

/// A signed value fits in `bits` iff every bit above position `bits - 1`
/// equals the sign bit of the two's-complement raw word.
pub(crate) fn int_fits(v: I256, bits: usize) -> bool {
    if bits == 256 {
        return true;
    }
    let shifted = v.into_raw() >> (bits - 1);
    shifted == U256::ZERO || shifted == (U256::MAX >> (bits - 1))
}

fn range_error(ty: &ParamType, value: &Value) -> AbiError {
    AbiError::RangeError { ty: ty.to_string(), value: value.to_string() }
}

pub(crate) fn check_depth(depth: usize) -> Result<(), AbiError> {
    if depth > MAX_TYPE_DEPTH {
        return Err(AbiError::InvalidType {
            reason: format!("type nesting deeper than {MAX_TYPE_DEPTH}"),
        });
    }
    Ok(())
}
