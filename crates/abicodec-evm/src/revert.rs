//! Decode the two standard EVM revert payloads.
//!
//! `require(cond, "message")` reverts with `Error(string)` data
//! (`0x08c379a0` ++ ABI-encoded string); Solidity 0.8+ checked failures
//! revert with `Panic(uint256)` (`0x4e487b71` ++ ABI-encoded code).

use abicodec_core::{types::ParamType, value::Value};

use crate::decoder;

/// The 4-byte selector for `Error(string)`.
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// The 4-byte selector for `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Try to decode revert data as an `Error(string)` payload.
///
/// Returns `None` if the data does not carry that selector or the payload
/// does not decode as a single string.
pub fn decode_error_string(data: &[u8]) -> Option<String> {
    let payload = data.strip_prefix(&ERROR_STRING_SELECTOR)?;
    match decoder::decode(&[ParamType::Str], payload).ok()?.pop()? {
        Value::Str(s) => Some(s),
        _ => None,
    }
}

/// Try to decode revert data as a `Panic(uint256)` payload.
///
/// Returns the panic code together with its human-readable meaning.
pub fn decode_panic(data: &[u8]) -> Option<(u64, &'static str)> {
    let payload = data.strip_prefix(&PANIC_SELECTOR)?;
    match decoder::decode(&[ParamType::Uint(256)], payload).ok()?.pop()? {
        Value::Uint(v) => {
            let code = u64::try_from(v).ok()?;
            Some((code, panic_meaning(code)))
        }
        _ => None,
    }
}

/// Map a Solidity panic code to a description.
pub fn panic_meaning(code: u64) -> &'static str {
    match code {
        0x00 => "generic compiler-inserted panic",
        0x01 => "assert() called with false condition",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division or modulo by zero",
        0x21 => "invalid enum value",
        0x22 => "corrupted storage byte array",
        0x31 => ".pop() on empty array",
        0x32 => "out-of-bounds array access",
        0x41 => "too much memory allocated (out of memory)",
        0x51 => "called zero-initialized internal function pointer",
        _ => "unknown panic code",
    }
}
