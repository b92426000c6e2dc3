//! Decoded parameter values.
//!
//! `Value` is the parallel variant to [`ParamType`]: every decode produces
//! values owned by the caller, and every encode consumes values checked
//! against the declared type. Addresses and byte strings render as
//! lower-case `0x` hex at the API boundary.

use crate::error::AbiError;
use crate::types::ParamType;
use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded (or to-be-encoded) ABI value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Unsigned integer up to 256 bits.
    Uint(U256),
    /// Signed two's-complement integer up to 256 bits.
    Int(I256),
    Bool(bool),
    /// 20-byte account address.
    Address(Address),
    /// Byte string, covering both `bytesN` and dynamic `bytes`.
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<Value>),
    /// Named-field record. Unnamed fields carry their position as the name.
    Tuple(Vec<(String, Value)>),
    /// Absence marker: produced when decoding an empty buffer against a
    /// non-empty type list.
    Null,
}

impl Value {
    /// Returns `true` if this value is the absence marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<I256> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short label for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Address(_) => "address",
            Value::Bytes(_) => "bytes",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
            Value::Null => "null",
        }
    }

    /// Convert a loose JSON value into a typed `Value` for the expected
    /// parameter type. Accepts decimal or `0x`-hex strings and JSON numbers
    /// for integers, hex strings for addresses and byte strings, arrays for
    /// array and tuple types, and objects keyed by field name for tuples.
    pub fn coerce(ty: &ParamType, json: &serde_json::Value) -> Result<Value, AbiError> {
        use serde_json::Value as Json;

        let mismatch = || AbiError::TypeMismatch {
            expected: ty.to_string(),
            got: json_kind(json).to_string(),
        };

        match ty {
            ParamType::Uint(_) => match json {
                Json::Number(n) => {
                    let v = n.as_u64().ok_or_else(mismatch)?;
                    Ok(Value::Uint(U256::from(v)))
                }
                Json::String(s) => Ok(Value::Uint(parse_uint(s, ty)?)),
                _ => Err(mismatch()),
            },
            ParamType::Int(_) => match json {
                Json::Number(n) => {
                    let v = n.as_i64().ok_or_else(mismatch)?;
                    Ok(Value::Int(I256::try_from(v).map_err(|_| mismatch())?))
                }
                Json::String(s) => {
                    let v: I256 = s.trim().parse().map_err(|_| AbiError::TypeMismatch {
                        expected: ty.to_string(),
                        got: format!("'{s}'"),
                    })?;
                    Ok(Value::Int(v))
                }
                _ => Err(mismatch()),
            },
            ParamType::Bool => match json {
                Json::Bool(b) => Ok(Value::Bool(*b)),
                _ => Err(mismatch()),
            },
            ParamType::Address => match json {
                Json::String(s) => {
                    let addr: Address = s.trim().parse().map_err(|_| AbiError::TypeMismatch {
                        expected: "address".into(),
                        got: format!("'{s}'"),
                    })?;
                    Ok(Value::Address(addr))
                }
                _ => Err(mismatch()),
            },
            ParamType::Bytes | ParamType::FixedBytes(_) => match json {
                Json::String(s) => {
                    let raw = s.trim().strip_prefix("0x").unwrap_or(s.trim());
                    let bytes = hex::decode(raw).map_err(|_| AbiError::TypeMismatch {
                        expected: ty.to_string(),
                        got: format!("'{s}'"),
                    })?;
                    Ok(Value::Bytes(bytes))
                }
                _ => Err(mismatch()),
            },
            ParamType::Str => match json {
                Json::String(s) => Ok(Value::Str(s.clone())),
                _ => Err(mismatch()),
            },
            ParamType::Array(elem) | ParamType::FixedArray(elem, _) => match json {
                Json::Array(items) => {
                    let values: Result<Vec<_>, _> =
                        items.iter().map(|v| Value::coerce(elem, v)).collect();
                    Ok(Value::Array(values?))
                }
                _ => Err(mismatch()),
            },
            ParamType::Tuple(fields) => match json {
                Json::Array(items) => {
                    if items.len() != fields.len() {
                        return Err(mismatch());
                    }
                    let mut out = Vec::with_capacity(fields.len());
                    for ((name, fty), item) in fields.iter().zip(items) {
                        out.push((name.clone(), Value::coerce(fty, item)?));
                    }
                    Ok(Value::Tuple(out))
                }
                Json::Object(map) => {
                    let mut out = Vec::with_capacity(fields.len());
                    for (name, fty) in fields {
                        let item = map.get(name).ok_or_else(|| AbiError::TypeMismatch {
                            expected: ty.to_string(),
                            got: format!("object missing field '{name}'"),
                        })?;
                        out.push((name.clone(), Value::coerce(fty, item)?));
                    }
                    Ok(Value::Tuple(out))
                }
                _ => Err(mismatch()),
            },
        }
    }
}

fn parse_uint(s: &str, ty: &ParamType) -> Result<U256, AbiError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|_| AbiError::TypeMismatch {
        expected: ty.to_string(),
        got: format!("'{s}'"),
    })
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Address(a) => write!(f, "{a:#x}"),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                let parts: Vec<_> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Tuple(fields) => {
                let parts: Vec<_> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Null => write!(f, "null"),
        }
    }
}
