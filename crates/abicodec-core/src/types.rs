//! The canonical ABI parameter type model.
//!
//! Every encode/decode path in the workspace works against `ParamType`.
//! The dynamism predicate defined here is the single source of truth for
//! the head/tail layout split; the encoder and decoder both consult it, so
//! the two sides can never disagree about where an offset slot goes.

use crate::error::AbiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The EVM word size in bytes. Every encoded slot is a multiple of this.
pub const WORD: usize = 32;

/// Maximum allowed type-nesting depth, guarding both the type-string parser
/// and codec recursion against pathological inputs.
pub const MAX_TYPE_DEPTH: usize = 32;

/// An ABI parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    /// Unsigned integer. Width in bits, 8..=256 in steps of 8.
    Uint(u16),
    /// Signed two's-complement integer. Width in bits, 8..=256 in steps of 8.
    Int(u16),
    /// Boolean, encoded as a full word.
    Bool,
    /// 20-byte account address.
    Address,
    /// Fixed-size byte string (`bytes1` .. `bytes32`). Length in bytes.
    FixedBytes(usize),
    /// Variable-length byte string.
    Bytes,
    /// UTF-8 string.
    Str,
    /// Fixed-length array of a single element type.
    FixedArray(Box<ParamType>, usize),
    /// Variable-length array of a single element type.
    Array(Box<ParamType>),
    /// Tuple with optionally-named fields. Names are kept for decoded
    /// records and ignored for signature computation.
    Tuple(Vec<(String, ParamType)>),
}

impl ParamType {
    /// Returns `true` if the encoded length of this type depends on the
    /// value: such types live in the tail and are referenced from the head
    /// by a 32-byte offset slot.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::Str | ParamType::Array(_) => true,
            ParamType::FixedArray(elem, _) => elem.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(|(_, t)| t.is_dynamic()),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in the head of an encoded block:
    /// one offset word for dynamic types, the full inline size for static
    /// ones.
    pub fn head_width(&self) -> usize {
        if self.is_dynamic() {
            return WORD;
        }
        match self {
            ParamType::FixedArray(elem, n) => n * elem.head_width(),
            ParamType::Tuple(fields) => fields.iter().map(|(_, t)| t.head_width()).sum(),
            _ => WORD,
        }
    }

    /// Nesting depth of the type tree (a bare atom is depth 1).
    pub fn depth(&self) -> usize {
        match self {
            ParamType::FixedArray(elem, _) | ParamType::Array(elem) => 1 + elem.depth(),
            ParamType::Tuple(fields) => {
                1 + fields.iter().map(|(_, t)| t.depth()).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

impl fmt::Display for ParamType {
    /// Canonical signature rendering: `uint256`, `bytes32`, `address[3]`,
    /// `(uint256,bool)[]`. Tuple field names are omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint(bits) => write!(f, "uint{bits}"),
            ParamType::Int(bits) => write!(f, "int{bits}"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Address => write!(f, "address"),
            ParamType::FixedBytes(n) => write!(f, "bytes{n}"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::Str => write!(f, "string"),
            ParamType::FixedArray(elem, n) => write!(f, "{elem}[{n}]"),
            ParamType::Array(elem) => write!(f, "{elem}[]"),
            ParamType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, (_, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s.trim(), 0)
    }
}

fn invalid(reason: impl Into<String>) -> AbiError {
    AbiError::InvalidType { reason: reason.into() }
}

fn parse_type(s: &str, depth: usize) -> Result<ParamType, AbiError> {
    if depth > MAX_TYPE_DEPTH {
        return Err(invalid(format!("type nesting deeper than {MAX_TYPE_DEPTH}")));
    }
    if s.is_empty() {
        return Err(invalid("empty type string"));
    }

    // Trailing `[..]` binds last: `uint8[2][]` is a dynamic array of
    // `uint8[2]`. Array size tokens never nest, so the matching `[` is the
    // rightmost one.
    if let Some(stripped) = s.strip_suffix(']') {
        let open = stripped.rfind('[').ok_or_else(|| invalid(format!("unmatched ']' in '{s}'")))?;
        let elem = parse_type(&stripped[..open], depth + 1)?;
        let size = &stripped[open + 1..];
        return if size.is_empty() {
            Ok(ParamType::Array(Box::new(elem)))
        } else {
            let n: usize = size
                .parse()
                .map_err(|_| invalid(format!("non-numeric array size '{size}' in '{s}'")))?;
            Ok(ParamType::FixedArray(Box::new(elem), n))
        };
    }

    // Tuples: `(a,b,...)`, with the `tuple(...)` spelling accepted for
    // compatibility with interface documents.
    let tuple_rest = s.strip_prefix("tuple(").or_else(|| s.strip_prefix('('));
    if let Some(rest) = tuple_rest {
        let body = rest
            .strip_suffix(')')
            .ok_or_else(|| invalid(format!("unmatched '(' in '{s}'")))?;
        return parse_tuple_body(body, depth);
    }

    parse_atom(s)
}

/// Split a tuple body on top-level commas in a single left-to-right pass
/// tracking bracket depth, then parse each field with its optional name.
fn parse_tuple_body(body: &str, depth: usize) -> Result<ParamType, AbiError> {
    let mut fields = Vec::new();
    if body.trim().is_empty() {
        return Ok(ParamType::Tuple(fields));
    }

    let mut level = 0usize;
    let mut start = 0usize;
    let mut pieces = Vec::new();
    for (i, c) in body.char_indices() {
        match c {
            '(' | '[' => level += 1,
            ')' | ']' => {
                level = level
                    .checked_sub(1)
                    .ok_or_else(|| invalid(format!("unmatched '{c}' in '({body})'")))?;
            }
            ',' if level == 0 => {
                pieces.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if level != 0 {
        return Err(invalid(format!("unmatched bracket in '({body})'")));
    }
    pieces.push(&body[start..]);

    for piece in pieces {
        let (ty_str, name) = split_field_name(piece.trim())?;
        let ty = parse_type(ty_str, depth + 1)?;
        fields.push((name.to_string(), ty));
    }
    Ok(ParamType::Tuple(fields))
}

/// Split `uint256 amount` into the type text and the optional field name.
/// The name separator is the first whitespace outside any bracket.
fn split_field_name(piece: &str) -> Result<(&str, &str), AbiError> {
    let mut level = 0usize;
    for (i, c) in piece.char_indices() {
        match c {
            '(' | '[' => level += 1,
            ')' | ']' => level = level.saturating_sub(1),
            c if c.is_whitespace() && level == 0 => {
                let name = piece[i..].trim();
                if name.contains(char::is_whitespace) {
                    return Err(invalid(format!("malformed tuple field '{piece}'")));
                }
                return Ok((&piece[..i], name));
            }
            _ => {}
        }
    }
    Ok((piece, ""))
}

fn parse_atom(s: &str) -> Result<ParamType, AbiError> {
    match s {
        "bool" => return Ok(ParamType::Bool),
        "address" => return Ok(ParamType::Address),
        "string" => return Ok(ParamType::Str),
        "bytes" => return Ok(ParamType::Bytes),
        // Bare widths normalise so canonical rendering is stable.
        "uint" => return Ok(ParamType::Uint(256)),
        "int" => return Ok(ParamType::Int(256)),
        _ => {}
    }

    if let Some(width) = s.strip_prefix("uint") {
        return Ok(ParamType::Uint(parse_int_width(s, width)?));
    }
    if let Some(width) = s.strip_prefix("int") {
        return Ok(ParamType::Int(parse_int_width(s, width)?));
    }
    if let Some(len) = s.strip_prefix("bytes") {
        let n: usize = len
            .parse()
            .map_err(|_| invalid(format!("non-numeric bytes length in '{s}'")))?;
        if !(1..=32).contains(&n) {
            return Err(invalid(format!("bytes length out of range in '{s}'")));
        }
        return Ok(ParamType::FixedBytes(n));
    }

    Err(invalid(format!("unknown type '{s}'")))
}

fn parse_int_width(full: &str, width: &str) -> Result<u16, AbiError> {
    let bits: u16 = width
        .parse()
        .map_err(|_| invalid(format!("non-numeric integer width in '{full}'")))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(invalid(format!("invalid integer width in '{full}'")));
    }
    Ok(bits)
}
