//! Error types shared by every abicodec crate.

use thiserror::Error;

/// Errors surfaced by the codec, the registry, and the log decoder.
///
/// No error is recovered internally: on any failure the operation's output
/// is discarded and the error propagates to the caller with enough context
/// to identify the offending type and position.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Unknown event '{name}'")]
    UnknownEvent { name: String },

    #[error("Selector mismatch: expected {expected}, got {got}")]
    SelectorMismatch { expected: String, got: String },

    #[error("Arity mismatch: {expected} parameters, {got} values")]
    ArityMismatch { expected: usize, got: usize },

    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Value out of range for {ty}: {value}")]
    RangeError { ty: String, value: String },

    #[error("Invalid type: {reason}")]
    InvalidType { reason: String },

    #[error("Truncated input: need {needed} bytes at offset {at}, have {available}")]
    Truncated { at: usize, needed: usize, available: usize },

    #[error("Invalid offset {offset} into a {len}-byte block")]
    InvalidOffset { offset: usize, len: usize },

    #[error("String payload is not valid UTF-8: {reason}")]
    InvalidUtf8 { reason: String },

    #[error("Not enough topics: event needs {expected}, log has {got}")]
    TopicCount { expected: usize, got: usize },

    #[error("Duplicate definition for signature '{signature}'")]
    DuplicateDefinition { signature: String },

    #[error("Invalid hex input: {reason}")]
    InvalidHex { reason: String },

    #[error("Invalid interface document: {0}")]
    Document(#[from] serde_json::Error),
}
