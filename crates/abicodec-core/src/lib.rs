//! # abicodec-core
//!
//! Shared foundation of the abicodec workspace: the ABI parameter type
//! model, the decoded value model, function/event definitions with cached
//! selectors and topic hashes, and the error taxonomy. The byte-level
//! codec lives in `abicodec-evm`; interface documents and lookup live in
//! `abicodec-registry`.

pub mod error;
pub mod event;
pub mod function;
pub mod hash;
pub mod types;
pub mod value;

pub use error::AbiError;
pub use event::{Event, EventParam};
pub use function::{Function, Param};
pub use hash::keccak256;
pub use types::{ParamType, MAX_TYPE_DEPTH, WORD};
pub use value::Value;
