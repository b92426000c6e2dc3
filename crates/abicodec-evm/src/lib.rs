//! # abicodec-evm
//!
//! The ABI codec kernel: the recursive head/tail encoder and decoder, the
//! event-log decoder layered on top, and the standard revert-payload
//! decoders.
//!
//! ## Layout notes
//! - Static types encode inline in the head; dynamic types get a 32-byte
//!   offset slot pointing into the tail.
//! - Offsets are relative to the start of the block being encoded, at every
//!   nesting level: a nested tuple's interior offsets count from the
//!   tuple's own first byte.
//! - The decoder never reads without a prior bounds check.

pub mod decoder;
pub mod encoder;
pub mod log;
pub mod revert;

pub use decoder::decode;
pub use encoder::encode;
pub use log::{decode_log, DecodedLog};
pub use revert::{decode_error_string, decode_panic};
