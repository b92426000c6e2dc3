//! # abicodec-registry
//!
//! Contract interface documents and the lookup layer over the codec
//! kernel: ABI JSON parsing, the immutable selector/topic registry, the
//! `ContractCodec` façade, and receipt-log helpers.

pub mod contract;
pub mod document;
pub mod receipt;
pub mod registry;

pub use contract::ContractCodec;
pub use document::{parse_document, AbiEntry, AbiParam};
pub use receipt::{DecodedReceiptLog, LogEntry, TransactionReceipt};
pub use registry::InterfaceRegistry;
