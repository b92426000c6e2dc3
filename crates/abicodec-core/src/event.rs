//! Event definitions and topic-hash computation.

use crate::function::render_signature;
use crate::hash::keccak256;
use crate::types::ParamType;
use serde::{Deserialize, Serialize};

/// A single event parameter. Indexed parameters are emitted as log topics;
/// the rest are ABI-encoded into the log's data block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParam {
    pub name: String,
    pub ty: ParamType,
    pub indexed: bool,
}

impl EventParam {
    pub fn new(name: impl Into<String>, ty: ParamType, indexed: bool) -> Self {
        Self { name: name.into(), ty, indexed }
    }
}

/// An emittable contract event.
///
/// The 32-byte topic hash is computed once at construction from the
/// canonical signature and cached on the definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub inputs: Vec<EventParam>,
    /// Anonymous events omit the signature hash from `topics[0]`.
    pub anonymous: bool,
    topic: [u8; 32],
}

impl Event {
    pub fn new(name: impl Into<String>, inputs: Vec<EventParam>, anonymous: bool) -> Self {
        let name = name.into();
        let sig = render_signature(&name, inputs.iter().map(|p| &p.ty));
        let topic = keccak256(sig.as_bytes());
        Self { name, inputs, anonymous, topic }
    }

    /// Canonical signature, e.g. `Transfer(address,address,uint256)`.
    pub fn signature(&self) -> String {
        render_signature(&self.name, self.inputs.iter().map(|p| &p.ty))
    }

    /// The cached 32-byte topic hash.
    pub fn topic(&self) -> [u8; 32] {
        self.topic
    }

    /// Topic as lower-case `0x` hex.
    pub fn topic_hex(&self) -> String {
        format!("0x{}", hex::encode(self.topic))
    }

    /// Indexed parameters in declaration order (log `topics[1..]`).
    pub fn indexed_inputs(&self) -> Vec<&EventParam> {
        self.inputs.iter().filter(|p| p.indexed).collect()
    }

    /// Non-indexed parameters in declaration order (the log data block).
    pub fn data_inputs(&self) -> Vec<&EventParam> {
        self.inputs.iter().filter(|p| !p.indexed).collect()
    }
}
