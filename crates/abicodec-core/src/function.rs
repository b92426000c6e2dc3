//! Function definitions and selector computation.

use crate::hash::keccak256;
use crate::types::ParamType;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A single named, typed parameter of a function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A callable contract function.
///
/// The 4-byte selector is computed once at construction from the canonical
/// signature and cached; parameter names never influence it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    selector: [u8; 4],
}

impl Function {
    pub fn new(name: impl Into<String>, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        let name = name.into();
        let sig = render_signature(&name, inputs.iter().map(|p| &p.ty));
        let digest = keccak256(sig.as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&digest[..4]);
        Self { name, inputs, outputs, selector }
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        render_signature(&self.name, self.inputs.iter().map(|p| &p.ty))
    }

    /// The cached 4-byte selector.
    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    /// Selector as lower-case `0x` hex.
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector))
    }

    /// Input types in declaration order, cloned for a codec call.
    pub fn input_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.ty.clone()).collect()
    }

    /// Output types in declaration order, cloned for a codec call.
    pub fn output_types(&self) -> Vec<ParamType> {
        self.outputs.iter().map(|p| p.ty.clone()).collect()
    }
}

/// Render `name(ty1,ty2,...)` using canonical type forms, names excluded.
pub(crate) fn render_signature<'a>(
    name: &str,
    types: impl Iterator<Item = &'a ParamType>,
) -> String {
    let mut sig = String::with_capacity(name.len() + 2);
    sig.push_str(name);
    sig.push('(');
    for (i, ty) in types.enumerate() {
        if i > 0 {
            sig.push(',');
        }
        let _ = write!(sig, "{ty}");
    }
    sig.push(')');
    sig
}
