//! Parsing of the contract interface document (standard ABI JSON).
//!
//! The document is an ordered list of entries tagged `function`, `event`,
//! `constructor`, `fallback`, `receive` or `error`; only the first two are
//! consumed here. Tuple parameters carry their field list in `components`,
//! recursively.

use abicodec_core::{
    error::AbiError,
    event::{Event, EventParam},
    function::{Function, Param},
    types::ParamType,
};
use serde::{Deserialize, Serialize};

/// One entry of an interface document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default)]
    pub anonymous: bool,
}

/// One parameter descriptor of an interface document entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Event-only: whether the parameter is emitted as a log topic.
    #[serde(default)]
    pub indexed: bool,
    /// Tuple field descriptors, present when `type` starts with `tuple`.
    #[serde(default)]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// Resolve the descriptor into a `ParamType`, recursing through
    /// `components` for tuple types.
    pub fn resolve(&self) -> Result<ParamType, AbiError> {
        if let Some(suffix) = self.ty.strip_prefix("tuple") {
            let fields: Result<Vec<(String, ParamType)>, AbiError> = self
                .components
                .iter()
                .map(|c| Ok((c.name.clone(), c.resolve()?)))
                .collect();
            return apply_array_suffixes(ParamType::Tuple(fields?), suffix, &self.ty);
        }
        self.ty.parse()
    }
}

/// Wrap `base` in the array layers described by `suffix` (e.g. `[2][]`),
/// applied left to right so the rightmost suffix is outermost.
fn apply_array_suffixes(
    base: ParamType,
    suffix: &str,
    full: &str,
) -> Result<ParamType, AbiError> {
    let mut ty = base;
    let mut rest = suffix;
    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('[')
            .and_then(|r| r.split_once(']'))
            .ok_or_else(|| AbiError::InvalidType {
                reason: format!("malformed array suffix in '{full}'"),
            })?;
        let (size, remaining) = inner;
        ty = if size.is_empty() {
            ParamType::Array(Box::new(ty))
        } else {
            let n: usize = size.parse().map_err(|_| AbiError::InvalidType {
                reason: format!("non-numeric array size in '{full}'"),
            })?;
            ParamType::FixedArray(Box::new(ty), n)
        };
        rest = remaining;
    }
    Ok(ty)
}

/// Parse an interface document from its JSON text.
pub fn parse_document(json: &str) -> Result<Vec<AbiEntry>, AbiError> {
    Ok(serde_json::from_str(json)?)
}

/// Build a `Function` definition from a document entry.
pub fn function_from_entry(entry: &AbiEntry) -> Result<Function, AbiError> {
    let inputs = params_from_descriptors(&entry.inputs)?;
    let outputs = params_from_descriptors(&entry.outputs)?;
    Ok(Function::new(entry.name.clone(), inputs, outputs))
}

/// Build an `Event` definition from a document entry.
pub fn event_from_entry(entry: &AbiEntry) -> Result<Event, AbiError> {
    let inputs: Result<Vec<EventParam>, AbiError> = entry
        .inputs
        .iter()
        .map(|p| Ok(EventParam::new(p.name.clone(), p.resolve()?, p.indexed)))
        .collect();
    Ok(Event::new(entry.name.clone(), inputs?, entry.anonymous))
}

fn params_from_descriptors(descriptors: &[AbiParam]) -> Result<Vec<Param>, AbiError> {
    descriptors
        .iter()
        .map(|p| Ok(Param::new(p.name.clone(), p.resolve()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_types() {
        let p = AbiParam {
            name: "to".into(),
            ty: "address".into(),
            indexed: false,
            components: vec![],
        };
        assert_eq!(p.resolve().unwrap(), ParamType::Address);
    }

    #[test]
    fn resolves_tuple_with_components() {
        let json = r#"{
            "name": "order",
            "type": "tuple",
            "components": [
                {"name": "maker", "type": "address"},
                {"name": "amounts", "type": "uint256[]"}
            ]
        }"#;
        let p: AbiParam = serde_json::from_str(json).unwrap();
        let ty = p.resolve().unwrap();
        assert_eq!(ty.to_string(), "(address,uint256[])");
        assert!(ty.is_dynamic());
    }

    #[test]
    fn resolves_tuple_array_suffixes() {
        let json = r#"{
            "name": "orders",
            "type": "tuple[2][]",
            "components": [{"name": "id", "type": "uint256"}]
        }"#;
        let p: AbiParam = serde_json::from_str(json).unwrap();
        assert_eq!(p.resolve().unwrap().to_string(), "(uint256)[2][]");
    }

    #[test]
    fn malformed_suffix_rejected() {
        let p = AbiParam {
            name: String::new(),
            ty: "tuple[2".into(),
            indexed: false,
            components: vec![],
        };
        assert!(matches!(p.resolve(), Err(AbiError::InvalidType { .. })));
    }

    #[test]
    fn document_entries_parse() {
        let doc = r#"[
            {"type": "constructor", "inputs": [{"name": "owner", "type": "address"}]},
            {"type": "function", "name": "transfer",
             "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
             "outputs": [{"name": "", "type": "bool"}]},
            {"type": "event", "name": "Transfer", "anonymous": false,
             "inputs": [
                {"name": "from", "type": "address", "indexed": true},
                {"name": "to", "type": "address", "indexed": true},
                {"name": "value", "type": "uint256", "indexed": false}
             ]}
        ]"#;
        let entries = parse_document(doc).unwrap();
        assert_eq!(entries.len(), 3);

        let f = function_from_entry(&entries[1]).unwrap();
        assert_eq!(f.selector_hex(), "0xa9059cbb");

        let e = event_from_entry(&entries[2]).unwrap();
        assert_eq!(
            e.topic_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn non_json_document_rejected() {
        assert!(matches!(parse_document("not json"), Err(AbiError::Document(_))));
    }
}
