//! The interface registry: immutable selector/topic indexes built once
//! from a parsed interface document.
//!
//! After construction the registry is read-only; it can be shared across
//! concurrent encode/decode calls without synchronization.

use abicodec_core::{error::AbiError, event::Event, function::Function};
use std::collections::HashMap;
use tracing::debug;

use crate::document::{self, AbiEntry};

/// Indexed view over a contract interface.
///
/// Duplicate function or event names are allowed when their signatures
/// differ (overloads); name lookup then resolves to the first-declared
/// definition and callers disambiguate by selector or topic. A repeated
/// identical signature is rejected at construction.
#[derive(Debug, Clone, Default)]
pub struct InterfaceRegistry {
    functions: HashMap<String, Function>,
    functions_by_selector: HashMap<[u8; 4], Function>,
    events: HashMap<String, Event>,
    events_by_topic: HashMap<[u8; 32], Event>,
}

impl InterfaceRegistry {
    /// Build a registry from interface document JSON.
    pub fn from_json(abi_json: &str) -> Result<Self, AbiError> {
        Self::from_entries(&document::parse_document(abi_json)?)
    }

    /// Build a registry from already-parsed document entries. Entries other
    /// than `function` and `event` are ignored.
    pub fn from_entries(entries: &[AbiEntry]) -> Result<Self, AbiError> {
        let mut registry = Self::default();
        for entry in entries {
            match entry.kind.as_str() {
                "function" => registry.add_function(document::function_from_entry(entry)?)?,
                "event" => registry.add_event(document::event_from_entry(entry)?)?,
                _ => {}
            }
        }
        debug!(
            functions = registry.functions_by_selector.len(),
            events = registry.events_by_topic.len(),
            "interface registry built"
        );
        Ok(registry)
    }

    fn add_function(&mut self, function: Function) -> Result<(), AbiError> {
        if self.functions_by_selector.contains_key(&function.selector()) {
            return Err(AbiError::DuplicateDefinition { signature: function.signature() });
        }
        debug!(signature = %function.signature(), selector = %function.selector_hex(), "registered function");
        self.functions
            .entry(function.name.clone())
            .or_insert_with(|| function.clone());
        self.functions_by_selector.insert(function.selector(), function);
        Ok(())
    }

    fn add_event(&mut self, event: Event) -> Result<(), AbiError> {
        if self.events_by_topic.contains_key(&event.topic()) {
            return Err(AbiError::DuplicateDefinition { signature: event.signature() });
        }
        debug!(signature = %event.signature(), topic = %event.topic_hex(), "registered event");
        self.events.entry(event.name.clone()).or_insert_with(|| event.clone());
        self.events_by_topic.insert(event.topic(), event);
        Ok(())
    }

    /// Look up a function by name (first-declared overload).
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Look up a function by its exact 4-byte selector.
    pub fn function_by_selector(&self, selector: &[u8; 4]) -> Option<&Function> {
        self.functions_by_selector.get(selector)
    }

    /// Look up an event by name (first-declared overload).
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    /// Look up an event by its 32-byte topic hash.
    pub fn event_by_topic(&self, topic: &[u8; 32]) -> Option<&Event> {
        self.events_by_topic.get(topic)
    }

    /// All registered function names, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// All registered event names, sorted.
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.events.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Total number of distinct function signatures.
    pub fn len(&self) -> usize {
        self.functions_by_selector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions_by_selector.is_empty() && self.events_by_topic.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {"type": "function", "name": "transfer",
         "inputs": [{"name": "to", "type": "address"}, {"name": "amount", "type": "uint256"}],
         "outputs": [{"name": "", "type": "bool"}]},
        {"type": "function", "name": "balanceOf",
         "inputs": [{"name": "owner", "type": "address"}],
         "outputs": [{"name": "", "type": "uint256"}]},
        {"type": "event", "name": "Transfer",
         "inputs": [
            {"name": "from", "type": "address", "indexed": true},
            {"name": "to", "type": "address", "indexed": true},
            {"name": "value", "type": "uint256", "indexed": false}
         ]},
        {"type": "fallback"}
    ]"#;

    #[test]
    fn build_and_lookup() {
        let reg = InterfaceRegistry::from_json(ERC20_ABI).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.function("transfer").unwrap().selector_hex(), "0xa9059cbb");
        assert!(reg.function("mint").is_none());

        let by_sel = reg.function_by_selector(&[0xa9, 0x05, 0x9c, 0xbb]).unwrap();
        assert_eq!(by_sel.name, "transfer");

        let ev = reg.event("Transfer").unwrap();
        assert!(reg.event_by_topic(&ev.topic()).is_some());
    }

    #[test]
    fn non_function_entries_ignored() {
        let reg = InterfaceRegistry::from_json(ERC20_ABI).unwrap();
        assert_eq!(reg.function_names(), ["balanceOf", "transfer"]);
        assert_eq!(reg.event_names(), ["Transfer"]);
    }

    #[test]
    fn overloads_index_by_selector() {
        let abi = r#"[
            {"type": "function", "name": "get",
             "inputs": [{"name": "id", "type": "uint256"}], "outputs": []},
            {"type": "function", "name": "get",
             "inputs": [{"name": "id", "type": "bytes32"}], "outputs": []}
        ]"#;
        let reg = InterfaceRegistry::from_json(abi).unwrap();
        assert_eq!(reg.len(), 2);
        // Name lookup resolves to the first-declared overload.
        assert_eq!(reg.function("get").unwrap().signature(), "get(uint256)");
    }

    #[test]
    fn identical_signature_rejected() {
        let abi = r#"[
            {"type": "function", "name": "ping", "inputs": [], "outputs": []},
            {"type": "function", "name": "ping", "inputs": [], "outputs": []}
        ]"#;
        let err = InterfaceRegistry::from_json(abi);
        assert!(matches!(err, Err(AbiError::DuplicateDefinition { .. })));
    }
}
