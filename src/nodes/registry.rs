//! Durable node trigger registry.
//!
//! Every trigger lives in one JSON object stored under [`TRIGGERS_KEY`]. Each
//! operation reads the whole map, changes it in memory and writes the whole
//! map back, so callers must finish their read-modify-write within a single
//! logical operation.

use super::types::NodeTrigger;
use crate::core::constants::TRIGGERS_KEY;
use crate::core::error::{StoreError, StoreResultExt};
use crate::store::KeyValueStore;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

pub type TriggerMap = BTreeMap<String, NodeTrigger>;

/// Node id -> trigger mapping backed by the key-value store.
#[derive(Clone)]
pub struct TriggerRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl TriggerRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, node_id: &str) -> Result<Option<NodeTrigger>, StoreError> {
        Ok(self.load_all()?.remove(node_id))
    }

    /// Inserts or replaces a trigger.
    pub fn upsert(&self, node_id: &str, trigger: NodeTrigger) -> Result<(), StoreError> {
        let mut map = self.load_all()?;
        map.insert(node_id.to_string(), trigger);
        self.save_all(&map)
    }

    /// Removes a trigger. Returns false if it did not exist.
    pub fn remove(&self, node_id: &str) -> Result<bool, StoreError> {
        let mut map = self.load_all()?;
        if map.remove(node_id).is_none() {
            return Ok(false);
        }
        self.save_all(&map)?;
        Ok(true)
    }

    /// Loads every trigger. Entries that fail to decode are dropped with a
    /// warning, and an unreadable document counts as an empty map.
    pub fn load_all(&self) -> Result<TriggerMap, StoreError> {
        let value = match self.store.get(TRIGGERS_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(TriggerMap::new()),
            Err(e @ StoreError::Decode { .. }) => {
                warn!(error = %e, "trigger map unreadable, starting from empty");
                return Ok(TriggerMap::new());
            }
            Err(e) => return Err(e),
        };

        let entries = match value {
            Value::Object(entries) => entries,
            Value::Null => return Ok(TriggerMap::new()),
            other => {
                warn!(found = %type_name(&other), "trigger map is not an object, ignoring it");
                return Ok(TriggerMap::new());
            }
        };

        let mut map = TriggerMap::new();
        for (node_id, raw) in entries {
            match serde_json::from_value::<NodeTrigger>(raw) {
                Ok(trigger) => {
                    map.insert(node_id, trigger);
                }
                Err(e) => warn!(node_id = %node_id, error = %e, "dropping malformed trigger"),
            }
        }
        Ok(map)
    }

    /// Writes the whole trigger map.
    pub fn save_all(&self, map: &TriggerMap) -> Result<(), StoreError> {
        let mut entries = Map::new();
        for (node_id, trigger) in map {
            let value = serde_json::to_value(trigger).encode_err(TRIGGERS_KEY)?;
            entries.insert(node_id.clone(), value);
        }
        self.store.set(TRIGGERS_KEY, Value::Object(entries))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.load_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn registry() -> (TriggerRegistry, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TriggerRegistry::new(store.clone()), store)
    }

    #[test]
    fn test_empty_store_has_no_triggers() {
        let (registry, _) = registry();
        assert!(registry.get("rock-1").unwrap().is_none());
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn test_upsert_then_get() {
        let (registry, _) = registry();
        registry
            .upsert("rock-1", NodeTrigger::mining("copper"))
            .unwrap();
        assert_eq!(
            registry.get("rock-1").unwrap(),
            Some(NodeTrigger::mining("copper"))
        );
    }

    #[test]
    fn test_upsert_replaces_and_keeps_others() {
        let (registry, _) = registry();
        registry.upsert("a", NodeTrigger::mining("copper")).unwrap();
        registry.upsert("b", NodeTrigger::fishing("pond")).unwrap();
        registry.upsert("a", NodeTrigger::mining("iron")).unwrap();

        let all = registry.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["a"], NodeTrigger::mining("iron"));
        assert_eq!(all["b"], NodeTrigger::fishing("pond"));
    }

    #[test]
    fn test_remove() {
        let (registry, _) = registry();
        registry.upsert("a", NodeTrigger::mining("copper")).unwrap();
        assert!(registry.remove("a").unwrap());
        assert!(!registry.remove("a").unwrap());
        assert!(registry.get("a").unwrap().is_none());
    }

    #[test]
    fn test_malformed_entry_dropped_others_kept() {
        let (registry, store) = registry();
        store
            .set(
                TRIGGERS_KEY,
                json!({
                    "good": {"kind": "mining", "tier": "copper"},
                    "bad": {"kind": "teleporter"},
                    "worse": 12
                }),
            )
            .unwrap();

        let all = registry.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.contains_key("good"));
    }

    #[test]
    fn test_non_object_map_treated_as_empty() {
        let (registry, store) = registry();
        store.set(TRIGGERS_KEY, json!([1, 2, 3])).unwrap();
        assert!(registry.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_stored_as_single_document() {
        let (registry, store) = registry();
        registry.upsert("a", NodeTrigger::mining("copper")).unwrap();
        registry.upsert("b", NodeTrigger::buy("Pickaxe", 25)).unwrap();

        let raw = store.get(TRIGGERS_KEY).unwrap().unwrap();
        assert_eq!(raw["a"]["kind"], "mining");
        assert_eq!(raw["b"]["price"], 25);
        assert_eq!(store.len(), 1);
    }
}
