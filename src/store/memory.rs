use super::KeyValueStore;
use crate::core::error::StoreError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for tests and simulations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self
            .values
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}
