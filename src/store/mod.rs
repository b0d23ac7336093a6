//! Persistent key-value store collaborator.
//!
//! Values are whole JSON documents: one per player and a single document
//! holding every node trigger. Callers read, modify in memory and write back
//! within one logical operation.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::core::constants::PLAYER_KEY_PREFIX;
use crate::core::error::StoreError;
use serde_json::Value;

/// A durable key-value store shared with other subsystems.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Store key of a player record.
pub fn player_key(player_id: &str) -> String {
    format!("{PLAYER_KEY_PREFIX}{player_id}")
}
