//! Loading and saving player records through the validator.

use super::types::PlayerRecord;
use super::validator::normalize;
use crate::core::config::ProgressionConfig;
use crate::core::error::{StoreError, StoreResultExt};
use crate::store::{player_key, KeyValueStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Player records keyed by player id, normalized on every read.
#[derive(Clone)]
pub struct PlayerRepository {
    store: Arc<dyn KeyValueStore>,
    config: ProgressionConfig,
}

impl PlayerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, config: ProgressionConfig) -> Self {
        Self { store, config }
    }

    /// Loads a structurally valid record, creating or repairing it as needed.
    ///
    /// Repaired and newly created records are written back before returning.
    /// A failed write-back is logged; the repaired record is still returned.
    /// A stored document that is not valid JSON is replaced with defaults.
    pub fn load(&self, player_id: &str) -> Result<PlayerRecord, StoreError> {
        let key = player_key(player_id);
        let raw = match self.store.get(&key) {
            Ok(raw) => raw,
            Err(e @ StoreError::Decode { .. }) => {
                warn!(player_id, error = %e, "player record unreadable, resetting it");
                Some(Value::Null)
            }
            Err(e) => return Err(e),
        };
        let normalized = normalize(raw.as_ref(), &self.config);

        if normalized.created {
            debug!(player_id, "created player record");
        } else if !normalized.repairs.is_empty() {
            warn!(
                player_id,
                repairs = ?normalized.repairs,
                "repaired corrupted player record"
            );
        }

        if normalized.is_dirty() {
            if let Err(e) = self.save(player_id, &normalized.record) {
                error!(player_id, error = %e, "failed to write back repaired player record");
            }
        }
        Ok(normalized.record)
    }

    pub fn save(&self, player_id: &str, record: &PlayerRecord) -> Result<(), StoreError> {
        let key = player_key(player_id);
        let value = serde_json::to_value(record).encode_err(&key)?;
        self.store.set(&key, value)
    }

    /// Loads, mutates and saves a record in one logical operation.
    pub fn update<T>(
        &self,
        player_id: &str,
        mutate: impl FnOnce(&mut PlayerRecord) -> T,
    ) -> Result<T, StoreError> {
        let mut record = self.load(player_id)?;
        let result = mutate(&mut record);
        self.save(player_id, &record)?;
        Ok(result)
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Skill;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn repo() -> (PlayerRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            PlayerRepository::new(store.clone(), ProgressionConfig::default()),
            store,
        )
    }

    #[test]
    fn test_first_load_creates_and_persists() {
        let (repo, store) = repo();
        let record = repo.load("alice").unwrap();
        assert_eq!(record, PlayerRecord::default());
        assert!(store.get("player:alice").unwrap().is_some());
    }

    #[test]
    fn test_corrupt_record_written_back_repaired() {
        let (repo, store) = repo();
        store
            .set("player:bob", json!({"level": 3, "xp": 1000, "skills": null}))
            .unwrap();

        let record = repo.load("bob").unwrap();
        assert_eq!(record.level, 3);
        assert_eq!(record.skill_level(Skill::Mining), 0);

        let stored = store.get("player:bob").unwrap().unwrap();
        assert_eq!(stored["skills"]["mining"], json!({"level": 0, "xp": 0}));
        assert_eq!(stored["health"], 100);
    }

    #[test]
    fn test_undecodable_record_reset_and_written_back() {
        let store = Arc::new(UnreadableOnce::default());
        let repo = PlayerRepository::new(store.clone(), ProgressionConfig::default());

        let record = repo.load("dave").unwrap();
        assert_eq!(record, PlayerRecord::default());
        assert_eq!(store.inner.get("player:dave").unwrap().unwrap()["level"], 0);
        assert_eq!(repo.load("dave").unwrap(), record);
    }

    /// Reports a decode failure until something is written.
    #[derive(Default)]
    struct UnreadableOnce {
        inner: MemoryStore,
    }

    impl KeyValueStore for UnreadableOnce {
        fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            match self.inner.get(key)? {
                Some(value) => Ok(Some(value)),
                None => Err(StoreError::Decode {
                    key: key.to_string(),
                    source: serde_json::from_str::<Value>("{\"level\": 3, \"xp\"").unwrap_err(),
                }),
            }
        }

        fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_update_persists_mutation() {
        let (repo, _) = repo();
        repo.update("carol", |r| r.add_item("Trout")).unwrap();
        assert_eq!(repo.load("carol").unwrap().inventory, vec!["Trout"]);
    }
}
