//! JSON file store: one pretty-printed file per key under a data directory.

use super::KeyValueStore;
use crate::core::error::StoreError;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get the ~/.brickrpg/ directory path.
pub fn default_data_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home_dir.join(".brickrpg"))
}

/// Store backed by JSON files in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens the store at `dir`, or at ~/.brickrpg/ when `None`.
    pub fn open_or_default(dir: Option<&Path>) -> io::Result<Self> {
        match dir {
            Some(dir) => Self::open(dir),
            None => Self::open(default_data_dir()?),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a key.
    ///
    /// `:` becomes `_` and every other byte outside `[A-Za-z0-9-]` becomes
    /// `%XX`, so distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' => name.push(byte as char),
                b':' => name.push('_'),
                _ => name.push_str(&format!("%{byte:02X}")),
            }
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            })
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(&value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        // Write beside the target and rename so readers never see half a file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| StoreError::Io {
                key: key.to_string(),
                source,
            })
    }
}
