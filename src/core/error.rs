//! Error types for the progression engine.
//!
//! Gameplay rejections are not errors; they travel as
//! [`crate::interaction::Rejection`] values. These types cover collaborator
//! failures and bad configuration only.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the persistent key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("stored value for key {key} is not valid JSON: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Maps serde_json encode failures onto [`StoreError::Encode`] for a key.
pub(crate) trait StoreResultExt<T> {
    fn encode_err(self, key: &str) -> Result<T, StoreError>;
}

impl<T> StoreResultExt<T> for Result<T, serde_json::Error> {
    fn encode_err(self, key: &str) -> Result<T, StoreError> {
        self.map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })
    }
}

/// Failures of the messaging or identity collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollabError {
    #[error("message to {player_id} was not delivered: {reason}")]
    Undelivered { player_id: String, reason: String },

    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}

/// Failures loading [`crate::core::config::EngineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Errors surfaced by the public engine API.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("invalid node: {0}")]
    InvalidNode(String),

    #[error("unknown resource tier {tier} for {kind} node")]
    UnknownTier { kind: &'static str, tier: String },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
