//! Core constants, level table, clock, configuration and errors.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod levels;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, NodeConfig, ProgressionConfig, RateLimitConfig, StorageConfig};
pub use error::{CollabError, ConfigError, EngineError, EngineResult, StoreError};
pub use levels::{level_for_xp, xp_for_level, xp_to_next_level, LEVEL_TABLE};
