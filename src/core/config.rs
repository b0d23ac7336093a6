//! Engine configuration.
//!
//! Loaded once at startup from TOML. Every section and field is optional and
//! falls back to the defaults in [`super::constants`].

use super::constants::*;
use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration for an [`crate::engine::Engine`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rate_limit: RateLimitConfig,
    pub nodes: NodeConfig,
    pub progression: ProgressionConfig,
    pub storage: StorageConfig,
    /// Random seed for reward rolls (None = seeded from entropy)
    pub seed: Option<u64>,
}

/// Sliding-window click limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_ms: i64,
    pub max_per_window: usize,
    /// Tighter limit applied to combat nodes
    pub combat_max_per_window: usize,
    pub debounce_ms: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: RATE_LIMIT_WINDOW_MS,
            max_per_window: MAX_CLICKS_PER_WINDOW,
            combat_max_per_window: MAX_COMBAT_CLICKS_PER_WINDOW,
            debounce_ms: DEBOUNCE_MS,
        }
    }
}

/// Depletion and respawn timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub cooldown_ms: i64,
    pub respawn_ms: i64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: NODE_COOLDOWN_MS,
            respawn_ms: ENEMY_RESPAWN_MS,
        }
    }
}

/// XP policy and level-up rewards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub base_health: u32,
    pub health_per_level: u32,
    /// Skill XP granted per point of player XP on node completion
    pub skill_xp_ratio: f64,
    /// Class XP granted per point of player XP on node completion
    pub class_xp_ratio: f64,
    /// Announce level-ups to everyone, not only the player
    pub announce_level_ups: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_health: DEFAULT_HEALTH,
            health_per_level: HEALTH_PER_LEVEL,
            skill_xp_ratio: 1.0,
            class_xp_ratio: 1.0,
            announce_level_ups: true,
        }
    }
}

/// Where the JSON file store keeps its data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory (None = ~/.brickrpg)
    pub data_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Parses configuration from a TOML string and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Quick config for deterministic tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Quick config for the simulator: no debounce so scripted clicks land
    pub fn simulation(seed: Option<u64>) -> Self {
        Self {
            seed,
            rate_limit: RateLimitConfig {
                debounce_ms: 0,
                ..Default::default()
            },
            progression: ProgressionConfig {
                announce_level_ups: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.window_ms <= 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.window_ms must be positive".to_string(),
            ));
        }
        if self.rate_limit.max_per_window == 0 || self.rate_limit.combat_max_per_window == 0 {
            return Err(ConfigError::Invalid(
                "rate limits must allow at least one click".to_string(),
            ));
        }
        if self.rate_limit.debounce_ms < 0 || self.nodes.cooldown_ms < 0 || self.nodes.respawn_ms < 0
        {
            return Err(ConfigError::Invalid(
                "durations must not be negative".to_string(),
            ));
        }
        let ratios = [
            self.progression.skill_xp_ratio,
            self.progression.class_xp_ratio,
        ];
        if ratios.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(ConfigError::Invalid(
                "xp ratios must be finite and non-negative".to_string(),
            ));
        }
        if self.progression.base_health == 0 {
            return Err(ConfigError::Invalid(
                "progression.base_health must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.rate_limit.max_per_window, 10);
        assert_eq!(config.rate_limit.combat_max_per_window, 5);
        assert_eq!(config.rate_limit.debounce_ms, 100);
        assert_eq!(config.nodes.cooldown_ms, 30_000);
        assert_eq!(config.progression.skill_xp_ratio, 1.0);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            seed = 7

            [rate_limit]
            max_per_window = 20

            [progression]
            skill_xp_ratio = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.rate_limit.max_per_window, 20);
        assert_eq!(config.rate_limit.debounce_ms, 100);
        assert_eq!(config.progression.skill_xp_ratio, 0.5);
        assert_eq!(config.progression.class_xp_ratio, 1.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_toml_str("[rate_limit]\nmax_per_window = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("[progression]\nclass_xp_ratio = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("[rate_limit\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/brickrpg.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
