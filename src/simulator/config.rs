//! Simulation configuration.

use std::path::PathBuf;

/// Configuration for a scripted click session.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated players clicking in parallel
    pub num_players: u32,

    /// Clicks each player makes before the session ends
    pub clicks_per_player: u64,

    /// Simulated time between rounds of clicks
    pub click_interval_ms: i64,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Persist to JSON files here instead of memory
    pub data_dir: Option<PathBuf>,

    /// Engine config TOML (None = simulation preset)
    pub engine_config: Option<PathBuf>,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            clicks_per_player: 20_000,
            click_interval_ms: 250,
            seed: None,
            data_dir: None,
            engine_config: None,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for a short smoke run
    pub fn quick() -> Self {
        Self {
            num_players: 2,
            clicks_per_player: 2_000,
            ..Default::default()
        }
    }

    /// Quick config for pacing all the way to the level cap
    pub fn long_session() -> Self {
        Self {
            num_players: 8,
            clicks_per_player: 250_000,
            ..Default::default()
        }
    }
}
