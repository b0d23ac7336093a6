// Leveling
pub const MAX_LEVEL: u32 = 30;
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;

// Player record defaults
pub const DEFAULT_HEALTH: u32 = 100;
pub const HEALTH_PER_LEVEL: u32 = 10;

// Rate limiting
pub const RATE_LIMIT_WINDOW_MS: i64 = 1000;
pub const MAX_CLICKS_PER_WINDOW: usize = 10;
pub const MAX_COMBAT_CLICKS_PER_WINDOW: usize = 5;
pub const DEBOUNCE_MS: i64 = 100;

// Node depletion
pub const NODE_COOLDOWN_MS: i64 = 30_000;
pub const FISHING_ATTEMPTS_PER_DEPLETION: u32 = 5;
pub const SINGLE_SHOT_ATTEMPTS: u32 = 1;
pub const ENEMY_RESPAWN_MS: i64 = 10_000;

// Rewards
pub const SKILL_XP_BONUS_DIVISOR: u64 = 10;
pub const PURCHASE_BARTERING_XP: u64 = 5;
pub const FISH_RARITY_BONUS_INTERVAL: u32 = 5;

// Storage keys
pub const TRIGGERS_KEY: &str = "triggers";
pub const PLAYER_KEY_PREFIX: &str = "player:";

// Messaging
pub const UNKNOWN_PLAYER_NAME: &str = "Someone";
