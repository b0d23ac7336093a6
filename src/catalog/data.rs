//! Static tier tables for every node kind.
//!
//! Rarer tiers need more clicks at level 0 and unlock at higher skill levels.

use super::types::{Enemy, FishRarity, FishingSpot, ResourceTier};
use crate::player::Skill;

#[allow(clippy::too_many_arguments)]
const fn tier(
    id: &'static str,
    name: &'static str,
    item: &'static str,
    skill: Skill,
    min_level: u32,
    base_clicks: u32,
    slope_centi: u32,
    base_xp: u64,
) -> ResourceTier {
    ResourceTier {
        id,
        name,
        item,
        skill,
        min_level,
        base_clicks,
        slope_centi,
        base_xp,
    }
}

pub const ORES: [ResourceTier; 7] = [
    tier("copper", "Copper", "Copper Ore", Skill::Mining, 0, 8, 30, 10),
    tier("tin", "Tin", "Tin Ore", Skill::Mining, 3, 9, 30, 14),
    tier("iron", "Iron", "Iron Ore", Skill::Mining, 8, 11, 30, 25),
    tier("coal", "Coal", "Coal", Skill::Mining, 12, 12, 30, 32),
    tier("gold", "Gold", "Gold Ore", Skill::Mining, 15, 14, 35, 45),
    tier("mithril", "Mithril", "Mithril Ore", Skill::Mining, 20, 17, 40, 70),
    tier("adamantite", "Adamantite", "Adamantite Ore", Skill::Mining, 25, 20, 45, 100),
];

pub const GATHERABLES: [ResourceTier; 5] = [
    tier("herb", "Wild Herb", "Wild Herb", Skill::Gathering, 0, 6, 20, 8),
    tier("flax", "Flax", "Flax", Skill::Gathering, 4, 7, 20, 12),
    tier("oak", "Oak Tree", "Oak Log", Skill::Gathering, 8, 9, 25, 20),
    tier("yew", "Yew Tree", "Yew Log", Skill::Gathering, 15, 12, 30, 40),
    tier("moonpetal", "Moonpetal", "Moonpetal", Skill::Gathering, 22, 15, 35, 75),
];

pub const FISHING_SPOTS: [FishingSpot; 4] = [
    FishingSpot {
        tier: tier("pond", "Pond", "Fish", Skill::Fishing, 0, 6, 20, 12),
        max_rarity: FishRarity::Uncommon,
    },
    FishingSpot {
        tier: tier("river", "River", "Fish", Skill::Fishing, 5, 7, 20, 20),
        max_rarity: FishRarity::Rare,
    },
    FishingSpot {
        tier: tier("lake", "Lake", "Fish", Skill::Fishing, 12, 9, 25, 35),
        max_rarity: FishRarity::Epic,
    },
    FishingSpot {
        tier: tier("ocean", "Ocean", "Fish", Skill::Fishing, 20, 11, 30, 60),
        max_rarity: FishRarity::Legendary,
    },
];

pub const ENEMIES: [Enemy; 5] = [
    Enemy {
        tier: tier("rat", "Giant Rat", "Rat Tail", Skill::Combat, 0, 4, 10, 8),
        coins: 2,
    },
    Enemy {
        tier: tier("goblin", "Goblin", "Goblin Ear", Skill::Combat, 5, 7, 15, 20),
        coins: 6,
    },
    Enemy {
        tier: tier("skeleton", "Skeleton", "Bone Shard", Skill::Combat, 12, 10, 20, 40),
        coins: 12,
    },
    Enemy {
        tier: tier("troll", "Cave Troll", "Troll Hide", Skill::Combat, 20, 14, 25, 80),
        coins: 25,
    },
    Enemy {
        tier: tier("dragon", "Ember Dragon", "Dragon Scale", Skill::Combat, 27, 20, 30, 200),
        coins: 100,
    },
];

/// Fish names by rarity.
pub const FISH_NAMES: [[&str; 4]; 5] = [
    ["Minnow", "Perch", "Bluegill", "Carp"],
    ["Trout", "Bass", "Catfish", "Walleye"],
    ["Salmon", "Pike", "Sturgeon", "Eel"],
    ["Swordfish", "Tuna", "Marlin", "Barracuda"],
    ["Golden Koi", "Sea Serpent", "Abyssal Angler", "Moon Whale"],
];

/// Base rarity chances in percent: Common, Uncommon, Rare, Epic, Legendary.
pub const FISH_BASE_CHANCES: [f64; 5] = [60.0, 25.0, 10.0, 4.0, 1.0];

/// Chance shift per `FISH_RARITY_BONUS_INTERVAL` fishing levels.
pub const FISH_LEVEL_BONUS: [f64; 5] = [-2.0, 1.0, 0.5, 0.3, 0.2];

pub fn ore(id: &str) -> Option<&'static ResourceTier> {
    ORES.iter().find(|t| t.id == id)
}

pub fn gatherable(id: &str) -> Option<&'static ResourceTier> {
    GATHERABLES.iter().find(|t| t.id == id)
}

pub fn fishing_spot(id: &str) -> Option<&'static FishingSpot> {
    FISHING_SPOTS.iter().find(|s| s.tier.id == id)
}

pub fn enemy(id: &str) -> Option<&'static Enemy> {
    ENEMIES.iter().find(|e| e.tier.id == id)
}
