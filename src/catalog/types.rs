use crate::core::constants::SKILL_XP_BONUS_DIVISOR;
use crate::player::Skill;
use serde::{Deserialize, Serialize};

/// Click requirements and rewards of one resource tier.
///
/// Slopes are stored in hundredths of a click per skill level so that the
/// required-click formula stays in integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTier {
    pub id: &'static str,
    pub name: &'static str,
    /// Item granted on completion
    pub item: &'static str,
    pub skill: Skill,
    pub min_level: u32,
    pub base_clicks: u32,
    /// Clicks shaved off per skill level, in hundredths
    pub slope_centi: u32,
    pub base_xp: u64,
}

impl ResourceTier {
    /// Clicks needed for one completion at `skill_level`:
    /// `max(1, floor(base_clicks - skill_level * slope))`.
    pub fn required_clicks(&self, skill_level: u32) -> u32 {
        let base = u64::from(self.base_clicks) * 100;
        let shaved = u64::from(skill_level) * u64::from(self.slope_centi);
        (base.saturating_sub(shaved) / 100).max(1) as u32
    }

    /// XP for one completion: base XP plus a tenth of it per skill level.
    pub fn reward_xp(&self, skill_level: u32) -> u64 {
        self.base_xp + self.base_xp * u64::from(skill_level) / SKILL_XP_BONUS_DIVISOR
    }

    pub fn is_unlocked(&self, skill_level: u32) -> bool {
        skill_level >= self.min_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishRarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

impl FishRarity {
    pub fn all() -> [FishRarity; 5] {
        [
            FishRarity::Common,
            FishRarity::Uncommon,
            FishRarity::Rare,
            FishRarity::Epic,
            FishRarity::Legendary,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FishRarity::Common => "Common",
            FishRarity::Uncommon => "Uncommon",
            FishRarity::Rare => "Rare",
            FishRarity::Epic => "Epic",
            FishRarity::Legendary => "Legendary",
        }
    }

    /// XP multiplier applied to the spot's reward, in percent.
    pub fn xp_percent(&self) -> u64 {
        match self {
            FishRarity::Common => 100,
            FishRarity::Uncommon => 150,
            FishRarity::Rare => 250,
            FishRarity::Epic => 400,
            FishRarity::Legendary => 600,
        }
    }
}

/// A fishing spot: a resource tier plus the rarest fish it can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishingSpot {
    pub tier: ResourceTier,
    pub max_rarity: FishRarity,
}

/// An enemy: hits-to-defeat follow the resource tier formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enemy {
    pub tier: ResourceTier,
    pub coins: u64,
}

/// A fish rolled on a fishing completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catch {
    pub name: String,
    pub rarity: FishRarity,
    pub xp: u64,
}
