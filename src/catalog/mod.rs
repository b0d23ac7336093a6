//! Resource catalog: ore, gathering, fishing and enemy tiers.

pub mod data;
pub mod generation;
pub mod types;

pub use data::{enemy, fishing_spot, gatherable, ore, ENEMIES, FISHING_SPOTS, GATHERABLES, ORES};
pub use generation::{roll_catch, roll_fish_rarity};
pub use types::{Catch, Enemy, FishRarity, FishingSpot, ResourceTier};
