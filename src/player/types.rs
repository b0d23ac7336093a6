use crate::core::constants::{DEFAULT_HEALTH, MAX_LEVEL};
use crate::core::levels::level_for_xp;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A skill track trained by clicking nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Mining,
    Fishing,
    Gathering,
    Combat,
    Bartering,
}

impl Skill {
    pub fn all() -> [Skill; 5] {
        [
            Skill::Mining,
            Skill::Fishing,
            Skill::Gathering,
            Skill::Combat,
            Skill::Bartering,
        ]
    }

    /// Storage key of this skill inside a player record.
    pub fn key(&self) -> &'static str {
        match self {
            Skill::Mining => "mining",
            Skill::Fishing => "fishing",
            Skill::Gathering => "gathering",
            Skill::Combat => "combat",
            Skill::Bartering => "bartering",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Mining => "Mining",
            Skill::Fishing => "Fishing",
            Skill::Gathering => "Gathering",
            Skill::Combat => "Combat",
            Skill::Bartering => "Bartering",
        }
    }

    pub fn from_key(key: &str) -> Option<Skill> {
        Skill::all().into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Level and cumulative XP of one track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackProgress {
    pub level: u32,
    pub xp: u64,
}

impl TrackProgress {
    pub fn from_xp(xp: u64) -> Self {
        Self {
            level: level_for_xp(xp),
            xp,
        }
    }

    /// Adds XP and re-derives the level. Returns the number of levels gained.
    pub fn add_xp(&mut self, amount: u64) -> u32 {
        let before = self.level;
        self.xp = self.xp.saturating_add(amount);
        self.level = level_for_xp(self.xp);
        self.level.saturating_sub(before)
    }

    pub fn is_max(&self) -> bool {
        self.level >= MAX_LEVEL
    }
}

/// One-time unlocks granted at the maximum player level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unlock {
    Flight,
}

impl Unlock {
    pub fn name(&self) -> &'static str {
        match self {
            Unlock::Flight => "flight",
        }
    }
}

/// Persisted progression state for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub level: u32,
    pub xp: u64,
    pub health: u32,
    pub max_health: u32,
    pub inventory: Vec<String>,
    pub coins: u64,
    pub skills: BTreeMap<Skill, TrackProgress>,
    pub active_class: Option<String>,
    pub classes: BTreeMap<String, TrackProgress>,
    pub unlocks: BTreeSet<Unlock>,
    pub completed_quests: BTreeSet<String>,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH)
    }
}

impl PlayerRecord {
    /// Creates a fresh record with every skill at level 0.
    pub fn new(base_health: u32) -> Self {
        Self {
            level: 0,
            xp: 0,
            health: base_health,
            max_health: base_health,
            inventory: Vec::new(),
            coins: 0,
            skills: Skill::all()
                .into_iter()
                .map(|s| (s, TrackProgress::default()))
                .collect(),
            active_class: None,
            classes: BTreeMap::new(),
            unlocks: BTreeSet::new(),
            completed_quests: BTreeSet::new(),
        }
    }

    pub fn skill(&self, skill: Skill) -> TrackProgress {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    pub fn skill_level(&self, skill: Skill) -> u32 {
        self.skill(skill).level
    }

    pub fn skill_mut(&mut self, skill: Skill) -> &mut TrackProgress {
        self.skills.entry(skill).or_default()
    }

    /// Progress of the active class, if one is selected.
    pub fn active_class_progress(&self) -> Option<(&str, TrackProgress)> {
        let id = self.active_class.as_deref()?;
        Some((id, self.classes.get(id).copied().unwrap_or_default()))
    }

    pub fn count_item(&self, item: &str) -> usize {
        self.inventory.iter().filter(|i| i.as_str() == item).count()
    }

    pub fn add_item(&mut self, item: impl Into<String>) {
        self.inventory.push(item.into());
    }

    /// Removes up to `count` copies of `item`, oldest first. Returns how many were removed.
    pub fn remove_items(&mut self, item: &str, count: usize) -> usize {
        let mut removed = 0;
        self.inventory.retain(|i| {
            if removed < count && i == item {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn heal_full(&mut self) {
        self.health = self.max_health;
    }
}
