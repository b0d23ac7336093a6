use crate::catalog::{self, ResourceTier};
use crate::core::constants::{FISHING_ATTEMPTS_PER_DEPLETION, SINGLE_SHOT_ATTEMPTS};
use crate::core::error::{EngineError, EngineResult};
use crate::player::Skill;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn one() -> u32 {
    1
}

/// Configuration and per-player runtime state of one interactive world object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeTrigger {
    Mining(ExtractionNode),
    Gathering(ExtractionNode),
    Fishing(ExtractionNode),
    Combat(CombatNode),
    Buy(ShopNode),
    Quest(QuestNode),
}

/// A node clicked repeatedly to extract a resource (ore, plants, fish).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionNode {
    /// Catalog tier id (e.g. "copper", "oak", "pond")
    pub tier: String,
    /// Completions allowed before the node depletes for a player. Unset
    /// nodes use the per-kind default from [`NodeTrigger::attempt_budget`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts_per_depletion: Option<u32>,
    /// Overrides the engine-wide depletion cooldown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_ms: Option<i64>,
    #[serde(default)]
    pub progress: BTreeMap<String, u32>,
    #[serde(default)]
    pub attempts_remaining: BTreeMap<String, u32>,
    /// Epoch ms after which the player may click again
    #[serde(default)]
    pub cooldown_until: BTreeMap<String, i64>,
}

/// An enemy clicked until defeated, then respawning per player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatNode {
    /// Catalog enemy id (e.g. "goblin")
    pub enemy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respawn_ms: Option<i64>,
    #[serde(default)]
    pub hits: BTreeMap<String, u32>,
    #[serde(default)]
    pub respawn_until: BTreeMap<String, i64>,
}

/// A shop counter selling one item at a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopNode {
    pub item: String,
    pub price: u64,
}

/// A quest turn-in point: hand over items once for an XP reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestNode {
    pub quest_id: String,
    pub required_item: String,
    #[serde(default = "one")]
    pub required_count: u32,
    pub reward_xp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_item: Option<String>,
    /// Skill credited with the reward XP, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<Skill>,
}

impl NodeTrigger {
    pub fn mining(tier: &str) -> Self {
        NodeTrigger::Mining(ExtractionNode::new(tier, SINGLE_SHOT_ATTEMPTS))
    }

    pub fn gathering(tier: &str) -> Self {
        NodeTrigger::Gathering(ExtractionNode::new(tier, SINGLE_SHOT_ATTEMPTS))
    }

    pub fn fishing(spot: &str) -> Self {
        NodeTrigger::Fishing(ExtractionNode::new(spot, FISHING_ATTEMPTS_PER_DEPLETION))
    }

    pub fn combat(enemy: &str) -> Self {
        NodeTrigger::Combat(CombatNode {
            enemy: enemy.to_string(),
            ..Default::default()
        })
    }

    pub fn buy(item: &str, price: u64) -> Self {
        NodeTrigger::Buy(ShopNode {
            item: item.to_string(),
            price,
        })
    }

    pub fn quest(quest_id: &str, required_item: &str, required_count: u32, reward_xp: u64) -> Self {
        NodeTrigger::Quest(QuestNode {
            quest_id: quest_id.to_string(),
            required_item: required_item.to_string(),
            required_count,
            reward_xp,
            reward_item: None,
            skill: None,
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeTrigger::Mining(_) => "mining",
            NodeTrigger::Gathering(_) => "gathering",
            NodeTrigger::Fishing(_) => "fishing",
            NodeTrigger::Combat(_) => "combat",
            NodeTrigger::Buy(_) => "buy",
            NodeTrigger::Quest(_) => "quest",
        }
    }

    /// Completions before depletion: the node's own budget, else 5 for
    /// fishing and 1 for mining and gathering. `None` for other kinds.
    pub fn attempt_budget(&self) -> Option<u32> {
        match self {
            NodeTrigger::Fishing(n) => Some(
                n.attempts_per_depletion
                    .unwrap_or(FISHING_ATTEMPTS_PER_DEPLETION),
            ),
            NodeTrigger::Mining(n) | NodeTrigger::Gathering(n) => {
                Some(n.attempts_per_depletion.unwrap_or(SINGLE_SHOT_ATTEMPTS))
            }
            NodeTrigger::Combat(_) | NodeTrigger::Buy(_) | NodeTrigger::Quest(_) => None,
        }
    }

    /// Catalog tier behind this node, for the kinds that have one.
    pub fn resource_tier(&self) -> Option<&'static ResourceTier> {
        match self {
            NodeTrigger::Mining(node) => catalog::ore(&node.tier),
            NodeTrigger::Gathering(node) => catalog::gatherable(&node.tier),
            NodeTrigger::Fishing(node) => catalog::fishing_spot(&node.tier).map(|s| &s.tier),
            NodeTrigger::Combat(node) => catalog::enemy(&node.enemy).map(|e| &e.tier),
            NodeTrigger::Buy(_) | NodeTrigger::Quest(_) => None,
        }
    }

    /// Checks that the node references catalog entries that exist and that
    /// its overrides are usable.
    pub fn validate(&self) -> EngineResult<()> {
        let tier_id = match self {
            NodeTrigger::Mining(n) | NodeTrigger::Gathering(n) | NodeTrigger::Fishing(n) => {
                if n.attempts_per_depletion == Some(0) {
                    return Err(EngineError::InvalidNode(format!(
                        "{} node {} allows zero attempts",
                        self.kind_name(),
                        n.tier
                    )));
                }
                if n.cooldown_ms.is_some_and(|ms| ms < 0) {
                    return Err(EngineError::InvalidNode(format!(
                        "{} node {} has a negative cooldown",
                        self.kind_name(),
                        n.tier
                    )));
                }
                &n.tier
            }
            NodeTrigger::Combat(n) => {
                if n.respawn_ms.is_some_and(|ms| ms < 0) {
                    return Err(EngineError::InvalidNode(format!(
                        "combat node {} has a negative respawn",
                        n.enemy
                    )));
                }
                &n.enemy
            }
            NodeTrigger::Buy(_) | NodeTrigger::Quest(_) => return Ok(()),
        };
        if self.resource_tier().is_none() {
            return Err(EngineError::UnknownTier {
                kind: self.kind_name(),
                tier: tier_id.clone(),
            });
        }
        Ok(())
    }

    /// Forgets all runtime state held for `player_id`.
    pub fn reset_player(&mut self, player_id: &str) {
        match self {
            NodeTrigger::Mining(n) | NodeTrigger::Gathering(n) | NodeTrigger::Fishing(n) => {
                n.progress.remove(player_id);
                n.attempts_remaining.remove(player_id);
                n.cooldown_until.remove(player_id);
            }
            NodeTrigger::Combat(n) => {
                n.hits.remove(player_id);
                n.respawn_until.remove(player_id);
            }
            NodeTrigger::Buy(_) | NodeTrigger::Quest(_) => {}
        }
    }
}

impl ExtractionNode {
    pub fn new(tier: &str, attempts_per_depletion: u32) -> Self {
        Self {
            tier: tier.to_string(),
            attempts_per_depletion: Some(attempts_per_depletion),
            ..Default::default()
        }
    }

    pub fn with_cooldown_ms(mut self, cooldown_ms: i64) -> Self {
        self.cooldown_ms = Some(cooldown_ms);
        self
    }

    pub fn progress_of(&self, player_id: &str) -> u32 {
        self.progress.get(player_id).copied().unwrap_or(0)
    }

    pub fn attempts_of(&self, player_id: &str) -> Option<u32> {
        self.attempts_remaining.get(player_id).copied()
    }

    /// Milliseconds left on the player's cooldown, if it has not expired.
    pub fn cooldown_remaining(&self, player_id: &str, now_ms: i64) -> Option<i64> {
        gate_remaining(&self.cooldown_until, player_id, now_ms)
    }
}

impl CombatNode {
    pub fn hits_of(&self, player_id: &str) -> u32 {
        self.hits.get(player_id).copied().unwrap_or(0)
    }

    pub fn respawn_remaining(&self, player_id: &str, now_ms: i64) -> Option<i64> {
        gate_remaining(&self.respawn_until, player_id, now_ms)
    }
}

/// Time left before `now_ms >= until[player_id]`, or `None` when open.
pub(crate) fn gate_remaining(
    until: &BTreeMap<String, i64>,
    player_id: &str,
    now_ms: i64,
) -> Option<i64> {
    until
        .get(player_id)
        .filter(|&&t| now_ms < t)
        .map(|&t| t - now_ms)
}
