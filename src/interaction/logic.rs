//! Per-click state transitions of extraction and combat nodes.
//!
//! These functions mutate a trigger and a player record in memory and report
//! what changed. Loading and saving both is the caller's job, so a click
//! either lands completely or not at all.

use super::commerce;
use super::types::{Outcome, Rejection, Reward};
use crate::catalog::{self, roll_catch, Enemy, FishingSpot, ResourceTier};
use crate::core::config::{NodeConfig, ProgressionConfig};
use crate::core::constants::SINGLE_SHOT_ATTEMPTS;
use crate::nodes::{CombatNode, ExtractionNode, NodeTrigger};
use crate::player::PlayerRecord;
use crate::progression::{apply_grant, XpGrant};
use rand::Rng;
use tracing::{debug, warn};

/// Inputs shared by every click.
pub struct ClickEnv<'a, R: Rng> {
    pub player_id: &'a str,
    pub now_ms: i64,
    pub nodes: &'a NodeConfig,
    pub progression: &'a ProgressionConfig,
    pub rng: &'a mut R,
}

/// Outcome of a click plus which documents need to be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub outcome: Outcome,
    pub node_changed: bool,
    pub player_changed: bool,
}

impl Step {
    pub(crate) fn rejected(rejection: Rejection, node_changed: bool) -> Self {
        Self {
            outcome: Outcome::Rejected(rejection),
            node_changed,
            player_changed: false,
        }
    }
}

/// Advances `trigger` by one click from `env.player_id`.
pub fn advance<R: Rng>(
    trigger: &mut NodeTrigger,
    record: &mut PlayerRecord,
    env: &mut ClickEnv<'_, R>,
) -> Step {
    let budget = trigger.attempt_budget().unwrap_or(SINGLE_SHOT_ATTEMPTS);
    match trigger {
        NodeTrigger::Mining(node) => match catalog::ore(&node.tier) {
            Some(tier) => advance_extraction(node, tier, None, budget, record, env),
            None => unknown_tier("mining", &node.tier),
        },
        NodeTrigger::Gathering(node) => match catalog::gatherable(&node.tier) {
            Some(tier) => advance_extraction(node, tier, None, budget, record, env),
            None => unknown_tier("gathering", &node.tier),
        },
        NodeTrigger::Fishing(node) => match catalog::fishing_spot(&node.tier) {
            Some(spot) => advance_extraction(node, &spot.tier, Some(spot), budget, record, env),
            None => unknown_tier("fishing", &node.tier),
        },
        NodeTrigger::Combat(node) => match catalog::enemy(&node.enemy) {
            Some(enemy) => advance_combat(node, enemy, record, env),
            None => unknown_tier("combat", &node.enemy),
        },
        NodeTrigger::Buy(shop) => commerce::buy(shop, record, env.progression),
        NodeTrigger::Quest(quest) => commerce::turn_in_quest(quest, record, env.progression),
    }
}

fn unknown_tier(kind: &str, tier: &str) -> Step {
    warn!(kind, tier, "node references an unknown catalog tier");
    Step::rejected(Rejection::NodeNotFound, false)
}

fn level_gate(tier: &ResourceTier, record: &PlayerRecord) -> Result<u32, Rejection> {
    let current = record.skill_level(tier.skill);
    if tier.is_unlocked(current) {
        Ok(current)
    } else {
        Err(Rejection::LevelTooLow {
            skill: tier.skill,
            required: tier.min_level,
            current,
        })
    }
}

/// Mining, gathering and fishing: click until the required count, collect,
/// and deplete after the node's attempt budget.
fn advance_extraction<R: Rng>(
    node: &mut ExtractionNode,
    tier: &ResourceTier,
    spot: Option<&FishingSpot>,
    budget: u32,
    record: &mut PlayerRecord,
    env: &mut ClickEnv<'_, R>,
) -> Step {
    let pid = env.player_id;

    if let Some(remaining_ms) = node.cooldown_remaining(pid, env.now_ms) {
        return Step::rejected(Rejection::OnCooldown { remaining_ms }, false);
    }
    // Expired cooldowns are cleared on the next touch
    let cleared = node.cooldown_until.remove(pid).is_some();

    let level = match level_gate(tier, record) {
        Ok(level) => level,
        Err(rejection) => return Step::rejected(rejection, cleared),
    };

    let attempts = *node
        .attempts_remaining
        .entry(pid.to_string())
        .or_insert(budget);

    let required = tier.required_clicks(level);
    let progress = node.progress.entry(pid.to_string()).or_insert(0);
    *progress += 1;
    let current = *progress;

    if current < required {
        debug!(player_id = pid, tier = tier.id, current, required, "progress");
        return Step {
            outcome: Outcome::Progressed {
                current,
                required,
                attempts_left: attempts,
            },
            node_changed: true,
            player_changed: false,
        };
    }

    // Completion
    node.progress.remove(pid);

    let (item, xp, catch) = match spot {
        Some(spot) => {
            let catch = roll_catch(spot, level, &mut *env.rng);
            (catch.name.clone(), catch.xp, Some(catch))
        }
        None => (tier.item.to_string(), tier.reward_xp(level), None),
    };
    record.add_item(item.clone());
    let grant = XpGrant::from_reward(xp, tier.skill, env.progression);
    let report = apply_grant(record, &grant, env.progression);

    let attempts_left = attempts.saturating_sub(1);
    let depleted = attempts_left == 0;
    if depleted {
        node.attempts_remaining.remove(pid);
        let cooldown = node.cooldown_ms.unwrap_or(env.nodes.cooldown_ms);
        node.cooldown_until
            .insert(pid.to_string(), env.now_ms.saturating_add(cooldown));
    } else {
        node.attempts_remaining.insert(pid.to_string(), attempts_left);
    }

    Step {
        outcome: Outcome::Completed {
            reward: Reward {
                item: Some(item),
                catch,
                xp,
                report,
                ..Default::default()
            },
            attempts_left,
            depleted,
        },
        node_changed: true,
        player_changed: true,
    }
}

/// Combat: land hits until the enemy falls, then it respawns for this player.
fn advance_combat<R: Rng>(
    node: &mut CombatNode,
    enemy: &Enemy,
    record: &mut PlayerRecord,
    env: &mut ClickEnv<'_, R>,
) -> Step {
    let pid = env.player_id;
    let tier = &enemy.tier;

    if let Some(remaining_ms) = node.respawn_remaining(pid, env.now_ms) {
        return Step::rejected(Rejection::OnCooldown { remaining_ms }, false);
    }
    let cleared = node.respawn_until.remove(pid).is_some();

    let level = match level_gate(tier, record) {
        Ok(level) => level,
        Err(rejection) => return Step::rejected(rejection, cleared),
    };

    let required = tier.required_clicks(level);
    let hits = node.hits.entry(pid.to_string()).or_insert(0);
    *hits += 1;
    let current = *hits;

    if current < required {
        debug!(player_id = pid, enemy = tier.id, current, required, "hit");
        return Step {
            outcome: Outcome::Progressed {
                current,
                required,
                attempts_left: 1,
            },
            node_changed: true,
            player_changed: false,
        };
    }

    node.hits.remove(pid);
    let respawn = node.respawn_ms.unwrap_or(env.nodes.respawn_ms);
    node.respawn_until
        .insert(pid.to_string(), env.now_ms.saturating_add(respawn));

    record.add_item(tier.item);
    record.coins = record.coins.saturating_add(enemy.coins);
    let xp = tier.reward_xp(level);
    let grant = XpGrant::from_reward(xp, tier.skill, env.progression);
    let report = apply_grant(record, &grant, env.progression);

    Step {
        outcome: Outcome::Completed {
            reward: Reward {
                item: Some(tier.item.to_string()),
                coins_gained: enemy.coins,
                xp,
                report,
                ..Default::default()
            },
            attempts_left: 0,
            depleted: true,
        },
        node_changed: true,
        player_changed: true,
    }
}
