//! Scripted click sessions driven through the real [`Engine`].
//!
//! Each simulated player cycles through mining, gathering, fishing and
//! combat, always clicking the best tier their skill allows, and moves on
//! when a node is depleted. Time comes from a [`ManualClock`] advanced once
//! per round of clicks.

use super::config::SimConfig;
use super::report::{LevelUp, PlayerRun, SimReport};
use crate::catalog::{ENEMIES, FISHING_SPOTS, GATHERABLES, ORES};
use crate::core::clock::{Clock, ManualClock};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineResult, StoreError};
use crate::engine::Engine;
use crate::interaction::{ClickContext, Outcome, Rejection, Reward};
use crate::nodes::NodeTrigger;
use crate::player::Skill;
use crate::progression::CLASSES;
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

const ROUTE: [Skill; 4] = [Skill::Mining, Skill::Gathering, Skill::Fishing, Skill::Combat];

const SHOP_NODE: &str = "sim-shop";
const SHOP_ITEM: &str = "Bait";
const SHOP_PRICE: u64 = 10;

/// Run a full session and return a report.
pub fn run_simulation(config: &SimConfig) -> EngineResult<SimReport> {
    let mut engine_config = match &config.engine_config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::simulation(config.seed),
    };
    if config.seed.is_some() {
        engine_config.seed = config.seed;
    }

    let store: Arc<dyn KeyValueStore> = match &config.data_dir {
        Some(dir) => Arc::new(JsonFileStore::open(dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot open {}: {e}", dir.display()))
        })?),
        None => Arc::new(MemoryStore::new()),
    };
    let clock = Arc::new(ManualClock::new(0));
    let mut engine = Engine::new(engine_config, store, clock.clone());

    engine.register_node(SHOP_NODE, NodeTrigger::buy(SHOP_ITEM, SHOP_PRICE))?;
    let mut registered = HashSet::new();

    let mut players = Vec::with_capacity(config.num_players as usize);
    for idx in 0..config.num_players as usize {
        let player = SimPlayer::new(format!("sim-{}", idx + 1));
        let class = &CLASSES[idx % CLASSES.len()];
        engine.select_class(&player.run.player_id, class.id)?;
        players.push(player);
    }

    info!(
        players = config.num_players,
        clicks = config.clicks_per_player,
        "starting simulation"
    );

    for round in 0..config.clicks_per_player {
        let now_ms = clock.now_ms();
        for player in players.iter_mut() {
            player.click(&mut engine, &mut registered, now_ms)?;
        }
        clock.advance(config.click_interval_ms);

        if config.verbosity >= 2 && round > 0 && round % 10_000 == 0 {
            for p in &players {
                println!(
                    "Click {:>7} - {} level {:>2}, {} completions",
                    round,
                    p.run.player_id,
                    p.level,
                    p.run.completions
                );
            }
        }
    }

    let runs = players
        .into_iter()
        .map(|p| p.finish(&engine))
        .collect::<EngineResult<Vec<_>>>()?;
    Ok(SimReport::from_runs(
        runs,
        config.clicks_per_player,
        clock.now_ms(),
    ))
}

/// Best node a player can work for `skill` at `level`, with its id.
fn best_node(skill: Skill, level: u32) -> Option<(String, NodeTrigger)> {
    let (tier_id, trigger) = match skill {
        Skill::Mining => {
            let tier = ORES.iter().rev().find(|t| t.is_unlocked(level))?;
            (tier.id, NodeTrigger::mining(tier.id))
        }
        Skill::Gathering => {
            let tier = GATHERABLES.iter().rev().find(|t| t.is_unlocked(level))?;
            (tier.id, NodeTrigger::gathering(tier.id))
        }
        Skill::Fishing => {
            let spot = FISHING_SPOTS.iter().rev().find(|s| s.tier.is_unlocked(level))?;
            (spot.tier.id, NodeTrigger::fishing(spot.tier.id))
        }
        Skill::Combat => {
            let enemy = ENEMIES.iter().rev().find(|e| e.tier.is_unlocked(level))?;
            (enemy.tier.id, NodeTrigger::combat(enemy.tier.id))
        }
        Skill::Bartering => return None,
    };
    Some((format!("sim-{}-{}", skill.key(), tier_id), trigger))
}

struct SimPlayer {
    run: PlayerRun,
    route_pos: usize,
    level: u32,
    coins: u64,
    skill_levels: BTreeMap<Skill, u32>,
}

impl SimPlayer {
    fn new(player_id: String) -> Self {
        Self {
            run: PlayerRun::new(player_id),
            route_pos: 0,
            level: 0,
            coins: 0,
            skill_levels: BTreeMap::new(),
        }
    }

    fn click(
        &mut self,
        engine: &mut Engine,
        registered: &mut HashSet<String>,
        now_ms: i64,
    ) -> EngineResult<()> {
        let skill = ROUTE[self.route_pos % ROUTE.len()];
        let level = self.skill_levels.get(&skill).copied().unwrap_or(0);
        let Some((node_id, trigger)) = best_node(skill, level) else {
            self.route_pos += 1;
            return Ok(());
        };
        if registered.insert(node_id.clone()) {
            engine.register_node(&node_id, trigger)?;
        }

        let outcome = engine.attempt(&self.run.player_id, &node_id, &ClickContext::default());
        self.run.clicks += 1;
        match &outcome {
            Outcome::Rejected(rejection) => {
                *self.run.rejections.entry(rejection.code().to_string()).or_default() += 1;
                if matches!(rejection, Rejection::OnCooldown { .. }) {
                    self.route_pos += 1;
                }
            }
            Outcome::Progressed { .. } => {}
            Outcome::Completed { reward, .. } => {
                self.record(reward, now_ms);
                if skill == Skill::Combat && self.coins >= SHOP_PRICE * 2 {
                    let bought = engine.attempt(&self.run.player_id, SHOP_NODE, &ClickContext::default());
                    self.run.clicks += 1;
                    if let Some(reward) = bought.reward() {
                        self.record(reward, now_ms);
                    }
                }
            }
        }
        Ok(())
    }

    fn record(&mut self, reward: &Reward, now_ms: i64) {
        self.run.completions += 1;
        self.coins = (self.coins + reward.coins_gained).saturating_sub(reward.coins_spent);

        let report = &reward.report;
        if report.player_leveled_up {
            debug!(player_id = %self.run.player_id, level = report.player_level, "sim level up");
            for level in report.previous_player_level + 1..=report.player_level {
                self.run.level_ups.push(LevelUp {
                    level,
                    at_ms: now_ms,
                    click: self.run.clicks,
                });
            }
        }
        self.level = report.player_level;
        if let Some((skill, level)) = report.skill_level {
            self.skill_levels.insert(skill, level);
        }
    }

    fn finish(mut self, engine: &Engine) -> EngineResult<PlayerRun> {
        let record = engine.load_player(&self.run.player_id)?;
        self.run.final_level = record.level;
        self.run.final_xp = record.xp;
        self.run.coins = record.coins;
        self.run.items = record.inventory.len();
        self.run.active_class = record.active_class.clone();
        self.run.skill_levels = record
            .skills
            .iter()
            .map(|(skill, track)| (skill.key().to_string(), track.level))
            .collect();
        Ok(self.run)
    }
}
