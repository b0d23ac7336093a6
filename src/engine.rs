//! The progression engine: the single entry point for clicks, XP grants and
//! node registration.
//!
//! The engine owns its services (rate limiter, trigger registry, player
//! repository) and is driven through `&mut self`, so every click runs to
//! completion before the next one starts. The store is shared with other
//! subsystems and writes are last-write-wins.

use crate::collab::{Directory, Messenger, NullMessenger, StaticDirectory};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::EngineConfig;
use crate::core::constants::UNKNOWN_PLAYER_NAME;
use crate::core::error::{EngineError, EngineResult, StoreError};
use crate::interaction::{advance, ClickContext, ClickEnv, Outcome, Rejection};
use crate::limiter::RateLimiter;
use crate::nodes::{NodeTrigger, TriggerMap, TriggerRegistry};
use crate::player::{PlayerRecord, PlayerRepository};
use crate::progression::{class_def, select_class, xp, XpEngine, XpGrant, XpReport};
use crate::store::{JsonFileStore, KeyValueStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    limiter: RateLimiter,
    registry: TriggerRegistry,
    players: PlayerRepository,
    xp: XpEngine,
    messenger: Arc<dyn Messenger>,
    directory: Arc<dyn Directory>,
    rng: StdRng,
}

impl Engine {
    /// Creates an engine over `store` with silent messaging and no directory.
    pub fn new(config: EngineConfig, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let players = PlayerRepository::new(store.clone(), config.progression.clone());
        Self {
            limiter: RateLimiter::new(config.rate_limit.clone(), clock.clone()),
            registry: TriggerRegistry::new(store),
            xp: XpEngine::new(players.clone()),
            players,
            clock,
            messenger: Arc::new(NullMessenger),
            directory: Arc::new(StaticDirectory::new()),
            rng,
            config,
        }
    }

    /// Opens an engine over JSON files in the configured data directory,
    /// using the system clock.
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        let store = JsonFileStore::open_or_default(config.storage.data_dir.as_deref())
            .map_err(|e| StoreError::Unavailable(format!("cannot open data directory: {e}")))?;
        info!(dir = %store.dir().display(), "opened player data store");
        Ok(Self::new(config, Arc::new(store), Arc::new(SystemClock)))
    }

    pub fn with_collaborators(
        mut self,
        messenger: Arc<dyn Messenger>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        self.messenger = messenger;
        self.directory = directory;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn limiter_mut(&mut self) -> &mut RateLimiter {
        &mut self.limiter
    }

    pub fn players(&self) -> &PlayerRepository {
        &self.players
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Registers (or replaces) a node discovered by world scanning.
    pub fn register_node(&self, node_id: &str, trigger: NodeTrigger) -> EngineResult<()> {
        trigger.validate()?;
        let kind = trigger.kind_name();
        self.registry.upsert(node_id, trigger)?;
        info!(node_id, kind, "registered node");
        Ok(())
    }

    pub fn remove_node(&self, node_id: &str) -> EngineResult<bool> {
        let removed = self.registry.remove(node_id)?;
        if removed {
            info!(node_id, "removed node");
        }
        Ok(removed)
    }

    pub fn node(&self, node_id: &str) -> EngineResult<Option<NodeTrigger>> {
        Ok(self.registry.get(node_id)?)
    }

    pub fn nodes(&self) -> EngineResult<TriggerMap> {
        Ok(self.registry.load_all()?)
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    /// Handles one click of `player_id` on `node_id`.
    pub fn attempt(&mut self, player_id: &str, node_id: &str, ctx: &ClickContext) -> Outcome {
        let mut triggers = match self.registry.load_all() {
            Ok(triggers) => triggers,
            Err(e) => return self.store_failure(player_id, node_id, &e),
        };

        let limit = match triggers.get(node_id) {
            Some(NodeTrigger::Combat(_)) => self.config.rate_limit.combat_max_per_window,
            _ => self.config.rate_limit.max_per_window,
        };
        let key = ctx.interaction_key.as_deref().unwrap_or(node_id);
        if !self.limiter.try_accept_with_limit(player_id, Some(key), limit) {
            debug!(player_id, node_id, "click rate limited");
            return Outcome::Rejected(Rejection::RateLimited);
        }

        let Some(trigger) = triggers.get_mut(node_id) else {
            debug!(player_id, node_id, "click on unregistered node");
            return self.finish(player_id, Outcome::Rejected(Rejection::NodeNotFound));
        };

        // Fresh read right before the write
        let mut record = match self.players.load(player_id) {
            Ok(record) => record,
            Err(e) => return self.store_failure(player_id, node_id, &e),
        };

        let mut env = ClickEnv {
            player_id,
            now_ms: self.clock.now_ms(),
            nodes: &self.config.nodes,
            progression: &self.config.progression,
            rng: &mut self.rng,
        };
        let step = advance(trigger, &mut record, &mut env);

        if step.player_changed {
            if let Err(e) = self.players.save(player_id, &record) {
                return self.store_failure(player_id, node_id, &e);
            }
        }
        if step.node_changed {
            if let Err(e) = self.registry.save_all(&triggers) {
                if !step.player_changed {
                    return self.store_failure(player_id, node_id, &e);
                }
                // The reward already landed, so the player still hears about it
                error!(player_id, node_id, error = %e, "failed to save node state after reward");
            }
        }

        if let Some(reward) = step.outcome.reward() {
            info!(
                player_id,
                node_id,
                item = reward.item.as_deref().unwrap_or("-"),
                xp = reward.xp,
                "interaction completed"
            );
            xp::log_report(player_id, &reward.report);
            self.announce(player_id, &reward.report);
        }
        self.finish(player_id, step.outcome)
    }

    fn store_failure(&self, player_id: &str, node_id: &str, e: &StoreError) -> Outcome {
        error!(player_id, node_id, error = %e, "store failure during click");
        self.finish(player_id, Outcome::Rejected(Rejection::StoreUnavailable))
    }

    fn finish(&self, player_id: &str, outcome: Outcome) -> Outcome {
        self.tell(player_id, &outcome.message());
        outcome
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Grants XP outside of node clicks (scripted rewards, admin tools).
    pub fn grant_xp(&self, player_id: &str, grant: &XpGrant) -> EngineResult<XpReport> {
        let report = self.xp.grant_xp(player_id, grant)?;
        self.announce(player_id, &report);
        Ok(report)
    }

    /// Sets the player's active class.
    pub fn select_class(&self, player_id: &str, class_id: &str) -> EngineResult<()> {
        let def = class_def(class_id).ok_or_else(|| EngineError::UnknownClass(class_id.to_string()))?;
        let changed = self
            .players
            .update(player_id, |record| select_class(record, def.id))??;
        if changed {
            info!(player_id, class = def.id, "class selected");
            self.tell(player_id, &format!("You are now a {}", def.name));
        }
        Ok(())
    }

    pub fn load_player(&self, player_id: &str) -> EngineResult<PlayerRecord> {
        Ok(self.players.load(player_id)?)
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    fn tell(&self, player_id: &str, text: &str) {
        if let Err(e) = self.messenger.tell(player_id, text) {
            warn!(player_id, error = %e, "message not delivered");
        }
    }

    /// Broadcasts level-ups, or only tells the player when announcements are off.
    fn announce(&self, player_id: &str, report: &XpReport) {
        if !report.any_level_up() && report.newly_unlocked.is_empty() {
            return;
        }
        let name = self
            .directory
            .display_name(player_id)
            .unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string());

        for line in level_up_lines(&name, report) {
            if !self.config.progression.announce_level_ups {
                self.tell(player_id, &line);
            } else if let Err(e) = self.messenger.announce(&line) {
                warn!(player_id, error = %e, "level up announcement failed");
            }
        }
    }
}

/// Broadcast lines for every level transition in a report.
pub fn level_up_lines(name: &str, report: &XpReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.player_leveled_up {
        lines.push(format!("{name} reached level {}!", report.player_level));
    }
    if report.skill_leveled_up {
        if let Some((skill, level)) = report.skill_level {
            lines.push(format!("{name} reached {} level {level}!", skill.name()));
        }
    }
    if report.class_leveled_up {
        if let Some((class_id, level)) = &report.class_level {
            let class_name = class_def(class_id).map_or(class_id.as_str(), |c| c.name);
            lines.push(format!("{name} reached {class_name} level {level}!"));
        }
    }
    for unlock in &report.newly_unlocked {
        lines.push(format!("{name} unlocked {}!", unlock.name()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::RecordingMessenger;
    use crate::core::clock::ManualClock;
    use crate::player::{Skill, Unlock};
    use crate::store::MemoryStore;

    fn engine() -> (Engine, Arc<ManualClock>, Arc<RecordingMessenger>) {
        let clock = Arc::new(ManualClock::new(0));
        let messenger = Arc::new(RecordingMessenger::new());
        let engine = Engine::new(
            EngineConfig::seeded(1),
            Arc::new(MemoryStore::new()),
            clock.clone(),
        )
        .with_collaborators(
            messenger.clone(),
            Arc::new(StaticDirectory::new().with("alice", "Alice")),
        );
        (engine, clock, messenger)
    }

    #[test]
    fn test_unknown_node_rejected() {
        let (mut engine, _, messenger) = engine();
        let outcome = engine.attempt("alice", "nowhere", &ClickContext::default());
        assert_eq!(outcome, Outcome::Rejected(Rejection::NodeNotFound));
        assert_eq!(messenger.told("alice").len(), 1);
    }

    #[test]
    fn test_register_rejects_unknown_tier() {
        let (engine, _, _) = engine();
        assert!(matches!(
            engine.register_node("rock", NodeTrigger::mining("unobtainium")),
            Err(EngineError::UnknownTier { .. })
        ));
        assert!(engine.node("rock").unwrap().is_none());
    }

    #[test]
    fn test_click_progress_is_persisted() {
        let (mut engine, clock, _) = engine();
        engine.register_node("rock", NodeTrigger::mining("copper")).unwrap();

        engine.attempt("alice", "rock", &ClickContext::default());
        clock.advance(200);
        engine.attempt("alice", "rock", &ClickContext::default());

        match engine.node("rock").unwrap() {
            Some(NodeTrigger::Mining(node)) => assert_eq!(node.progress_of("alice"), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_grant_xp_announces_with_display_name() {
        let (engine, _, messenger) = engine();
        engine
            .grant_xp("alice", &XpGrant::player(100).with_skill(Skill::Fishing, 100))
            .unwrap();
        assert_eq!(
            messenger.announcements(),
            vec!["Alice reached level 1!", "Alice reached Fishing level 1!"]
        );
    }

    #[test]
    fn test_unknown_player_announced_as_placeholder() {
        let (engine, _, messenger) = engine();
        engine.grant_xp("bob", &XpGrant::player(100)).unwrap();
        assert_eq!(messenger.announcements(), vec!["Someone reached level 1!"]);
    }

    #[test]
    fn test_select_class() {
        let (engine, _, _) = engine();
        engine.select_class("alice", "ranger").unwrap();
        let record = engine.load_player("alice").unwrap();
        assert_eq!(record.active_class.as_deref(), Some("ranger"));

        assert!(matches!(
            engine.select_class("alice", "bard"),
            Err(EngineError::UnknownClass(_))
        ));
    }

    #[test]
    fn test_level_up_lines_include_unlock() {
        let report = XpReport {
            player_leveled_up: true,
            player_level: 30,
            newly_unlocked: vec![Unlock::Flight],
            ..Default::default()
        };
        let lines = level_up_lines("Alice", &report);
        assert_eq!(lines[0], "Alice reached level 30!");
        assert!(lines[1].starts_with("Alice unlocked"));
    }
}
