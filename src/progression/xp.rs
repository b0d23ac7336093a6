//! Unified XP engine for the player, skill and class tracks.
//!
//! Every track uses the same cumulative [`LEVEL_TABLE`](crate::core::levels::LEVEL_TABLE).
//! Player and skill XP are independent running totals; class XP only lands
//! when a class is active and never blocks the other two.

use crate::core::config::ProgressionConfig;
use crate::core::constants::MAX_LEVEL;
use crate::core::error::StoreError;
use crate::core::levels::level_for_xp;
use crate::player::{PlayerRecord, PlayerRepository, Skill, Unlock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// XP amounts to apply in one grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpGrant {
    pub player_xp: u64,
    pub skill: Option<Skill>,
    pub skill_xp: Option<u64>,
    pub class_xp: Option<u64>,
}

impl XpGrant {
    pub fn player(xp: u64) -> Self {
        Self {
            player_xp: xp,
            ..Default::default()
        }
    }

    pub fn with_skill(mut self, skill: Skill, xp: u64) -> Self {
        self.skill = Some(skill);
        self.skill_xp = Some(xp);
        self
    }

    pub fn with_class(mut self, xp: u64) -> Self {
        self.class_xp = Some(xp);
        self
    }

    /// Splits a reward into the three tracks using the configured ratios.
    ///
    /// The default ratios of 1.0 grant the same amount to every track.
    pub fn from_reward(xp: u64, skill: Skill, config: &ProgressionConfig) -> Self {
        Self::player(xp)
            .with_skill(skill, scale(xp, config.skill_xp_ratio))
            .with_class(scale(xp, config.class_xp_ratio))
    }

    /// Player and class XP only, for rewards not tied to a skill.
    pub fn from_general_reward(xp: u64, config: &ProgressionConfig) -> Self {
        Self::player(xp).with_class(scale(xp, config.class_xp_ratio))
    }
}

fn scale(xp: u64, ratio: f64) -> u64 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    (xp as f64 * ratio).round().min(u64::MAX as f64) as u64
}

/// Level transitions caused by one grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpReport {
    pub player_leveled_up: bool,
    pub previous_player_level: u32,
    pub player_level: u32,
    pub player_xp: u64,

    pub skill_leveled_up: bool,
    /// Skill and its new level, when skill XP was granted
    pub skill_level: Option<(Skill, u32)>,

    pub class_leveled_up: bool,
    /// Active class and its new level, when class XP was granted
    pub class_level: Option<(String, u32)>,
    /// Class XP was requested but no class is active
    pub class_skipped: bool,

    pub health_gained: u32,
    /// One-time unlocks granted by this grant
    pub newly_unlocked: Vec<Unlock>,
}

impl XpReport {
    pub fn any_level_up(&self) -> bool {
        self.player_leveled_up || self.skill_leveled_up || self.class_leveled_up
    }
}

/// Applies a grant to a record in memory. Callers persist the record once afterwards.
pub fn apply_grant(
    record: &mut PlayerRecord,
    grant: &XpGrant,
    config: &ProgressionConfig,
) -> XpReport {
    let mut report = XpReport {
        previous_player_level: record.level,
        ..Default::default()
    };

    // Player track
    record.xp = record.xp.saturating_add(grant.player_xp);
    let new_level = level_for_xp(record.xp).min(MAX_LEVEL);
    let gained = new_level.saturating_sub(record.level);
    record.level = new_level;
    if gained > 0 {
        report.player_leveled_up = true;
        report.health_gained = config.health_per_level.saturating_mul(gained);
        record.max_health = record.max_health.saturating_add(report.health_gained);
        record.heal_full();
    }
    if record.level >= MAX_LEVEL && record.unlocks.insert(Unlock::Flight) {
        report.newly_unlocked.push(Unlock::Flight);
    }
    report.player_level = record.level;
    report.player_xp = record.xp;

    // Skill track
    if let (Some(skill), Some(xp)) = (grant.skill, grant.skill_xp) {
        let track = record.skill_mut(skill);
        report.skill_leveled_up = track.add_xp(xp) > 0;
        report.skill_level = Some((skill, track.level));
    }

    // Class track, only when a class is active
    if let Some(xp) = grant.class_xp {
        match record.active_class.clone() {
            Some(class_id) => {
                let track = record.classes.entry(class_id.clone()).or_default();
                report.class_leveled_up = track.add_xp(xp) > 0;
                report.class_level = Some((class_id, track.level));
            }
            None => report.class_skipped = true,
        }
    }

    record.health = record.health.min(record.max_health);
    report
}

/// Grants XP to stored player records.
#[derive(Clone)]
pub struct XpEngine {
    players: PlayerRepository,
}

impl XpEngine {
    pub fn new(players: PlayerRepository) -> Self {
        Self { players }
    }

    /// Loads the player, applies the grant and saves the record once.
    pub fn grant_xp(&self, player_id: &str, grant: &XpGrant) -> Result<XpReport, StoreError> {
        let config = self.players.config().clone();
        let report = self
            .players
            .update(player_id, |record| apply_grant(record, grant, &config))?;
        log_report(player_id, &report);
        Ok(report)
    }

    pub fn players(&self) -> &PlayerRepository {
        &self.players
    }
}

pub(crate) fn log_report(player_id: &str, report: &XpReport) {
    if report.player_leveled_up {
        info!(player_id, level = report.player_level, "player level up");
    }
    if report.skill_leveled_up {
        if let Some((skill, level)) = report.skill_level {
            info!(player_id, skill = skill.key(), level, "skill level up");
        }
    }
    if report.class_leveled_up {
        if let Some((class_id, level)) = &report.class_level {
            info!(player_id, class = %class_id, level, "class level up");
        }
    }
    if report.class_skipped {
        debug!(player_id, "no active class, class xp skipped");
    }
}
