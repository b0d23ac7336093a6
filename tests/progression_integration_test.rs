//! Progression integration tests
//!
//! Covers the level table, XP grants across the three tracks, class
//! selection and the one-time max-level unlock.

use brickrpg::core::constants::MAX_LEVEL;
use brickrpg::core::{level_for_xp, xp_for_level, xp_to_next_level, EngineConfig, ManualClock, LEVEL_TABLE};
use brickrpg::player::{PlayerRecord, Skill, Unlock};
use brickrpg::progression::{apply_grant, XpGrant};
use brickrpg::store::MemoryStore;
use brickrpg::{Engine, EngineError};
use std::sync::Arc;

fn engine() -> Engine {
    Engine::new(
        EngineConfig::seeded(5),
        Arc::new(MemoryStore::new()),
        Arc::new(ManualClock::new(0)),
    )
}

// ============================================================================
// Level Table Tests
// ============================================================================

#[test]
fn test_level_is_monotonic_in_xp() {
    let top = LEVEL_TABLE[MAX_LEVEL as usize] + 5_000;
    let mut previous = 0;
    let mut xp = 0;
    while xp <= top {
        let level = level_for_xp(xp);
        assert!(level >= previous, "level dropped at {xp} xp");
        assert!(level <= MAX_LEVEL);
        previous = level;
        xp += 37;
    }
    assert_eq!(previous, MAX_LEVEL);
}

#[test]
fn test_every_threshold_is_exact() {
    for level in 1..=MAX_LEVEL {
        let threshold = xp_for_level(level);
        assert_eq!(level_for_xp(threshold), level);
        assert_eq!(level_for_xp(threshold - 1), level - 1);
    }
}

#[test]
fn test_known_thresholds() {
    assert_eq!(xp_for_level(1), 100);
    assert_eq!(xp_for_level(30), 205_449);
    assert_eq!(xp_to_next_level(0), Some(100));
    assert_eq!(xp_to_next_level(xp_for_level(30)), None);
}

// ============================================================================
// XP Grant Tests
// ============================================================================

#[test]
fn test_crossing_max_level_once() {
    let engine = engine();
    engine
        .players()
        .update("hero", |r| {
            r.xp = LEVEL_TABLE[30] - 1;
            r.level = 29;
        })
        .unwrap();

    let report = engine.grant_xp("hero", &XpGrant::player(1)).unwrap();
    assert!(report.player_leveled_up);
    assert_eq!(report.player_level, 30);
    assert_eq!(report.newly_unlocked, vec![Unlock::Flight]);

    let again = engine.grant_xp("hero", &XpGrant::player(0)).unwrap();
    assert!(!again.player_leveled_up);
    assert_eq!(again.player_level, 30);
    assert!(again.newly_unlocked.is_empty());

    let record = engine.load_player("hero").unwrap();
    assert_eq!(record.level, 30);
    assert_eq!(record.unlocks.len(), 1);
}

#[test]
fn test_level_ups_raise_health_per_level() {
    let engine = engine();
    let report = engine
        .grant_xp("hero", &XpGrant::player(xp_for_level(3)))
        .unwrap();
    assert_eq!(report.health_gained, 30);

    let record = engine.load_player("hero").unwrap();
    assert_eq!(record.max_health, 130);
    assert_eq!(record.health, 130);
}

#[test]
fn test_tracks_advance_independently() {
    let engine = engine();
    engine.select_class("hero", "warrior").unwrap();

    engine
        .grant_xp(
            "hero",
            &XpGrant::player(50)
                .with_skill(Skill::Mining, 400)
                .with_class(100),
        )
        .unwrap();

    let record = engine.load_player("hero").unwrap();
    assert_eq!(record.level, 0);
    assert_eq!(record.skill_level(Skill::Mining), 2);
    assert_eq!(record.skill_level(Skill::Fishing), 0);
    assert_eq!(record.classes["warrior"].level, 1);
}

#[test]
fn test_class_xp_without_class_is_not_fatal() {
    let engine = engine();
    let report = engine
        .grant_xp("hero", &XpGrant::player(120).with_class(120))
        .unwrap();
    assert!(report.class_skipped);
    assert!(report.player_leveled_up);
    assert!(engine.load_player("hero").unwrap().classes.is_empty());
}

#[test]
fn test_switching_class_keeps_progress() {
    let engine = engine();
    engine.select_class("hero", "mage").unwrap();
    engine
        .grant_xp("hero", &XpGrant::player(0).with_class(250))
        .unwrap();
    engine.select_class("hero", "ranger").unwrap();
    engine
        .grant_xp("hero", &XpGrant::player(0).with_class(10))
        .unwrap();

    let record = engine.load_player("hero").unwrap();
    assert_eq!(record.classes["mage"].xp, 250);
    assert_eq!(record.classes["ranger"].xp, 10);
    assert_eq!(record.active_class.as_deref(), Some("ranger"));
}

#[test]
fn test_unknown_class_is_error() {
    let engine = engine();
    assert!(matches!(
        engine.select_class("hero", "pirate"),
        Err(EngineError::UnknownClass(name)) if name == "pirate"
    ));
}

#[test]
fn test_many_small_grants_equal_one_large() {
    let config = EngineConfig::default().progression;
    let mut small = PlayerRecord::default();
    for _ in 0..100 {
        apply_grant(&mut small, &XpGrant::player(97).with_skill(Skill::Combat, 97), &config);
    }
    let mut large = PlayerRecord::default();
    apply_grant(
        &mut large,
        &XpGrant::player(9_700).with_skill(Skill::Combat, 9_700),
        &config,
    );

    assert_eq!(small.level, large.level);
    assert_eq!(small.xp, large.xp);
    assert_eq!(small.max_health, large.max_health);
    assert_eq!(small.skill(Skill::Combat), large.skill(Skill::Combat));
}
