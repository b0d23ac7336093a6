//! Normalization of persisted player records.
//!
//! The player store is shared with other subsystems that may write partial or
//! stale shapes, so every load goes through [`normalize`]. It works on the raw
//! JSON value, repairs each field independently and reports what it changed.

use super::types::{PlayerRecord, Skill, TrackProgress, Unlock};
use crate::core::config::ProgressionConfig;
use crate::core::constants::MAX_LEVEL;
use crate::core::levels::level_for_xp;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A record after normalization, with the list of repairs applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub record: PlayerRecord,
    pub repairs: Vec<String>,
    /// True when no record was stored at all
    pub created: bool,
}

impl Normalized {
    /// Whether the record must be written back.
    pub fn is_dirty(&self) -> bool {
        self.created || !self.repairs.is_empty()
    }
}

/// Collects repairs while reading fields.
struct Repairs(Vec<String>);

impl Repairs {
    fn note(&mut self, field: &str, reason: &str) {
        self.0.push(format!("{field}: {reason}"));
    }
}

/// Builds a structurally valid record from whatever was stored.
pub fn normalize(raw: Option<&Value>, config: &ProgressionConfig) -> Normalized {
    let mut repairs = Repairs(Vec::new());
    let empty = Map::new();

    let obj = match raw {
        None => {
            return Normalized {
                record: PlayerRecord::new(config.base_health),
                repairs: Vec::new(),
                created: true,
            }
        }
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            repairs.note("record", "not an object, reset to defaults");
            &empty
        }
    };

    let xp = read_u64(obj, "xp", 0, &mut repairs);
    let level = reconcile_level(obj.get("level"), xp, "level", &mut repairs);

    let mut max_health = read_u64(obj, "max_health", config.base_health as u64, &mut repairs);
    if max_health == 0 || max_health > u32::MAX as u64 {
        repairs.note("max_health", "out of range, reset to default");
        max_health = config.base_health as u64;
    }
    let max_health = max_health as u32;

    let mut health = read_u64(obj, "health", max_health as u64, &mut repairs);
    if health > max_health as u64 {
        repairs.note("health", "above max_health, clamped");
        health = max_health as u64;
    }

    let inventory = read_string_list(obj, "inventory", &mut repairs);
    let coins = read_u64(obj, "coins", 0, &mut repairs);
    let skills = read_skills(obj, &mut repairs);
    let mut classes = read_classes(obj, &mut repairs);
    let active_class = read_active_class(obj, &mut classes, &mut repairs);

    let mut unlocks = read_unlocks(obj, &mut repairs);
    if level >= MAX_LEVEL && unlocks.insert(Unlock::Flight) {
        repairs.note("unlocks", "max level without flight unlock, granted");
    }

    let completed_quests = read_string_list(obj, "completed_quests", &mut repairs)
        .into_iter()
        .collect::<BTreeSet<_>>();

    Normalized {
        record: PlayerRecord {
            level,
            xp,
            health: health as u32,
            max_health,
            inventory,
            coins,
            skills,
            active_class,
            classes,
            unlocks,
            completed_quests,
        },
        repairs: repairs.0,
        created: false,
    }
}

/// Outcome of reading a JSON number as a non-negative integer.
enum Coerced {
    Exact(u64),
    Truncated(u64),
}

enum CoerceError {
    Negative,
    WrongType,
}

fn coerce_u64(value: &Value) -> Result<Coerced, CoerceError> {
    let n = match value {
        Value::Number(n) => n,
        _ => return Err(CoerceError::WrongType),
    };
    if let Some(v) = n.as_u64() {
        return Ok(Coerced::Exact(v));
    }
    if n.as_i64().is_some() {
        return Err(CoerceError::Negative);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => Ok(Coerced::Truncated(f.min(u64::MAX as f64) as u64)),
        Some(f) if f.is_finite() => Err(CoerceError::Negative),
        _ => Err(CoerceError::WrongType),
    }
}

/// Reads a non-negative integer, repairing negatives, fractions and wrong types.
fn read_u64(obj: &Map<String, Value>, field: &str, default: u64, repairs: &mut Repairs) -> u64 {
    let value = match obj.get(field) {
        None | Some(Value::Null) => {
            repairs.note(field, "missing, reset to default");
            return default;
        }
        Some(value) => value,
    };
    match coerce_u64(value) {
        Ok(Coerced::Exact(v)) => v,
        Ok(Coerced::Truncated(v)) => {
            repairs.note(field, "fractional, truncated");
            v
        }
        Err(CoerceError::Negative) => {
            repairs.note(field, "negative, reset to zero");
            0
        }
        Err(CoerceError::WrongType) => {
            repairs.note(field, "wrong type, reset to default");
            default
        }
    }
}

/// Derives the level from XP, noting clamps and mismatches against the stored level.
fn reconcile_level(stored: Option<&Value>, xp: u64, field: &str, repairs: &mut Repairs) -> u32 {
    let derived = level_for_xp(xp);
    let stored = match stored.map(coerce_u64) {
        Some(Ok(Coerced::Exact(level))) | Some(Ok(Coerced::Truncated(level))) => level,
        _ => {
            repairs.note(field, "missing or malformed, derived from xp");
            return derived;
        }
    };
    if stored > MAX_LEVEL as u64 {
        repairs.note(field, "above max level, clamped");
    } else if stored != derived as u64 {
        repairs.note(field, "disagrees with xp, derived from xp");
    }
    derived
}

fn read_track(value: Option<&Value>, field: &str, repairs: &mut Repairs) -> TrackProgress {
    let obj = match value {
        Some(Value::Object(obj)) => obj,
        _ => {
            repairs.note(field, "missing or malformed, reinitialized");
            return TrackProgress::default();
        }
    };
    let xp_field = format!("{field}.xp");
    let xp = match obj.get("xp").map(coerce_u64) {
        Some(Ok(Coerced::Exact(xp))) => xp,
        Some(Ok(Coerced::Truncated(xp))) => {
            repairs.note(&xp_field, "fractional, truncated");
            xp
        }
        _ => {
            repairs.note(&xp_field, "missing or malformed, reset to zero");
            0
        }
    };
    let level = reconcile_level(obj.get("level"), xp, &format!("{field}.level"), repairs);
    TrackProgress { level, xp }
}

fn read_skills(obj: &Map<String, Value>, repairs: &mut Repairs) -> BTreeMap<Skill, TrackProgress> {
    let raw = match obj.get("skills") {
        Some(Value::Object(raw)) => Some(raw),
        _ => {
            repairs.note("skills", "missing or malformed, reinitialized");
            None
        }
    };

    let mut skills = BTreeMap::new();
    for skill in Skill::all() {
        let track = match raw {
            Some(raw) => read_track(raw.get(skill.key()), &format!("skills.{}", skill.key()), repairs),
            None => TrackProgress::default(),
        };
        skills.insert(skill, track);
    }

    if let Some(raw) = raw {
        for key in raw.keys().filter(|k| Skill::from_key(k).is_none()) {
            repairs.note(&format!("skills.{key}"), "unknown skill, dropped");
        }
    }
    skills
}

fn read_classes(obj: &Map<String, Value>, repairs: &mut Repairs) -> BTreeMap<String, TrackProgress> {
    match obj.get("classes") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(raw)) => raw
            .iter()
            .map(|(id, value)| {
                let track = read_track(Some(value), &format!("classes.{id}"), repairs);
                (id.clone(), track)
            })
            .collect(),
        Some(_) => {
            repairs.note("classes", "malformed, reinitialized");
            BTreeMap::new()
        }
    }
}

fn read_active_class(
    obj: &Map<String, Value>,
    classes: &mut BTreeMap<String, TrackProgress>,
    repairs: &mut Repairs,
) -> Option<String> {
    match obj.get("active_class") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) if !id.is_empty() => {
            if !classes.contains_key(id) {
                repairs.note(&format!("classes.{id}"), "active class had no track, reinitialized");
                classes.insert(id.clone(), TrackProgress::default());
            }
            Some(id.clone())
        }
        Some(_) => {
            repairs.note("active_class", "malformed, cleared");
            None
        }
    }
}

fn read_string_list(obj: &Map<String, Value>, field: &str, repairs: &mut Repairs) -> Vec<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            if strings.len() != items.len() {
                repairs.note(field, "non-string entries dropped");
            }
            strings
        }
        Some(_) => {
            repairs.note(field, "not a list, reset to empty");
            Vec::new()
        }
    }
}

fn read_unlocks(obj: &Map<String, Value>, repairs: &mut Repairs) -> BTreeSet<Unlock> {
    let names = read_string_list(obj, "unlocks", repairs);
    let mut unlocks = BTreeSet::new();
    for name in names {
        match serde_json::from_value::<Unlock>(Value::String(name.clone())) {
            Ok(unlock) => {
                unlocks.insert(unlock);
            }
            Err(_) => repairs.note(&format!("unlocks.{name}"), "unknown unlock, dropped"),
        }
    }
    unlocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ProgressionConfig {
        ProgressionConfig::default()
    }

    fn clean_json() -> Value {
        serde_json::to_value(PlayerRecord::default()).unwrap()
    }

    #[test]
    fn test_missing_record_is_created_with_defaults() {
        let n = normalize(None, &config());
        assert!(n.created);
        assert!(n.is_dirty());
        assert_eq!(n.record, PlayerRecord::default());
    }

    #[test]
    fn test_clean_record_is_not_dirty() {
        let n = normalize(Some(&clean_json()), &config());
        assert!(!n.is_dirty(), "repairs: {:?}", n.repairs);
        assert_eq!(n.record, PlayerRecord::default());
    }

    #[test]
    fn test_serialized_record_roundtrips_clean() {
        let mut record = PlayerRecord::default();
        record.xp = 500;
        record.level = level_for_xp(500);
        record.skill_mut(Skill::Fishing).add_xp(150);
        record.add_item("Trout");
        record.active_class = Some("warrior".to_string());
        record
            .classes
            .insert("warrior".to_string(), TrackProgress::from_xp(120));

        let n = normalize(Some(&serde_json::to_value(&record).unwrap()), &config());
        assert!(!n.is_dirty(), "repairs: {:?}", n.repairs);
        assert_eq!(n.record, record);
    }

    #[test]
    fn test_undefined_skills_reinitialized() {
        let mut raw = clean_json();
        raw.as_object_mut().unwrap().remove("skills");
        let n = normalize(Some(&raw), &config());
        assert!(n.is_dirty());
        assert_eq!(n.record.skill(Skill::Mining), TrackProgress::default());
        assert_eq!(n.record.skills.len(), 5);
    }

    #[test]
    fn test_malformed_single_skill_reinitialized_others_kept() {
        let mut raw = clean_json();
        raw["skills"]["fishing"] = json!("broken");
        raw["skills"]["mining"] = json!({"level": 1, "xp": 150});
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.skill(Skill::Fishing), TrackProgress::default());
        assert_eq!(n.record.skill(Skill::Mining), TrackProgress { level: 1, xp: 150 });
        assert_eq!(n.repairs.len(), 1, "{:?}", n.repairs);
    }

    #[test]
    fn test_wrong_types_reset_to_defaults() {
        let raw = json!({
            "level": "high",
            "xp": "lots",
            "health": [],
            "max_health": null,
            "inventory": "pickaxe",
        });
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.level, 0);
        assert_eq!(n.record.xp, 0);
        assert_eq!(n.record.max_health, 100);
        assert_eq!(n.record.health, 100);
        assert!(n.record.inventory.is_empty());
        assert!(n.is_dirty());
    }

    #[test]
    fn test_level_above_max_clamped() {
        let mut raw = clean_json();
        raw["level"] = json!(99);
        raw["xp"] = json!(1_000_000);
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.level, MAX_LEVEL);
        assert!(n.record.unlocks.contains(&Unlock::Flight));
    }

    #[test]
    fn test_level_rederived_from_xp() {
        let mut raw = clean_json();
        raw["level"] = json!(12);
        raw["xp"] = json!(400);
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.level, 2);
        assert!(n.repairs.iter().any(|r| r.starts_with("level")));
    }

    #[test]
    fn test_negative_xp_reset_to_zero() {
        let mut raw = clean_json();
        raw["xp"] = json!(-50);
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.xp, 0);
        assert!(n.is_dirty());
    }

    #[test]
    fn test_fractional_xp_truncated() {
        let mut raw = clean_json();
        raw["xp"] = json!(150.75);
        raw["level"] = json!(1);
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.xp, 150);
        assert_eq!(n.record.level, 1);
        assert!(n.repairs.iter().any(|r| r.contains("fractional")));
    }

    #[test]
    fn test_health_clamped_to_max() {
        let mut raw = clean_json();
        raw["health"] = json!(500);
        raw["max_health"] = json!(120);
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.health, 120);
        assert_eq!(n.record.max_health, 120);
    }

    #[test]
    fn test_non_object_record_reset() {
        let n = normalize(Some(&json!("garbage")), &config());
        assert!(!n.created);
        assert!(n.is_dirty());
        assert_eq!(n.record.level, 0);
        assert_eq!(n.record.skills.len(), 5);
    }

    #[test]
    fn test_active_class_without_track_gets_one() {
        let mut raw = clean_json();
        raw["active_class"] = json!("ranger");
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.active_class.as_deref(), Some("ranger"));
        assert_eq!(n.record.classes["ranger"], TrackProgress::default());
    }

    #[test]
    fn test_malformed_class_track_reinitialized() {
        let mut raw = clean_json();
        raw["active_class"] = json!("mage");
        raw["classes"] = json!({"mage": 7});
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.classes["mage"], TrackProgress::default());
    }

    #[test]
    fn test_inventory_non_strings_dropped() {
        let mut raw = clean_json();
        raw["inventory"] = json!(["Copper Ore", 5, null, "Trout"]);
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.inventory, vec!["Copper Ore", "Trout"]);
    }

    #[test]
    fn test_unknown_unlock_dropped() {
        let mut raw = clean_json();
        raw["unlocks"] = json!(["flight", "teleport"]);
        raw["xp"] = json!(205_449);
        raw["level"] = json!(30);
        let n = normalize(Some(&raw), &config());
        assert_eq!(n.record.unlocks.len(), 1);
        assert_eq!(n.repairs.len(), 1, "{:?}", n.repairs);
    }
}
