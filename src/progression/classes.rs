//! Character classes a player can pick for the class XP track.

use crate::core::error::{EngineError, EngineResult};
use crate::player::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLASSES: [ClassDef; 4] = [
    ClassDef {
        id: "warrior",
        name: "Warrior",
        description: "Front-line fighter",
    },
    ClassDef {
        id: "ranger",
        name: "Ranger",
        description: "Tracker and angler of the wilds",
    },
    ClassDef {
        id: "mage",
        name: "Mage",
        description: "Student of the arcane",
    },
    ClassDef {
        id: "artisan",
        name: "Artisan",
        description: "Miner, gatherer and trader",
    },
];

pub fn class_def(id: &str) -> Option<&'static ClassDef> {
    CLASSES.iter().find(|c| c.id == id)
}

/// Makes `class_id` the active class, keeping progress in any other class.
///
/// Returns true if the class was not active before.
pub fn select_class(record: &mut PlayerRecord, class_id: &str) -> EngineResult<bool> {
    let def = class_def(class_id).ok_or_else(|| EngineError::UnknownClass(class_id.to_string()))?;
    record.classes.entry(def.id.to_string()).or_default();
    if record.active_class.as_deref() == Some(def.id) {
        return Ok(false);
    }
    record.active_class = Some(def.id.to_string());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::TrackProgress;

    #[test]
    fn test_select_initializes_track() {
        let mut record = PlayerRecord::default();
        assert!(select_class(&mut record, "ranger").unwrap());
        assert_eq!(record.active_class.as_deref(), Some("ranger"));
        assert_eq!(record.classes["ranger"], TrackProgress::default());
    }

    #[test]
    fn test_switching_keeps_previous_progress() {
        let mut record = PlayerRecord::default();
        select_class(&mut record, "warrior").unwrap();
        record.classes.get_mut("warrior").unwrap().add_xp(500);

        select_class(&mut record, "mage").unwrap();
        assert_eq!(record.classes["warrior"].xp, 500);

        select_class(&mut record, "warrior").unwrap();
        assert_eq!(record.classes["warrior"].xp, 500);
        assert_eq!(record.active_class.as_deref(), Some("warrior"));
    }

    #[test]
    fn test_reselecting_active_class_is_noop() {
        let mut record = PlayerRecord::default();
        select_class(&mut record, "mage").unwrap();
        assert!(!select_class(&mut record, "mage").unwrap());
    }

    #[test]
    fn test_unknown_class_rejected() {
        let mut record = PlayerRecord::default();
        assert!(matches!(
            select_class(&mut record, "necromancer"),
            Err(EngineError::UnknownClass(_))
        ));
        assert!(record.active_class.is_none());
    }
}
