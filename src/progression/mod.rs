//! XP grants and class selection across the player, skill and class tracks.

pub mod classes;
pub mod xp;

pub use classes::{class_def, select_class, ClassDef, CLASSES};
pub use xp::{apply_grant, XpEngine, XpGrant, XpReport};
