//! BrickRPG - click-driven progression engine
//!
//! Players click world nodes to mine, gather, fish, fight, trade and turn in
//! quests. Each completion feeds three XP tracks (player, skill, class) that
//! share one cumulative level table. State lives in a shared key-value store
//! and is repaired on every load.

pub mod build_info;
pub mod catalog;
pub mod collab;
pub mod core;
pub mod engine;
pub mod interaction;
pub mod limiter;
pub mod nodes;
pub mod player;
pub mod progression;
pub mod simulator;
pub mod store;

pub use crate::core::{EngineConfig, EngineError, EngineResult};
pub use engine::Engine;
pub use interaction::{ClickContext, Outcome, Rejection};
