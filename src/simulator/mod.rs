//! Click-session simulator for balance inspection.
//!
//! Runs scripted players against a real [`crate::engine::Engine`] with a
//! manual clock, then reports how fast they level and how often they are
//! turned away.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{LevelPace, LevelUp, PlayerRun, SimReport};
pub use runner::run_simulation;
