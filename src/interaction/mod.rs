//! Click handling for world nodes.

pub mod commerce;
pub mod logic;
pub mod types;

pub use logic::{advance, ClickEnv, Step};
pub use types::{ClickContext, Outcome, Rejection, Reward};
