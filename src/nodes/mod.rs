//! Node triggers and their durable registry.

pub mod registry;
pub mod types;

pub use registry::{TriggerMap, TriggerRegistry};
pub use types::{CombatNode, ExtractionNode, NodeTrigger, QuestNode, ShopNode};
