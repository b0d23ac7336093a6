use crate::catalog::Catch;
use crate::player::Skill;
use crate::progression::XpReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extra information about a click supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickContext {
    /// Debounce key; the node id is used when absent
    pub interaction_key: Option<String>,
}

impl ClickContext {
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            interaction_key: Some(key.into()),
        }
    }
}

/// Why an attempt did not advance any state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    RateLimited,
    OnCooldown {
        remaining_ms: i64,
    },
    LevelTooLow {
        skill: Skill,
        required: u32,
        current: u32,
    },
    NodeNotFound,
    InsufficientFunds {
        price: u64,
        coins: u64,
    },
    QuestAlreadyCompleted,
    MissingQuestItems {
        item: String,
        required: u32,
        held: u32,
    },
    StoreUnavailable,
}

impl Rejection {
    /// Short stable identifier, used in logs and reports.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::RateLimited => "rate_limited",
            Rejection::OnCooldown { .. } => "on_cooldown",
            Rejection::LevelTooLow { .. } => "level_too_low",
            Rejection::NodeNotFound => "node_not_found",
            Rejection::InsufficientFunds { .. } => "insufficient_funds",
            Rejection::QuestAlreadyCompleted => "quest_already_completed",
            Rejection::MissingQuestItems { .. } => "missing_quest_items",
            Rejection::StoreUnavailable => "store_unavailable",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::RateLimited => write!(f, "Slow down"),
            Rejection::OnCooldown { remaining_ms } => {
                let secs = (remaining_ms + 999) / 1000;
                write!(f, "depleted, retry in {secs}s")
            }
            Rejection::LevelTooLow {
                skill, required, ..
            } => write!(f, "You need level {required} {}", skill.name()),
            Rejection::NodeNotFound => write!(f, "Nothing to do here"),
            Rejection::InsufficientFunds { price, coins } => {
                write!(f, "You need {price} coins (you have {coins})")
            }
            Rejection::QuestAlreadyCompleted => write!(f, "Quest already completed"),
            Rejection::MissingQuestItems {
                item,
                required,
                held,
            } => write!(f, "Bring {required} {item} ({held}/{required})"),
            Rejection::StoreUnavailable => write!(f, "Try again later"),
        }
    }
}

/// What a completed interaction handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub item: Option<String>,
    /// Fish details for fishing completions
    pub catch: Option<Catch>,
    pub coins_gained: u64,
    pub coins_spent: u64,
    pub xp: u64,
    pub report: XpReport,
}

/// Result of one click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Rejected(Rejection),
    Progressed {
        current: u32,
        required: u32,
        attempts_left: u32,
    },
    Completed {
        reward: Reward,
        attempts_left: u32,
        /// The node is now on cooldown (or respawning) for this player
        depleted: bool,
    },
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(r) => Some(r),
            _ => None,
        }
    }

    pub fn reward(&self) -> Option<&Reward> {
        match self {
            Outcome::Completed { reward, .. } => Some(reward),
            _ => None,
        }
    }

    /// Text sent to the clicking player.
    pub fn message(&self) -> String {
        match self {
            Outcome::Rejected(rejection) => rejection.to_string(),
            Outcome::Progressed {
                current, required, ..
            } => format!("{current}/{required}"),
            Outcome::Completed {
                reward, depleted, ..
            } => {
                let mut text = match (&reward.item, reward.coins_spent) {
                    (Some(item), 0) => format!("You got {item}"),
                    (Some(item), spent) => format!("You bought {item} for {spent} coins"),
                    (None, _) => "Done".to_string(),
                };
                if reward.coins_gained > 0 {
                    text.push_str(&format!(" and {} coins", reward.coins_gained));
                }
                if reward.xp > 0 {
                    text.push_str(&format!(" (+{} XP)", reward.xp));
                }
                if *depleted {
                    text.push_str(", node depleted");
                }
                text
            }
        }
    }
}
