//! Shop purchases and quest turn-ins.

use super::logic::Step;
use super::types::{Outcome, Rejection, Reward};
use crate::core::config::ProgressionConfig;
use crate::core::constants::PURCHASE_BARTERING_XP;
use crate::nodes::{QuestNode, ShopNode};
use crate::player::{PlayerRecord, Skill};
use crate::progression::{apply_grant, XpGrant};
use tracing::info;

/// Buys the shop's item if the player can afford it.
pub fn buy(shop: &ShopNode, record: &mut PlayerRecord, config: &ProgressionConfig) -> Step {
    if record.coins < shop.price {
        return Step::rejected(
            Rejection::InsufficientFunds {
                price: shop.price,
                coins: record.coins,
            },
            false,
        );
    }

    record.coins -= shop.price;
    record.add_item(shop.item.clone());
    let grant = XpGrant::from_reward(PURCHASE_BARTERING_XP, Skill::Bartering, config);
    let report = apply_grant(record, &grant, config);

    Step {
        outcome: Outcome::Completed {
            reward: Reward {
                item: Some(shop.item.clone()),
                coins_spent: shop.price,
                xp: PURCHASE_BARTERING_XP,
                report,
                ..Default::default()
            },
            attempts_left: 0,
            depleted: false,
        },
        node_changed: false,
        player_changed: true,
    }
}

/// Hands in the quest items once for the quest reward.
pub fn turn_in_quest(
    quest: &QuestNode,
    record: &mut PlayerRecord,
    config: &ProgressionConfig,
) -> Step {
    if record.completed_quests.contains(&quest.quest_id) {
        return Step::rejected(Rejection::QuestAlreadyCompleted, false);
    }

    let held = record.count_item(&quest.required_item);
    if held < quest.required_count as usize {
        return Step::rejected(
            Rejection::MissingQuestItems {
                item: quest.required_item.clone(),
                required: quest.required_count,
                held: held as u32,
            },
            false,
        );
    }

    record.remove_items(&quest.required_item, quest.required_count as usize);
    record.completed_quests.insert(quest.quest_id.clone());
    if let Some(item) = &quest.reward_item {
        record.add_item(item.clone());
    }

    let grant = match quest.skill {
        Some(skill) => XpGrant::from_reward(quest.reward_xp, skill, config),
        None => XpGrant::from_general_reward(quest.reward_xp, config),
    };
    let report = apply_grant(record, &grant, config);
    info!(quest = %quest.quest_id, xp = quest.reward_xp, "quest completed");

    Step {
        outcome: Outcome::Completed {
            reward: Reward {
                item: quest.reward_item.clone(),
                xp: quest.reward_xp,
                report,
                ..Default::default()
            },
            attempts_left: 0,
            depleted: false,
        },
        node_changed: false,
        player_changed: true,
    }
}
