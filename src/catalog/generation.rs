//! Fish rolls for fishing completions.

use super::data::{FISH_BASE_CHANCES, FISH_LEVEL_BONUS, FISH_NAMES};
use super::types::{Catch, FishRarity, FishingSpot};
use crate::core::constants::FISH_RARITY_BONUS_INTERVAL;
use rand::Rng;

/// Rolls a fish rarity based on the player's fishing level.
///
/// Base chances: Common 60%, Uncommon 25%, Rare 10%, Epic 4%, Legendary 1%.
/// Every 5 levels shifts 2% away from Common toward the rarer fish.
pub fn roll_fish_rarity(fishing_level: u32, rng: &mut impl Rng) -> FishRarity {
    let bonus_tiers = (fishing_level / FISH_RARITY_BONUS_INTERVAL) as f64;

    let mut chances = FISH_BASE_CHANCES;
    for (chance, bonus) in chances.iter_mut().zip(FISH_LEVEL_BONUS) {
        *chance += bonus * bonus_tiers;
    }
    chances[0] = chances[0].max(10.0);

    let roll: f64 = rng.gen_range(0.0..100.0);

    // Walk from the rarest fish down
    let mut cumulative = 100.0;
    for rarity in FishRarity::all().into_iter().rev() {
        if rarity == FishRarity::Common {
            break;
        }
        cumulative -= chances[rarity as usize];
        if roll >= cumulative {
            return rarity;
        }
    }
    FishRarity::Common
}

/// Rolls the fish caught at `spot`, capped at the spot's rarest fish.
pub fn roll_catch(spot: &FishingSpot, fishing_level: u32, rng: &mut impl Rng) -> Catch {
    let rarity = roll_fish_rarity(fishing_level, rng).min(spot.max_rarity);
    let names = &FISH_NAMES[rarity as usize];
    let name = names[rng.gen_range(0..names.len())];
    let xp = spot.tier.reward_xp(fishing_level) * rarity.xp_percent() / 100;

    Catch {
        name: name.to_string(),
        rarity,
        xp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::data::fishing_spot;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rarity_distribution_mostly_common_at_level_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let commons = (0..1000)
            .filter(|_| roll_fish_rarity(0, &mut rng) == FishRarity::Common)
            .count();
        assert!(commons > 500 && commons < 700, "commons = {commons}");
    }

    #[test]
    fn test_higher_level_shifts_toward_rare_fish() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let low = (0..2000)
            .filter(|_| roll_fish_rarity(0, &mut rng) >= FishRarity::Rare)
            .count();
        let high = (0..2000)
            .filter(|_| roll_fish_rarity(30, &mut rng) >= FishRarity::Rare)
            .count();
        assert!(high > low, "high = {high}, low = {low}");
    }

    #[test]
    fn test_catch_capped_by_spot() {
        let pond = fishing_spot("pond").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            let catch = roll_catch(pond, 30, &mut rng);
            assert!(catch.rarity <= FishRarity::Uncommon);
            assert!(catch.xp >= pond.tier.reward_xp(30));
        }
    }

    #[test]
    fn test_catch_name_matches_rarity() {
        let ocean = fishing_spot("ocean").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            let catch = roll_catch(ocean, 20, &mut rng);
            assert!(FISH_NAMES[catch.rarity as usize].contains(&catch.name.as_str()));
        }
    }
}
