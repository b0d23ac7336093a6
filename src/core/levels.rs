//! Cumulative XP level table shared by the player, skill and class tracks.
//!
//! Each entry is the total XP needed to reach that level. The per-level
//! increment follows `XP_CURVE_BASE * level^XP_CURVE_EXPONENT`, so the table
//! starts at 100 XP for level 1 and ends at 205,449 XP for level 30.

use super::constants::{MAX_LEVEL, XP_CURVE_BASE, XP_CURVE_EXPONENT};

/// Total XP required to reach each level, indexed by level (0..=MAX_LEVEL).
pub const LEVEL_TABLE: [u64; MAX_LEVEL as usize + 1] = [
    0, 100, 382, 901, 1701, 2819, 4288, 6140, 8402, 11102, 14264, 17912, 22068, 26755, 31993,
    37802, 44202, 51211, 58847, 67128, 76072, 85695, 96013, 107043, 118800, 131300, 144557,
    158586, 173402, 189018, 205449,
];

/// XP a level adds on top of the previous threshold, per the curve.
pub fn curve_increment(level: u32) -> u64 {
    (XP_CURVE_BASE * f64::powf(level as f64, XP_CURVE_EXPONENT)) as u64
}

/// Returns the highest level whose cumulative threshold is at most `total_xp`.
///
/// Searches from the top down so equal thresholds resolve to the higher level.
pub fn level_for_xp(total_xp: u64) -> u32 {
    (0..=MAX_LEVEL)
        .rev()
        .find(|&level| LEVEL_TABLE[level as usize] <= total_xp)
        .unwrap_or(0)
}

/// Cumulative XP required to reach `level`, clamped to the table.
pub fn xp_for_level(level: u32) -> u64 {
    LEVEL_TABLE[level.min(MAX_LEVEL) as usize]
}

/// XP still missing before the next level, or `None` at the maximum level.
pub fn xp_to_next_level(total_xp: u64) -> Option<u64> {
    let level = level_for_xp(total_xp);
    if level >= MAX_LEVEL {
        return None;
    }
    Some(xp_for_level(level + 1).saturating_sub(total_xp))
}

/// Fraction of the way from the current level to the next (0.0 - 1.0).
pub fn level_progress(total_xp: u64) -> f64 {
    let level = level_for_xp(total_xp);
    if level >= MAX_LEVEL {
        return 1.0;
    }
    let floor = xp_for_level(level);
    let span = xp_for_level(level + 1) - floor;
    (total_xp - floor) as f64 / span as f64
}
