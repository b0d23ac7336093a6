//! Simulation report generation.

use serde::Serialize;
use std::collections::BTreeMap;

/// A player level reached during the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub level: u32,
    /// Simulated time of the click that crossed the threshold
    pub at_ms: i64,
    pub click: u64,
}

/// Per-player results of one session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerRun {
    pub player_id: String,
    pub clicks: u64,
    pub completions: u64,
    /// Rejection code -> count
    pub rejections: BTreeMap<String, u64>,
    pub level_ups: Vec<LevelUp>,

    pub final_level: u32,
    pub final_xp: u64,
    pub skill_levels: BTreeMap<String, u32>,
    pub active_class: Option<String>,
    pub coins: u64,
    pub items: usize,
}

impl PlayerRun {
    pub fn new(player_id: String) -> Self {
        Self {
            player_id,
            ..Default::default()
        }
    }
}

/// Average pace to one player level across the players who reached it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelPace {
    pub level: u32,
    pub players_reached: usize,
    pub avg_minutes: f64,
    pub avg_clicks: f64,
}

/// Aggregated results from a simulated session.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_players: usize,
    pub clicks_per_player: u64,
    pub sim_duration_ms: i64,

    pub avg_final_level: f64,
    pub max_final_level: u32,
    pub avg_completions: f64,
    pub rejection_totals: BTreeMap<String, u64>,
    pub level_curve: Vec<LevelPace>,

    pub runs: Vec<PlayerRun>,
}

impl SimReport {
    /// Create a new report from finished player runs.
    pub fn from_runs(runs: Vec<PlayerRun>, clicks_per_player: u64, sim_duration_ms: i64) -> Self {
        let num_players = runs.len();
        let divisor = num_players.max(1) as f64;

        let avg_final_level = runs.iter().map(|r| r.final_level as f64).sum::<f64>() / divisor;
        let max_final_level = runs.iter().map(|r| r.final_level).max().unwrap_or(0);
        let avg_completions = runs.iter().map(|r| r.completions as f64).sum::<f64>() / divisor;

        let mut rejection_totals = BTreeMap::new();
        for run in &runs {
            for (code, count) in &run.rejections {
                *rejection_totals.entry(code.clone()).or_insert(0) += count;
            }
        }

        // Level pacing
        let mut by_level: BTreeMap<u32, Vec<&LevelUp>> = BTreeMap::new();
        for run in &runs {
            for level_up in &run.level_ups {
                by_level.entry(level_up.level).or_default().push(level_up);
            }
        }
        let level_curve = by_level
            .into_iter()
            .map(|(level, ups)| {
                let n = ups.len() as f64;
                LevelPace {
                    level,
                    players_reached: ups.len(),
                    avg_minutes: ups.iter().map(|u| u.at_ms as f64).sum::<f64>() / n / 60_000.0,
                    avg_clicks: ups.iter().map(|u| u.click as f64).sum::<f64>() / n,
                }
            })
            .collect();

        Self {
            num_players,
            clicks_per_player,
            sim_duration_ms,
            avg_final_level,
            max_final_level,
            avg_completions,
            rejection_totals,
            level_curve,
            runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Players: {}, {} clicks each, {:.1} simulated minutes\n\n",
            self.num_players,
            self.clicks_per_player,
            self.sim_duration_ms as f64 / 60_000.0
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Final Level:     {:.1}\n",
            self.avg_final_level
        ));
        report.push_str(&format!("  Max Final Level:     {}\n", self.max_final_level));
        report.push_str(&format!(
            "  Avg Completions:     {:.0}\n\n",
            self.avg_completions
        ));

        report.push_str("── REJECTIONS ───────────────────────────────────────────────────\n");
        if self.rejection_totals.is_empty() {
            report.push_str("  none\n");
        }
        for (code, count) in &self.rejection_totals {
            report.push_str(&format!("  {:<24} {}\n", code, count));
        }
        report.push('\n');

        report.push_str("── PLAYERS ──────────────────────────────────────────────────────\n");
        for run in &self.runs {
            let skills: Vec<String> = run
                .skill_levels
                .iter()
                .map(|(skill, level)| format!("{skill} {level}"))
                .collect();
            report.push_str(&format!(
                "  {:<8} L{:<2} {:>7} XP  {:>5} coins  [{}]\n",
                run.player_id,
                run.final_level,
                run.final_xp,
                run.coins,
                skills.join(", ")
            ));
        }

        report
    }

    /// Level-up pacing table.
    pub fn level_curve_text(&self) -> String {
        let mut text = String::new();
        text.push_str("── LEVEL CURVE ──────────────────────────────────────────────────\n");
        text.push_str("  Level  Players  Avg Minutes  Avg Clicks\n");
        for pace in &self.level_curve {
            text.push_str(&format!(
                "  {:>5}  {:>7}  {:>11.1}  {:>10.0}\n",
                pace.level, pace.players_reached, pace.avg_minutes, pace.avg_clicks
            ));
        }
        text
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
