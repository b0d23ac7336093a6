//! Per-player click rate limiter.
//!
//! A sliding window of accepted click timestamps caps clicks per second, and a
//! per-interaction debounce drops repeats of the same interaction that arrive
//! too quickly. Both checks run before any node state is touched.

use crate::core::clock::Clock;
use crate::core::config::RateLimitConfig;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Recent activity of one player.
#[derive(Debug, Default, Clone)]
struct RateLimitWindow {
    /// Accepted click timestamps, oldest first
    clicks: VecDeque<i64>,
    /// Interaction key -> last accepted timestamp
    last_fired: HashMap<String, i64>,
}

impl RateLimitWindow {
    fn prune(&mut self, now: i64, window_ms: i64, debounce_ms: i64) {
        while let Some(&oldest) = self.clicks.front() {
            if now - oldest >= window_ms {
                self.clicks.pop_front();
            } else {
                break;
            }
        }
        self.last_fired
            .retain(|_, fired| now - *fired < debounce_ms.max(window_ms));
    }

    fn is_empty(&self) -> bool {
        self.clicks.is_empty() && self.last_fired.is_empty()
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    Accepted,
    /// Too many clicks in the window
    WindowFull {
        /// Time until the oldest click leaves the window
        retry_after_ms: i64,
    },
    /// Same interaction fired too recently
    Debounced,
}

impl RateLimitResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RateLimitResult::Accepted)
    }
}

/// Sliding-window rate limiter keyed by player id.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
    windows: HashMap<String, RateLimitWindow>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            config,
            windows: HashMap::new(),
        }
    }

    /// Accepts or rejects one click using the default per-window limit.
    pub fn try_accept(&mut self, player_id: &str, interaction_key: Option<&str>) -> bool {
        let limit = self.config.max_per_window;
        self.check(player_id, interaction_key, limit).is_accepted()
    }

    /// Like [`Self::try_accept`] with an explicit per-window limit (combat uses a tighter one).
    pub fn try_accept_with_limit(
        &mut self,
        player_id: &str,
        interaction_key: Option<&str>,
        limit: usize,
    ) -> bool {
        self.check(player_id, interaction_key, limit).is_accepted()
    }

    /// Checks one click and records it when accepted. Rejections leave no trace.
    pub fn check(
        &mut self,
        player_id: &str,
        interaction_key: Option<&str>,
        limit: usize,
    ) -> RateLimitResult {
        let now = self.clock.now_ms();
        let window_ms = self.config.window_ms;
        let debounce_ms = self.config.debounce_ms;

        let window = self.windows.entry(player_id.to_string()).or_default();
        window.prune(now, window_ms, debounce_ms);

        if window.clicks.len() >= limit {
            let oldest = window.clicks.front().copied().unwrap_or(now);
            return RateLimitResult::WindowFull {
                retry_after_ms: (oldest + window_ms - now).max(0),
            };
        }

        if let Some(key) = interaction_key {
            if let Some(&fired) = window.last_fired.get(key) {
                if now - fired < debounce_ms {
                    return RateLimitResult::Debounced;
                }
            }
        }

        window.clicks.push_back(now);
        if let Some(key) = interaction_key {
            window.last_fired.insert(key.to_string(), now);
        }
        RateLimitResult::Accepted
    }

    /// Number of clicks currently counted against a player.
    pub fn recent_clicks(&self, player_id: &str) -> usize {
        let now = self.clock.now_ms();
        self.windows.get(player_id).map_or(0, |w| {
            w.clicks
                .iter()
                .filter(|&&t| now - t < self.config.window_ms)
                .count()
        })
    }

    /// Drops windows with no recent activity. Returns how many were removed.
    pub fn prune_idle(&mut self) -> usize {
        let now = self.clock.now_ms();
        let window_ms = self.config.window_ms;
        let debounce_ms = self.config.debounce_ms;
        let before = self.windows.len();
        self.windows.retain(|_, window| {
            window.prune(now, window_ms, debounce_ms);
            !window.is_empty()
        });
        before - self.windows.len()
    }

    /// Number of players currently tracked.
    pub fn tracked_players(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;

    fn limiter_with_clock() -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(10_000));
        let limiter = RateLimiter::new(RateLimitConfig::default(), clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_eleventh_click_in_window_rejected() {
        let (mut limiter, clock) = limiter_with_clock();
        for i in 0..10 {
            assert!(limiter.try_accept("alice", None), "click {i} should pass");
            clock.advance(50);
        }
        assert!(!limiter.try_accept("alice", None));
    }

    #[test]
    fn test_click_accepted_after_window_slides() {
        let (mut limiter, clock) = limiter_with_clock();
        for _ in 0..10 {
            assert!(limiter.try_accept("alice", None));
            clock.advance(50);
        }
        assert!(!limiter.try_accept("alice", None));

        // First click was at t=10_000; move past t=11_000
        clock.set(11_001);
        assert!(limiter.try_accept("alice", None));
    }

    #[test]
    fn test_rejection_has_no_side_effects() {
        let (mut limiter, _clock) = limiter_with_clock();
        for _ in 0..10 {
            limiter.try_accept("alice", None);
        }
        for _ in 0..5 {
            assert!(!limiter.try_accept("alice", None));
        }
        assert_eq!(limiter.recent_clicks("alice"), 10);
    }

    #[test]
    fn test_players_are_limited_independently() {
        let (mut limiter, _clock) = limiter_with_clock();
        for _ in 0..10 {
            assert!(limiter.try_accept("alice", None));
        }
        assert!(!limiter.try_accept("alice", None));
        assert!(limiter.try_accept("bob", None));
    }

    #[test]
    fn test_debounce_same_key() {
        let (mut limiter, clock) = limiter_with_clock();
        assert!(limiter.try_accept("alice", Some("node-1")));
        clock.advance(50);
        assert_eq!(
            limiter.check("alice", Some("node-1"), 10),
            RateLimitResult::Debounced
        );
        // A different interaction is not debounced
        assert!(limiter.try_accept("alice", Some("node-2")));
        clock.advance(60);
        assert!(limiter.try_accept("alice", Some("node-1")));
    }

    #[test]
    fn test_debounced_click_not_counted() {
        let (mut limiter, _clock) = limiter_with_clock();
        assert!(limiter.try_accept("alice", Some("node-1")));
        assert!(!limiter.try_accept("alice", Some("node-1")));
        assert_eq!(limiter.recent_clicks("alice"), 1);
    }

    #[test]
    fn test_combat_limit() {
        let (mut limiter, _clock) = limiter_with_clock();
        for _ in 0..5 {
            assert!(limiter.try_accept_with_limit("alice", None, 5));
        }
        assert!(!limiter.try_accept_with_limit("alice", None, 5));
    }

    #[test]
    fn test_window_full_reports_retry_time() {
        let (mut limiter, clock) = limiter_with_clock();
        for _ in 0..10 {
            limiter.try_accept("alice", None);
        }
        clock.advance(400);
        assert_eq!(
            limiter.check("alice", None, 10),
            RateLimitResult::WindowFull {
                retry_after_ms: 600
            }
        );
    }

    #[test]
    fn test_prune_idle_drops_quiet_players() {
        let (mut limiter, clock) = limiter_with_clock();
        limiter.try_accept("alice", Some("node-1"));
        limiter.try_accept("bob", None);
        assert_eq!(limiter.tracked_players(), 2);

        clock.advance(5_000);
        assert_eq!(limiter.prune_idle(), 2);
        assert_eq!(limiter.tracked_players(), 0);
    }
}
