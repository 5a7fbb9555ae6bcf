//! Round and Penalty Timers
//!
//! Two small tick-driven counters: the free-running round countdown with its
//! sticky end flag, and the single shared penalty slot that backs the
//! lockout mask.

use serde::{Deserialize, Serialize};

/// Round countdown timer.
///
/// Counts ticks from reset toward a configured duration and then asserts a
/// sticky end flag. While the flag is set the counter is frozen; only a
/// rising edge on the external start signal rearms it. The timer never looks
/// at controller state, so a mid-round start edge has no effect.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameTimer {
    count: u32,
    duration: u32,
    ended: bool,
}

impl GameTimer {
    /// Create a timer that expires after `duration` ticks.
    pub fn new(duration: u32) -> Self {
        Self {
            count: 0,
            duration,
            ended: false,
        }
    }

    /// Advance one tick.
    ///
    /// While running: count up and assert the end flag once the duration is
    /// reached. While expired: restart only on `start_edge`.
    pub fn step(&mut self, start_edge: bool) {
        if !self.ended {
            if self.count >= self.duration {
                self.ended = true;
            } else {
                self.count += 1;
            }
        } else if start_edge {
            self.count = 0;
            self.ended = false;
        }
    }

    /// Whether the round has expired.
    #[inline]
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Ticks elapsed in the current round.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Single-slot penalty countdown.
///
/// At most one lockout episode runs at a time; loading while running simply
/// restarts the countdown. The 1 to 0 transition is reported so the caller
/// can clear the lockout mask on the same tick.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PenaltyTimer {
    remaining: u32,
}

impl PenaltyTimer {
    /// Create an idle penalty timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown of `duration` ticks.
    #[inline]
    pub fn load(&mut self, duration: u32) {
        self.remaining = duration;
    }

    /// Advance one tick. Returns true exactly when the countdown reaches
    /// zero on this tick.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.remaining == 0
        } else {
            false
        }
    }

    /// Whether a countdown is in progress.
    #[inline]
    pub fn running(&self) -> bool {
        self.remaining > 0
    }

    /// Ticks left in the countdown.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Cancel any countdown in progress.
    #[inline]
    pub fn clear(&mut self) {
        self.remaining = 0;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_timer_counts_to_end() {
        let mut timer = GameTimer::new(5);

        for _ in 0..5 {
            timer.step(false);
            assert!(!timer.ended());
        }
        assert_eq!(timer.count(), 5);

        // One more tick asserts the end flag; the count freezes
        timer.step(false);
        assert!(timer.ended());
        assert_eq!(timer.count(), 5);

        timer.step(false);
        assert!(timer.ended());
        assert_eq!(timer.count(), 5);
    }

    #[test]
    fn test_game_timer_ignores_start_while_running() {
        let mut timer = GameTimer::new(10);

        timer.step(false);
        timer.step(false);
        timer.step(true); // mid-round start edge
        assert_eq!(timer.count(), 3);
        assert!(!timer.ended());
    }

    #[test]
    fn test_game_timer_restarts_on_edge_after_end() {
        let mut timer = GameTimer::new(2);

        for _ in 0..3 {
            timer.step(false);
        }
        assert!(timer.ended());

        // No edge: stays expired
        timer.step(false);
        assert!(timer.ended());

        // Edge: rearms
        timer.step(true);
        assert!(!timer.ended());
        assert_eq!(timer.count(), 0);

        // Counts again from zero
        timer.step(false);
        assert_eq!(timer.count(), 1);
    }

    #[test]
    fn test_penalty_timer_reports_expiry_tick() {
        let mut penalty = PenaltyTimer::new();
        assert!(!penalty.running());
        assert!(!penalty.tick());

        penalty.load(3);
        assert!(penalty.running());

        assert!(!penalty.tick()); // 3 -> 2
        assert!(!penalty.tick()); // 2 -> 1
        assert!(penalty.tick()); // 1 -> 0, expiry reported here
        assert!(!penalty.running());
        assert!(!penalty.tick()); // idle afterwards
    }

    #[test]
    fn test_penalty_timer_reload_restarts() {
        let mut penalty = PenaltyTimer::new();
        penalty.load(5);
        penalty.tick();
        penalty.load(5);
        assert_eq!(penalty.remaining(), 5);

        penalty.clear();
        assert!(!penalty.running());
        assert!(!penalty.tick());
    }

    #[test]
    fn test_penalty_timer_one_tick_duration() {
        let mut penalty = PenaltyTimer::new();
        penalty.load(1);
        assert!(penalty.tick());
        assert!(!penalty.running());
    }
}
