//! Game Controller State Machine
//!
//! Owns score, target, lockout mask, and the penalty timer. Consumes the
//! edge-qualified button set, the random segment index, and the round
//! timer's end flag once per tick, under a strict priority: round end beats
//! a correct hit beats a wrong press.

use serde::{Deserialize, Serialize};

use crate::core::hash::StateHasher;
use crate::game::events::GameEvent;
use crate::game::timer::PenaltyTimer;

/// Lockout mask value with every channel disabled.
pub const LOCKOUT_ALL: u8 = 0xFF;

// =============================================================================
// GAME PHASE
// =============================================================================

/// Current phase of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum GamePhase {
    /// Armed but not running; left only by a start edge. Reset bypasses this
    /// phase entirely, so normal operation never visits it.
    Idle = 0,
    /// Selecting a new target (one-tick dwell)
    #[default]
    Next = 1,
    /// Round running, waiting for a press
    Wait = 2,
    /// Round finished, score showing
    GameOver = 3,
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// The state machine arbitrating presses, penalties, and round end.
///
/// Sole mutator of the lockout mask and the score. All inputs are taken as
/// registered values for the current tick; the only same-tick combinational
/// path is the penalty expiry, which unmasks this tick's presses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameController {
    /// Current phase
    pub phase: GamePhase,

    /// Accumulated score, saturating at 255
    pub score: u8,

    /// Target segment, always in 0..=6
    pub target: u8,

    /// Bit set of channels currently disabled
    pub lockout: u8,

    /// Single shared penalty slot backing the lockout
    pub penalty: PenaltyTimer,

    /// Ticks a wrong press disables its channels for
    penalty_duration: u32,

    /// Events generated this tick (drained each tick)
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl GameController {
    /// Create a controller in the reset state.
    ///
    /// Reset forces the phase straight to `Next`: the game auto-starts.
    pub fn new(penalty_duration: u32) -> Self {
        Self {
            phase: GamePhase::Next,
            score: 0,
            target: 0,
            lockout: 0,
            penalty: PenaltyTimer::new(),
            penalty_duration,
            pending_events: Vec::new(),
        }
    }

    /// Advance the state machine by one tick.
    ///
    /// `rising` is the unmasked edge set for this tick; the controller
    /// applies its own lockout mask. `random_index` is the generator output
    /// sampled only in `Next`. `round_ended` is the round timer's end flag,
    /// `start_edge` the unmasked start-channel edge.
    pub fn step(
        &mut self,
        tick: u64,
        rising: u8,
        random_index: u8,
        round_ended: bool,
        start_edge: bool,
    ) {
        match self.phase {
            GamePhase::Idle => {
                if start_edge {
                    self.restart(tick);
                }
            }

            GamePhase::Next => {
                // Raw value 7 has no segment; it wraps to 0
                let target = if random_index >= 7 { 0 } else { random_index };
                self.target = target;
                self.lockout = 0;
                self.penalty.clear();
                self.push_event(GameEvent::target_armed(tick, random_index, target));
                self.phase = GamePhase::Wait;
            }

            GamePhase::Wait => {
                // Penalty countdown runs before press arbitration, so an
                // expiry unmasks this tick's presses and a fresh wrong press
                // on the expiry tick starts a new episode.
                if self.penalty.tick() {
                    let released = self.lockout;
                    self.lockout = 0;
                    self.push_event(GameEvent::lockout_cleared(tick, released));
                }

                let presses = rising & !self.lockout;

                if round_ended {
                    // Round end discards a coincident hit
                    self.phase = GamePhase::GameOver;
                    self.lockout = LOCKOUT_ALL;
                    self.push_event(GameEvent::round_ended(tick, self.score));
                } else if presses & (1 << self.target) != 0 {
                    self.score = self.score.saturating_add(1);
                    self.push_event(GameEvent::target_hit(tick, self.target, self.score));
                    self.phase = GamePhase::Next;
                } else if presses != 0 && !self.penalty.running() {
                    self.lockout = presses;
                    self.penalty.load(self.penalty_duration);
                    self.push_event(GameEvent::lockout_started(
                        tick,
                        presses,
                        self.penalty_duration,
                    ));
                }
            }

            GamePhase::GameOver => {
                self.lockout = LOCKOUT_ALL;
                if start_edge {
                    self.restart(tick);
                }
            }
        }
    }

    /// Full round reset: score, lockout, target, penalty, then `Next`.
    fn restart(&mut self, tick: u64) {
        self.score = 0;
        self.lockout = 0;
        self.target = 0;
        self.penalty.clear();
        self.phase = GamePhase::Next;
        self.push_event(GameEvent::round_started(tick));
    }

    /// Whether the game is showing the final score.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver)
    }

    /// Feed every register into a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.phase as u8);
        hasher.update_u8(self.score);
        hasher.update_u8(self.target);
        hasher.update_u8(self.lockout);
        hasher.update_u32(self.penalty.remaining());
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;

    const PENALTY: u32 = 10;

    fn wait_controller(target: u8) -> GameController {
        let mut ctrl = GameController::new(PENALTY);
        ctrl.step(0, 0, target, false, false);
        assert_eq!(ctrl.phase, GamePhase::Wait);
        assert_eq!(ctrl.target, target);
        ctrl.take_events();
        ctrl
    }

    #[test]
    fn test_reset_state_bypasses_idle() {
        let ctrl = GameController::new(PENALTY);
        assert_eq!(ctrl.phase, GamePhase::Next);
        assert_eq!(ctrl.score, 0);
        assert_eq!(ctrl.lockout, 0);
    }

    #[test]
    fn test_next_arms_target_and_clears_lockout() {
        let mut ctrl = GameController::new(PENALTY);
        ctrl.lockout = 0x55;
        ctrl.penalty.load(99);

        ctrl.step(0, 0, 3, false, false);

        assert_eq!(ctrl.phase, GamePhase::Wait);
        assert_eq!(ctrl.target, 3);
        assert_eq!(ctrl.lockout, 0);
        assert!(!ctrl.penalty.running());

        let events = ctrl.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].data,
            GameEventData::TargetArmed {
                raw_index: 3,
                target: 3
            }
        ));
    }

    #[test]
    fn test_next_wraps_seven_to_zero() {
        let mut ctrl = GameController::new(PENALTY);
        ctrl.step(0, 0, 7, false, false);
        assert_eq!(ctrl.target, 0);

        let events = ctrl.take_events();
        assert!(matches!(
            events[0].data,
            GameEventData::TargetArmed {
                raw_index: 7,
                target: 0
            }
        ));
    }

    #[test]
    fn test_hit_increments_score_and_rearms() {
        let mut ctrl = wait_controller(3);

        ctrl.step(1, 1 << 3, 0, false, false);

        assert_eq!(ctrl.score, 1);
        assert_eq!(ctrl.phase, GamePhase::Next);

        let events = ctrl.take_events();
        assert!(matches!(
            events[0].data,
            GameEventData::TargetHit {
                channel: 3,
                new_score: 1
            }
        ));
    }

    #[test]
    fn test_wrong_press_starts_lockout() {
        let mut ctrl = wait_controller(3);

        ctrl.step(1, 1 << 5, 0, false, false);

        assert_eq!(ctrl.score, 0);
        assert_eq!(ctrl.phase, GamePhase::Wait);
        assert_eq!(ctrl.lockout, 1 << 5);
        assert_eq!(ctrl.penalty.remaining(), PENALTY);

        let events = ctrl.take_events();
        assert!(matches!(
            events[0].data,
            GameEventData::LockoutStarted {
                channels: 0x20,
                duration_ticks: PENALTY
            }
        ));
    }

    #[test]
    fn test_simultaneous_wrong_presses_share_one_slot() {
        let mut ctrl = wait_controller(3);

        // Channels 1 and 5 press together
        ctrl.step(1, 0b0010_0010, 0, false, false);
        assert_eq!(ctrl.lockout, 0b0010_0010);

        // A later wrong press is not separately penalized
        ctrl.step(2, 1 << 6, 0, false, false);
        assert_eq!(ctrl.lockout, 0b0010_0010);
        assert_eq!(ctrl.penalty.remaining(), PENALTY - 1);
    }

    #[test]
    fn test_locked_channel_edges_are_masked() {
        let mut ctrl = wait_controller(3);
        ctrl.step(1, 1 << 5, 0, false, false);
        ctrl.take_events();

        // The locked channel fires again; nothing changes
        ctrl.step(2, 1 << 5, 0, false, false);
        assert_eq!(ctrl.lockout, 1 << 5);
        assert!(ctrl.take_events().is_empty());
    }

    #[test]
    fn test_penalty_expiry_clears_lockout_same_tick() {
        let mut ctrl = wait_controller(3);
        ctrl.step(1, 1 << 5, 0, false, false);
        ctrl.take_events();

        // Run the countdown to the expiry tick
        for tick in 2..(1 + PENALTY as u64) {
            ctrl.step(tick, 0, 0, false, false);
            assert_eq!(ctrl.lockout, 1 << 5);
        }

        let expiry = 1 + PENALTY as u64;
        ctrl.step(expiry, 0, 0, false, false);
        assert_eq!(ctrl.lockout, 0);
        assert!(!ctrl.penalty.running());

        let events = ctrl.take_events();
        assert!(matches!(
            events.last().map(|e| &e.data),
            Some(GameEventData::LockoutCleared { channels: 0x20 })
        ));
    }

    #[test]
    fn test_press_on_expiry_tick_is_penalized_again() {
        let mut ctrl = wait_controller(3);
        ctrl.step(1, 1 << 5, 0, false, false);

        for tick in 2..(1 + PENALTY as u64) {
            ctrl.step(tick, 0, 0, false, false);
        }
        ctrl.take_events();

        // Expiry tick: channel 6 presses the moment the mask drops
        let expiry = 1 + PENALTY as u64;
        ctrl.step(expiry, 1 << 6, 0, false, false);

        assert_eq!(ctrl.lockout, 1 << 6);
        assert_eq!(ctrl.penalty.remaining(), PENALTY);

        let events = ctrl.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0].data,
            GameEventData::LockoutCleared { channels: 0x20 }
        ));
        assert!(matches!(
            events[1].data,
            GameEventData::LockoutStarted { channels: 0x40, .. }
        ));
    }

    #[test]
    fn test_hit_on_target_while_other_channel_locked() {
        let mut ctrl = wait_controller(3);
        ctrl.step(1, 1 << 5, 0, false, false);
        ctrl.take_events();

        // Target press goes through; channel 5's lockout does not gate it
        ctrl.step(2, 1 << 3, 0, false, false);
        assert_eq!(ctrl.score, 1);
        assert_eq!(ctrl.phase, GamePhase::Next);
    }

    #[test]
    fn test_round_end_beats_coincident_hit() {
        let mut ctrl = wait_controller(3);

        ctrl.step(1, 1 << 3, 0, true, false);

        assert_eq!(ctrl.score, 0);
        assert_eq!(ctrl.phase, GamePhase::GameOver);
        assert_eq!(ctrl.lockout, LOCKOUT_ALL);

        let events = ctrl.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].data,
            GameEventData::RoundEnded { final_score: 0 }
        ));
    }

    #[test]
    fn test_game_over_ignores_non_start_edges() {
        let mut ctrl = wait_controller(3);
        ctrl.score = 7;
        ctrl.step(1, 0, 0, true, false);
        ctrl.take_events();

        ctrl.step(2, 0b1111_1110, 0, true, false);
        assert_eq!(ctrl.phase, GamePhase::GameOver);
        assert_eq!(ctrl.score, 7);
        assert!(ctrl.take_events().is_empty());
    }

    #[test]
    fn test_game_over_restarts_on_start_edge() {
        let mut ctrl = wait_controller(3);
        ctrl.score = 7;
        ctrl.step(1, 0, 0, true, false);
        ctrl.take_events();

        ctrl.step(2, 0x01, 0, true, true);

        assert_eq!(ctrl.phase, GamePhase::Next);
        assert_eq!(ctrl.score, 0);
        assert_eq!(ctrl.lockout, 0);

        let events = ctrl.take_events();
        assert!(matches!(events[0].data, GameEventData::RoundStarted));
    }

    #[test]
    fn test_idle_exits_on_start_edge() {
        let mut ctrl = GameController::new(PENALTY);
        ctrl.phase = GamePhase::Idle;
        ctrl.score = 42;

        ctrl.step(0, 0, 0, false, false);
        assert_eq!(ctrl.phase, GamePhase::Idle);

        ctrl.step(1, 0x01, 0, false, true);
        assert_eq!(ctrl.phase, GamePhase::Next);
        assert_eq!(ctrl.score, 0);
    }

    #[test]
    fn test_score_saturates() {
        let mut ctrl = wait_controller(2);
        ctrl.score = u8::MAX;

        ctrl.step(1, 1 << 2, 0, false, false);
        assert_eq!(ctrl.score, u8::MAX);

        let events = ctrl.take_events();
        assert!(matches!(
            events[0].data,
            GameEventData::TargetHit {
                new_score: u8::MAX,
                ..
            }
        ));
    }

    #[test]
    fn test_hash_tracks_registers() {
        let hash_of = |ctrl: &GameController| {
            let mut hasher = StateHasher::for_game_state();
            ctrl.hash_into(&mut hasher);
            hasher.finalize()
        };

        let mut a = wait_controller(3);
        let b = a.clone();
        assert_eq!(hash_of(&a), hash_of(&b));

        a.step(1, 1 << 3, 0, false, false);
        assert_ne!(hash_of(&a), hash_of(&b));
    }
}
