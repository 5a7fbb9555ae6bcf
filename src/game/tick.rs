//! Deterministic Game Tick
//!
//! The single advance function that drives every component in lockstep.
//! Each component reads registered values from the start of the tick; the
//! update order below fixes the few same-tick dependencies (timer end flag
//! into arbitration, penalty expiry into masking).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::lfsr::SegmentLfsr;
use crate::game::controller::GameController;
use crate::game::display::{BlinkOscillator, DisplayFrame};
use crate::game::events::GameEvent;
use crate::game::input::{ButtonBank, InputSynchronizer, InputTrace};
use crate::game::timer::GameTimer;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Debounce history lives in a 16-bit shift register
    #[error("debounce window must be 1..=16 ticks, got {0}")]
    DebounceWindow(u8),

    /// A zero-length round would end before it starts
    #[error("round duration must be at least 1 tick")]
    ZeroRoundDuration,

    /// A zero-length penalty would strand the lockout mask
    #[error("penalty duration must be at least 1 tick")]
    ZeroPenaltyDuration,

    /// The blink oscillator needs a nonzero half-period
    #[error("blink period must be at least 1 tick")]
    ZeroBlinkPeriod,
}

/// The four constants that parameterize the whole system.
///
/// Defaults match the board pace at the 1 MHz tick rate: a 4-tick debounce
/// window, 15 second rounds, 1 second penalties, and a 0.5 second blink
/// half-period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Debounce window length in ticks (1..=16)
    pub debounce_ticks: u8,
    /// Round duration in ticks
    pub round_ticks: u32,
    /// Lockout duration after a wrong press, in ticks
    pub penalty_ticks: u32,
    /// Blink half-period for the score display, in ticks
    pub blink_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: 4,
            round_ticks: 15 * crate::TICK_RATE,
            penalty_ticks: crate::TICK_RATE,
            blink_ticks: crate::TICK_RATE / 2,
        }
    }
}

impl GameConfig {
    /// Create a validated configuration.
    pub fn new(
        debounce_ticks: u8,
        round_ticks: u32,
        penalty_ticks: u32,
        blink_ticks: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            debounce_ticks,
            round_ticks,
            penalty_ticks,
            blink_ticks,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.debounce_ticks) {
            return Err(ConfigError::DebounceWindow(self.debounce_ticks));
        }
        if self.round_ticks == 0 {
            return Err(ConfigError::ZeroRoundDuration);
        }
        if self.penalty_ticks == 0 {
            return Err(ConfigError::ZeroPenaltyDuration);
        }
        if self.blink_ticks == 0 {
            return Err(ConfigError::ZeroBlinkPeriod);
        }
        Ok(())
    }
}

// =============================================================================
// TICK OUTPUT
// =============================================================================

/// Everything observable after one tick.
#[derive(Debug)]
pub struct TickOutput {
    /// Rendered display frame
    pub frame: DisplayFrame,
    /// Score read-back
    pub score: u8,
    /// Round timer's end flag
    pub round_ended: bool,
    /// Events generated this tick
    pub events: Vec<GameEvent>,
}

// =============================================================================
// GAME
// =============================================================================

/// The complete tick-deterministic game.
///
/// Construction is global reset: every component starts at its initial
/// value and the controller auto-starts in `Next`. Dropping the value and
/// constructing a fresh one is the only way to reset mid-run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReactionGame {
    /// Ticks advanced since reset
    pub tick: u64,

    /// Generator seed (for verification)
    pub seed: u16,

    /// Input registration stage
    pub sync: InputSynchronizer,

    /// Debounce filters and edge extraction
    pub buttons: ButtonBank,

    /// Free-running segment generator
    pub lfsr: SegmentLfsr,

    /// Round countdown
    pub round_timer: GameTimer,

    /// Score display blink bit
    pub blink: BlinkOscillator,

    /// The state machine
    pub controller: GameController,

    config: GameConfig,
}

impl ReactionGame {
    /// Create a game in the reset state with the default generator seed.
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, crate::core::lfsr::DEFAULT_SEED)
    }

    /// Create a game in the reset state with an explicit generator seed.
    pub fn with_seed(config: GameConfig, seed: u16) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid game configuration");
        Self {
            tick: 0,
            seed,
            sync: InputSynchronizer::new(),
            buttons: ButtonBank::new(config.debounce_ticks),
            lfsr: SegmentLfsr::new(seed),
            round_timer: GameTimer::new(config.round_ticks),
            blink: BlinkOscillator::new(config.blink_ticks),
            controller: GameController::new(config.penalty_ticks),
            config,
        }
    }

    /// The configuration this game was built with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Advance the whole system by one tick.
    ///
    /// `raw` is the asynchronous button bus sampled at this tick, one bit
    /// per channel, bit 0 doubling as the start line.
    pub fn advance(&mut self, raw: u8) -> TickOutput {
        // 0. Advance tick counter
        self.tick += 1;

        // 1. Register the raw bus (one-tick pipeline delay)
        let bus = self.sync.sync(raw);

        // 2. Debounce every channel and extract this tick's edges
        self.buttons.step(bus);

        // 3. Start edge from the unmasked start channel; lockout never
        //    gates restart
        let start_edge = self.buttons.start_edge();

        // 4. Round timer before arbitration, so an end flag asserted this
        //    tick discards a coincident hit
        self.round_timer.step(start_edge);

        // 5. State machine arbitration
        self.controller.step(
            self.tick,
            self.buttons.rising(),
            self.lfsr.output(),
            self.round_timer.ended(),
            start_edge,
        );

        // 6. Free-running generator and blink bit
        self.lfsr.step();
        self.blink.step();

        // 7. Render
        let frame = self.current_frame();

        TickOutput {
            frame,
            score: self.controller.score,
            round_ended: self.round_timer.ended(),
            events: self.controller.take_events(),
        }
    }

    /// Render the display for the current state without advancing.
    pub fn current_frame(&self) -> DisplayFrame {
        DisplayFrame::render(
            self.round_timer.ended(),
            self.controller.target,
            self.controller.score,
            self.blink.high(),
        )
    }

    /// Score read-back.
    #[inline]
    pub fn score(&self) -> u8 {
        self.controller.score
    }

    /// Compute hash of every register for verification.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_u8(self.sync.registered());
            self.buttons.hash_into(hasher);
            hasher.update_u16(self.lfsr.state());
            hasher.update_u8(self.lfsr.output());
            hasher.update_u32(self.round_timer.count());
            hasher.update_bool(self.round_timer.ended());
            hasher.update_u32(self.blink.count());
            hasher.update_bool(self.blink.high());
            self.controller.hash_into(hasher);
        })
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a recorded trace from reset.
///
/// Returns the final game state and every event generated, for comparison
/// against the original run.
pub fn replay(trace: &InputTrace, config: &GameConfig) -> (ReactionGame, Vec<GameEvent>) {
    let mut game = ReactionGame::with_seed(config.clone(), trace.seed);
    let mut all_events = Vec::new();

    for (_tick, bus) in trace.replay_iter() {
        let output = game.advance(bus);
        all_events.extend(output.events);
    }

    (game, all_events)
}

// =============================================================================
// TESTS
// =============================================================================
