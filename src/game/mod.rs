//! Game Logic Module
//!
//! All game simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Synchronizer, debounce, edge detection, input traces
//! - `timer`: Round countdown and penalty timers
//! - `controller`: Game phase machine, scoring, lockout
//! - `display`: Seven-segment rendering and blink divider
//! - `tick`: Authoritative simulation loop
//! - `events`: Game events for replay/verification

pub mod controller;
pub mod display;
pub mod events;
pub mod input;
pub mod tick;
pub mod timer;

// Re-export key types
pub use controller::{GameController, GamePhase, LOCKOUT_ALL};
pub use display::{BlinkOscillator, DisplayFrame};
pub use events::{GameEvent, GameEventData};
pub use input::{ButtonBank, DebounceFilter, InputDelta, InputSynchronizer, InputTrace};
pub use tick::{replay, ConfigError, GameConfig, ReactionGame, TickOutput};
pub use timer::{GameTimer, PenaltyTimer};
