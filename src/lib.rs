//! # Mole Rush Game Core
//!
//! Deterministic tick-level simulation of the Mole Rush reaction game,
//! designed for cycle-exact replay and verification.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    MOLE RUSH CORE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── lfsr.rs      - 16-bit Fibonacci LFSR target source      │
//! │  └── hash.rs      - State hashing for verification           │
//! │                                                              │
//! │  game/            - Game logic (deterministic)               │
//! │  ├── input.rs     - Synchronizer, debounce, input traces     │
//! │  ├── timer.rs     - Round countdown and penalty timers       │
//! │  ├── controller.rs- Game phase machine and scoring           │
//! │  ├── display.rs   - Seven-segment rendering, blink divider   │
//! │  ├── tick.rs      - Authoritative simulation loop            │
//! │  └── events.rs    - Game events for replay/verification      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic
//! - No system time dependencies
//! - All randomness from the seeded 16-bit LFSR
//! - A fixed update order within every tick
//!
//! Given an identical seed and input stream, the simulation produces
//! **identical results** on any platform (x86, ARM, WASM).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
pub use crate::core::lfsr::SegmentLfsr;
pub use crate::game::display::DisplayFrame;
pub use crate::game::events::{GameEvent, GameEventData};
pub use crate::game::input::InputTrace;
pub use crate::game::tick::{replay, ConfigError, GameConfig, ReactionGame, TickOutput};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 1_000_000;
