//! Pseudo-Random Segment Generator
//!
//! A 16-bit Fibonacci linear feedback shift register that free-runs once per
//! tick and exposes a 3-bit segment index. Given the same seed, produces an
//! identical sequence on all platforms.

use serde::{Deserialize, Serialize};

/// Seed loaded on reset. Any nonzero value works; the low three bits must be
/// nonzero or the output stream degenerates to a constant.
pub const DEFAULT_SEED: u16 = 0xACE1;

/// 16-bit LFSR with feedback `bit0 XOR bit2`.
///
/// Each tick the register shifts left by one and inserts the feedback bit at
/// bit 0. The exposed output is the low three bits of the state as they were
/// *before* the most recent shift, so consumers always observe a value one
/// tick stale relative to the internal register.
///
/// # Determinism Guarantee
///
/// Given the same seed, this generator produces the exact same sequence on
/// any platform.
///
/// # Example
///
/// ```
/// use mole_rush::core::lfsr::SegmentLfsr;
///
/// let mut lfsr = SegmentLfsr::new(0xACE1);
/// lfsr.step();
/// assert_eq!(lfsr.output(), 1); // Always the same!
/// assert_eq!(lfsr.state(), 0x59C3);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentLfsr {
    state: u16,
    /// Low three bits of the state before the last shift.
    latched: u8,
}

impl Default for SegmentLfsr {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl SegmentLfsr {
    /// Create a generator from a nonzero seed.
    ///
    /// The all-zero state is a fixed point of the feedback function, so a
    /// zero seed would freeze the generator. There is no runtime recovery;
    /// a debug assertion flags the defect.
    pub fn new(seed: u16) -> Self {
        debug_assert!(seed != 0, "LFSR seeded with the degenerate zero state");
        Self {
            state: seed,
            latched: 0,
        }
    }

    /// Advance the register by one tick.
    ///
    /// Latches the current low three bits as the exposed output, then shifts.
    #[inline]
    pub fn step(&mut self) {
        debug_assert!(self.state != 0, "LFSR reached the degenerate zero state");
        self.latched = (self.state & 0x7) as u8;
        let feedback = (self.state ^ (self.state >> 2)) & 1;
        self.state = (self.state << 1) | feedback;
    }

    /// The 3-bit output as of the previous tick, in `0..=7`.
    #[inline]
    pub fn output(&self) -> u8 {
        self.latched
    }

    /// Raw register contents (for hashing/debugging).
    #[inline]
    pub fn state(&self) -> u16 {
        self.state
    }
}

// =============================================================================
// TESTS
// =============================================================================
