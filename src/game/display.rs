//! Seven-Segment Display Encoding
//!
//! Pure rendering of controller state to the 7-segment pattern plus decimal
//! point, and the free-running blink oscillator that alternates the score
//! digits after a round ends.
//!
//! Segment patterns are active-low: a zero bit lights the segment.

use serde::{Deserialize, Serialize};

/// Active-low glyphs for digits 0-9.
pub const SEG_DIGITS: [u8; 10] = [
    0b1000000, // 0
    0b1111001, // 1
    0b0100100, // 2
    0b0110000, // 3
    0b0011001, // 4
    0b0010010, // 5
    0b0000010, // 6
    0b1111000, // 7
    0b0000000, // 8
    0b0010000, // 9
];

/// All segments off.
pub const SEG_BLANK: u8 = 0b1111111;

/// Glyph for a single digit; anything above 9 renders blank.
#[inline]
pub fn digit_glyph(digit: u8) -> u8 {
    if (digit as usize) < SEG_DIGITS.len() {
        SEG_DIGITS[digit as usize]
    } else {
        SEG_BLANK
    }
}

/// Free-running blink bit for the score display.
///
/// Toggles every `period` ticks from reset onward. Controller restarts never
/// touch it, so the blink phase is continuous across rounds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BlinkOscillator {
    count: u32,
    period: u32,
    high: bool,
}

impl BlinkOscillator {
    /// Create an oscillator that toggles every `period` ticks.
    pub fn new(period: u32) -> Self {
        Self {
            count: 0,
            period,
            high: false,
        }
    }

    /// Advance one tick.
    #[inline]
    pub fn step(&mut self) {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            self.high = !self.high;
        }
    }

    /// Current blink bit.
    #[inline]
    pub fn high(&self) -> bool {
        self.high
    }

    /// Ticks into the current half-period (for hashing/debugging).
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// One rendered display frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFrame {
    /// Active-low segment pattern, bits 6..0
    pub segments: u8,
    /// Decimal point, set while a round is running
    pub dp: bool,
}

impl DisplayFrame {
    /// Render the frame for the current tick.
    ///
    /// While the round runs: every segment on except the target's bit, with
    /// the decimal point set. After the round: the score's tens digit when
    /// the blink bit is high, otherwise the ones digit, decimal point clear.
    /// A tens value above 9 (score 100 and up) renders blank.
    pub fn render(round_ended: bool, target: u8, score: u8, blink_high: bool) -> Self {
        if round_ended {
            let digit = if blink_high { score / 10 } else { score % 10 };
            Self {
                segments: digit_glyph(digit),
                dp: false,
            }
        } else {
            Self {
                segments: SEG_BLANK ^ (1 << target),
                dp: true,
            }
        }
    }

    /// Pack into the 8-bit output bus: decimal point at bit 7, segments in
    /// bits 6..0.
    #[inline]
    pub fn pack(&self) -> u8 {
        (u8::from(self.dp) << 7) | (self.segments & 0x7F)
    }

    /// Index of the single lit (zero) segment, if exactly one is lit.
    ///
    /// During a round this recovers the target index from the pattern, the
    /// same way a player reads the display.
    pub fn lit_segment(&self) -> Option<u8> {
        let off = !self.segments & 0x7F;
        if off.count_ones() == 1 {
            Some(off.trailing_zeros() as u8)
        } else {
            None
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_pattern_lights_only_target() {
        for target in 0..=6u8 {
            let frame = DisplayFrame::render(false, target, 0, false);
            assert!(frame.dp);
            assert_eq!((!frame.segments & 0x7F).count_ones(), 1);
            assert_eq!(frame.lit_segment(), Some(target));
        }
    }

    #[test]
    fn test_pack_places_dp_at_bit_seven() {
        let playing = DisplayFrame::render(false, 2, 0, false);
        assert_eq!(playing.pack() & 0x80, 0x80);
        assert_eq!(playing.pack() & 0x7F, 0b1111011);

        let over = DisplayFrame::render(true, 2, 0, false);
        assert_eq!(over.pack() & 0x80, 0);
    }

    #[test]
    fn test_game_over_zero_score_shows_zero() {
        let frame = DisplayFrame::render(true, 0, 0, false);
        assert_eq!(frame.segments, 0b1000000);
        assert!(!frame.dp);

        // Tens digit of zero is also zero
        let frame = DisplayFrame::render(true, 0, 0, true);
        assert_eq!(frame.segments, 0b1000000);
    }

    #[test]
    fn test_game_over_alternates_digits() {
        // Score 42: ones phase shows 2, tens phase shows 4
        let ones = DisplayFrame::render(true, 0, 42, false);
        assert_eq!(ones.segments, SEG_DIGITS[2]);

        let tens = DisplayFrame::render(true, 0, 42, true);
        assert_eq!(tens.segments, SEG_DIGITS[4]);
    }

    #[test]
    fn test_game_over_blanks_overflowing_tens() {
        // Score 123: tens value is 12, which has no glyph
        let tens = DisplayFrame::render(true, 0, 123, true);
        assert_eq!(tens.segments, SEG_BLANK);

        let ones = DisplayFrame::render(true, 0, 123, false);
        assert_eq!(ones.segments, SEG_DIGITS[3]);
    }

    #[test]
    fn test_digit_glyphs_distinct() {
        for a in 0..10 {
            for b in (a + 1)..10 {
                assert_ne!(SEG_DIGITS[a], SEG_DIGITS[b]);
            }
        }
        assert_eq!(digit_glyph(10), SEG_BLANK);
        assert_eq!(digit_glyph(255), SEG_BLANK);
    }

    #[test]
    fn test_blink_oscillator_toggles_at_period() {
        let mut blink = BlinkOscillator::new(3);
        assert!(!blink.high());

        blink.step();
        blink.step();
        assert!(!blink.high());
        blink.step();
        assert!(blink.high());

        for _ in 0..3 {
            blink.step();
        }
        assert!(!blink.high());
    }

    #[test]
    fn test_lit_segment_rejects_multi_bit_patterns() {
        let blank = DisplayFrame {
            segments: SEG_BLANK,
            dp: false,
        };
        assert_eq!(blank.lit_segment(), None);

        let eight = DisplayFrame {
            segments: SEG_DIGITS[8],
            dp: false,
        };
        assert_eq!(eight.lit_segment(), None);
    }
}
