//! Input Capture and Conditioning
//!
//! Handles the raw 8-line button bus with deterministic conditioning:
//! a one-tick synchronizer register, per-channel debounce hysteresis,
//! rising-edge extraction, and delta-compressed trace recording for
//! bit-exact replay.

use serde::{Deserialize, Serialize};

use crate::core::hash::{StateHash, StateHasher};

/// Number of button channels on the input bus.
pub const BUTTON_CHANNELS: usize = 8;

/// Channel whose debounced level doubles as the start/restart signal.
pub const START_CHANNEL: u8 = 0;

// =============================================================================
// SYNCHRONIZER
// =============================================================================

/// One-tick registration stage for the raw input bus.
///
/// Models the register that brings asynchronous button lines into the tick
/// domain: the value presented downstream is the bus as sampled on the
/// previous tick.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct InputSynchronizer {
    registered: u8,
}

impl InputSynchronizer {
    /// Create a synchronizer with all lines low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `raw` and return the previously registered bus value.
    #[inline]
    pub fn sync(&mut self, raw: u8) -> u8 {
        let out = self.registered;
        self.registered = raw;
        out
    }

    /// The currently registered bus value (for hashing/debugging).
    #[inline]
    pub fn registered(&self) -> u8 {
        self.registered
    }
}

// =============================================================================
// DEBOUNCE
// =============================================================================

/// Per-channel debounce filter with hysteresis.
///
/// Keeps the last `window` samples in a shift register. The debounced level
/// switches high only when every sample in the window is high, switches low
/// only when every sample is low, and otherwise holds. Any burst shorter
/// than the window is rejected; any level sustained for the full window is
/// registered.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DebounceFilter {
    history: u16,
    mask: u16,
    level: bool,
}

impl DebounceFilter {
    /// Create a filter with the given window length (1..=16 samples).
    pub fn new(window: u8) -> Self {
        debug_assert!(
            (1..=16).contains(&window),
            "debounce window {} outside 1..=16",
            window
        );
        Self {
            history: 0,
            mask: u16::MAX >> (16 - u32::from(window)),
            level: false,
        }
    }

    /// Shift in one sample and return the updated debounced level.
    #[inline]
    pub fn update(&mut self, sample: bool) -> bool {
        self.history = ((self.history << 1) | u16::from(sample)) & self.mask;
        if self.history == self.mask {
            self.level = true;
        } else if self.history == 0 {
            self.level = false;
        }
        self.level
    }

    /// Current debounced level.
    #[inline]
    pub fn level(&self) -> bool {
        self.level
    }

    /// Raw sample history (for hashing/debugging).
    #[inline]
    pub fn history(&self) -> u16 {
        self.history
    }
}

// =============================================================================
// BUTTON BANK
// =============================================================================

/// The eight independent debounce filters plus edge extraction.
///
/// Edges are computed on the debounced levels, before any lockout masking:
/// a channel held high through a lockout does not produce a fresh press
/// when the lockout clears.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ButtonBank {
    filters: [DebounceFilter; BUTTON_CHANNELS],
    levels: u8,
    rising: u8,
}

impl ButtonBank {
    /// Create a bank of filters sharing one window length.
    pub fn new(window: u8) -> Self {
        Self {
            filters: [DebounceFilter::new(window); BUTTON_CHANNELS],
            levels: 0,
            rising: 0,
        }
    }

    /// Feed one synchronized bus sample through every filter.
    ///
    /// Updates the debounced level set and the rising-edge set for this
    /// tick. A bit is set in the edge set exactly when its debounced level
    /// is high this tick and was low on the previous tick.
    pub fn step(&mut self, bus: u8) {
        let mut levels = 0u8;
        for (i, filter) in self.filters.iter_mut().enumerate() {
            if filter.update(bus & (1 << i) != 0) {
                levels |= 1 << i;
            }
        }
        self.rising = levels & !self.levels;
        self.levels = levels;
    }

    /// Debounced level of every channel, one bit each.
    #[inline]
    pub fn levels(&self) -> u8 {
        self.levels
    }

    /// Channels whose debounced level rose this tick (unmasked).
    #[inline]
    pub fn rising(&self) -> u8 {
        self.rising
    }

    /// Rising edge on the start channel this tick.
    #[inline]
    pub fn start_edge(&self) -> bool {
        self.rising & (1 << START_CHANNEL) != 0
    }

    /// Feed every filter register into a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        for filter in &self.filters {
            hasher.update_u16(filter.history());
            hasher.update_bool(filter.level());
        }
        hasher.update_u8(self.levels);
    }
}

// =============================================================================
// INPUT TRACE
// =============================================================================

/// One change point in a recorded input trace.
///
/// Only stored when the bus CHANGES (not every tick).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this bus value began
    pub tick: u64,
    /// The new bus value
    pub bus: u8,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u64, bus: u8) -> Self {
        Self { tick, bus }
    }
}

/// Complete recording of the raw input bus for one run.
///
/// Used for:
/// - Replay playback
/// - Determinism verification against a state hash
///
/// Stores the raw (pre-synchronizer) bus, so a replay reproduces the whole
/// conditioning pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputTrace {
    /// Generator seed used for this run
    pub seed: u16,

    /// Starting tick (usually 0)
    pub start_tick: u64,

    /// Last recorded tick
    pub end_tick: u64,

    /// Delta-compressed bus data.
    /// Only stores ticks where the bus CHANGED.
    deltas: Vec<InputDelta>,

    /// Last recorded bus value (for delta comparison)
    #[serde(skip)]
    last_bus: u8,
}

impl InputTrace {
    /// Create a new trace for a run with the given generator seed.
    pub fn new(seed: u16) -> Self {
        Self {
            seed,
            start_tick: 0,
            end_tick: 0,
            deltas: Vec::with_capacity(64),
            last_bus: 0,
        }
    }

    /// Record the bus value for a tick.
    ///
    /// Only stores an entry if the bus changed since the previous record.
    pub fn record(&mut self, tick: u64, bus: u8) {
        self.end_tick = tick;

        if bus != self.last_bus || self.deltas.is_empty() {
            self.deltas.push(InputDelta::new(tick, bus));
            self.last_bus = bus;
        }
    }

    /// Get the bus value at a specific tick.
    ///
    /// Uses binary search over the change points.
    pub fn input_at(&self, tick: u64) -> u8 {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            // Before first delta - all lines low
            0
        } else {
            self.deltas[idx - 1].bus
        }
    }

    /// All change points (for serialization).
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of change points.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Estimated serialized size in bytes.
    pub fn estimated_size(&self) -> usize {
        24 + self.deltas.len() * 9
    }

    /// Finalize the trace (call at run end).
    pub fn finalize(&mut self, end_tick: u64) {
        self.end_tick = end_tick;
    }

    /// Content hash of the trace, seed included.
    pub fn content_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_trace();
        hasher.update_u16(self.seed);
        hasher.update_u64(self.start_tick);
        hasher.update_u64(self.end_tick);
        for delta in &self.deltas {
            hasher.update_u64(delta.tick);
            hasher.update_u8(delta.bus);
        }
        hasher.finalize()
    }

    /// Create iterator over the full per-tick bus sequence.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            trace: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_bus: 0,
        }
    }
}

/// Iterator replaying the recorded bus tick-by-tick.
pub struct ReplayIterator<'a> {
    trace: &'a InputTrace,
    current_tick: u64,
    delta_idx: usize,
    current_bus: u8,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u64, u8);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.trace.end_tick {
            return None;
        }

        // Advance to the change point covering this tick
        while self.delta_idx < self.trace.deltas.len() {
            let delta = &self.trace.deltas[self.delta_idx];
            if delta.tick <= self.current_tick {
                self.current_bus = delta.bus;
                self.delta_idx += 1;
            } else {
                break;
            }
        }

        let result = (self.current_tick, self.current_bus);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
