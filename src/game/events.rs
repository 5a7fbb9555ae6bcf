//! Game Events
//!
//! Events generated during simulation for replay and verification.

use serde::{Deserialize, Serialize};

/// Priority for event processing order.
///
/// Lower value = processed first when merging same-tick events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Round end dominates everything on its tick
    RoundEnd = 0,
    /// Restart of a finished round
    RoundStart = 1,
    /// Lockout expiry happens before new presses are judged
    LockoutClear = 2,
    /// Correct hit
    Hit = 3,
    /// Wrong-press lockout
    LockoutStart = 4,
    /// New target selection
    TargetArm = 5,
    /// Lowest priority
    Other = 255,
}

/// Game event data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameEventData {
    /// A new target segment was armed
    TargetArmed {
        /// Raw 3-bit generator output (7 remaps to 0)
        raw_index: u8,
        /// Target actually armed, in 0..=6
        target: u8,
    },

    /// The target channel was pressed
    TargetHit {
        /// Channel that scored
        channel: u8,
        /// Score after the increment
        new_score: u8,
    },

    /// A wrong press started a lockout episode
    LockoutStarted {
        /// Bit set of channels disabled for the episode
        channels: u8,
        /// Length of the episode in ticks
        duration_ticks: u32,
    },

    /// The penalty countdown expired
    LockoutCleared {
        /// Bit set of channels released
        channels: u8,
    },

    /// The round timer expired
    RoundEnded {
        /// Score frozen on the display
        final_score: u8,
    },

    /// A finished round was restarted by the start channel
    RoundStarted,
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u64,

    /// Processing priority
    pub priority: EventPriority,

    /// Channel involved (for tie-breaking)
    pub channel: Option<u8>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, priority: EventPriority, data: GameEventData) -> Self {
        let channel = match &data {
            GameEventData::TargetArmed { target, .. } => Some(*target),
            GameEventData::TargetHit { channel, .. } => Some(*channel),
            _ => None,
        };

        Self {
            tick,
            priority,
            channel,
            data,
        }
    }

    /// Create target armed event.
    pub fn target_armed(tick: u64, raw_index: u8, target: u8) -> Self {
        Self::new(
            tick,
            EventPriority::TargetArm,
            GameEventData::TargetArmed { raw_index, target },
        )
    }

    /// Create target hit event.
    pub fn target_hit(tick: u64, channel: u8, new_score: u8) -> Self {
        Self::new(
            tick,
            EventPriority::Hit,
            GameEventData::TargetHit { channel, new_score },
        )
    }

    /// Create lockout started event.
    pub fn lockout_started(tick: u64, channels: u8, duration_ticks: u32) -> Self {
        Self::new(
            tick,
            EventPriority::LockoutStart,
            GameEventData::LockoutStarted {
                channels,
                duration_ticks,
            },
        )
    }

    /// Create lockout cleared event.
    pub fn lockout_cleared(tick: u64, channels: u8) -> Self {
        Self::new(
            tick,
            EventPriority::LockoutClear,
            GameEventData::LockoutCleared { channels },
        )
    }

    /// Create round ended event.
    pub fn round_ended(tick: u64, final_score: u8) -> Self {
        Self::new(
            tick,
            EventPriority::RoundEnd,
            GameEventData::RoundEnded { final_score },
        )
    }

    /// Create round started event.
    pub fn round_started(tick: u64) -> Self {
        Self::new(tick, EventPriority::RoundStart, GameEventData::RoundStarted)
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.channel == other.channel
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then channel
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.channel.cmp(&other.channel))
    }
}
