//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform
//! determinism. They form the foundation for bit-exact replay verification.

pub mod hash;
pub mod lfsr;

// Re-export core types
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use lfsr::SegmentLfsr;
