//! Structural constants of the engine.
//!
//! These are properties of the algorithm itself, not tunables; everything a
//! deployment would size differently lives in [`crate::config`] instead.

/// Maximum number of timely source accesses one history scan may return.
///
/// Bounds the work done per fill; the backward walk stops once this many
/// matches have been collected even if the set still holds older candidates.
pub const MAX_TIMELY_SOURCES: usize = 16;

/// Fallback ranking score above which a delta is treated as a first-level
/// candidate (score scale is 0-100).
pub const FALLBACK_L1_SCORE: u32 = 80;

/// Fallback ranking score above which a delta is treated as a second-level
/// candidate (score scale is 0-100).
pub const FALLBACK_L2_SCORE: u32 = 35;
