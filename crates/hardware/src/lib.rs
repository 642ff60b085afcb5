//! Timeliness-aware delta-correlation prefetcher simulation library.
//!
//! This crate implements a trace-driven model of a delta-correlation hardware
//! prefetcher (the "Berti" family) with the following:
//! 1. **Engine:** outstanding-miss tracker, access history log, confidence-ranked
//!    correlation table, recency shadow cache, and the orchestrator joining them.
//! 2. **Storage:** a bounded set-associative table with pluggable replacement
//!    policies (LRU, FIFO, PLRU, Random) backing the shadow and the cache model.
//! 3. **Simulation:** trace reader, demand cache model, and a pending-fill queue
//!    that turns a memory trace into the access/fill event stream.
//! 4. **Configuration:** serde-based hierarchical config with validated geometry.
//! 5. **Statistics:** train/fill/prefetch counters and report printing.

/// Common types and helpers (block addresses, tag hashing, constants, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Prefetch engine (miss tracker, history log, correlation table, shadow, orchestrator).
pub mod engine;
/// Trace-driven simulation harness (trace reader, cache model, simulator loop).
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;
/// Bounded associative storage and replacement policies.
pub mod storage;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The prefetch engine; drive it with `calculate_prefetch` and `notify_fill`.
pub use crate::engine::BertiPrefetcher;
/// Trace-driven harness owning the cache model and the engine.
pub use crate::sim::Simulator;
