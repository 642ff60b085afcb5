//! Replacement Policies.
//!
//! Victim-selection algorithms for the associative table.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out.
//! - `Lru`: Least Recently Used.
//! - `Plru`: Pseudo-LRU (tree-based).
//! - `Random`: Pseudo-random selection.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Pseudo-LRU (tree-based) replacement policy.
pub mod plru;

/// Random replacement policy.
pub mod random;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use plru::PlruPolicy;
pub use random::RandomPolicy;

use core::fmt;

use crate::config::ReplacementPolicyKind;

/// Trait for replacement policies.
///
/// Defines the interface for updating usage state and selecting victims.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Updates the policy state when an entry is accessed or filled.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    /// * `way` - The way index within the set that was used.
    fn touch(&mut self, set: usize, way: usize);

    /// Selects a victim way to evict from a specific set.
    ///
    /// # Arguments
    ///
    /// * `set` - The set index.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn victim(&mut self, set: usize) -> usize;
}

/// Constructs the boxed policy selected by the configuration.
pub fn build(kind: ReplacementPolicyKind, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        ReplacementPolicyKind::Lru => Box::new(LruPolicy::new(sets, ways)),
        ReplacementPolicyKind::Fifo => Box::new(FifoPolicy::new(sets, ways)),
        ReplacementPolicyKind::Plru => Box::new(PlruPolicy::new(sets, ways)),
        ReplacementPolicyKind::Random => Box::new(RandomPolicy::new(sets, ways)),
    }
}
