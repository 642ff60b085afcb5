//! Recency shadow cache.
//!
//! A small associative mirror of recently filled blocks, recording whether
//! each was brought in by a prefetch and with what fill latency. Its job is to
//! catch late prefetches: a demand hit on a still-flagged line means the block
//! was being fetched — but not yet visible — when an earlier demand wanted it,
//! and the recorded latency lets the engine train as if that demand had
//! missed.
//!
//! Victim selection belongs to the backing associative table; the shadow only
//! decides what the entries mean.

use crate::config::EngineConfig;
use crate::storage::AssociativeTable;

#[derive(Debug, Clone, Copy)]
struct ShadowEntry {
    is_prefetch: bool,
    latency: u64,
}

/// Associative cache of recently filled blocks.
#[derive(Debug)]
pub struct RecencyShadow {
    table: AssociativeTable<ShadowEntry>,
}

impl RecencyShadow {
    /// Creates an empty shadow from the engine configuration.
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            table: AssociativeTable::new(cfg.shadow_sets, cfg.shadow_ways, cfg.shadow_policy),
        }
    }

    /// Secure and non-secure images of a block are distinct shadow lines.
    #[inline]
    const fn key(addr: u64, secure: bool) -> u64 {
        (addr << 1) | secure as u64
    }

    /// Records a completed fill, overwriting any existing entry for the block.
    pub fn record_fill(&mut self, addr: u64, secure: bool, was_prefetch: bool, latency: u64) {
        let _ = self.table.insert(
            Self::key(addr, secure),
            ShadowEntry {
                is_prefetch: was_prefetch,
                latency,
            },
        );
    }

    /// Whether the block is present and still flagged as prefetch-installed.
    pub fn is_hit_and_prefetched(&mut self, addr: u64, secure: bool) -> bool {
        self.table
            .get(Self::key(addr, secure))
            .is_some_and(|entry| entry.is_prefetch)
    }

    /// Clears the prefetch flag so later hits no longer take the late path.
    pub fn clear_prefetch_flag(&mut self, addr: u64, secure: bool) {
        if let Some(entry) = self.table.get_mut(Self::key(addr, secure)) {
            entry.is_prefetch = false;
        }
    }

    /// Recorded fill latency of the block.
    ///
    /// `None` when the block has aged out of the shadow between the flag check
    /// and this call path; callers treat that as "no correlation available".
    pub fn latency_of(&mut self, addr: u64, secure: bool) -> Option<u64> {
        self.table.get(Self::key(addr, secure)).map(|entry| entry.latency)
    }
}
