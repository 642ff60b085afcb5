//! Demand cache model.
//!
//! A set-associative presence model over the shared associative table. It
//! tracks, per resident line, whether a prefetch installed it, so the harness
//! can tell the engine about hits on prefetched lines and count useful
//! prefetches. There is no data: only presence and provenance matter to the
//! prefetcher.

use crate::config::CacheModelConfig;
use crate::storage::AssociativeTable;

/// Outcome of one demand lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheAccess {
    /// Whether the block was resident.
    pub hit: bool,
    /// Whether the hit landed on a line a prefetch installed (cleared by the
    /// lookup; only the first demand hit reports it).
    pub prefetched: bool,
}

#[derive(Debug, Clone, Copy)]
struct LineState {
    prefetched: bool,
}

/// Set-associative demand cache model.
#[derive(Debug)]
pub struct CacheModel {
    table: AssociativeTable<LineState>,
}

impl CacheModel {
    /// Creates an empty cache model.
    pub fn new(cfg: &CacheModelConfig) -> Self {
        Self {
            table: AssociativeTable::new(cfg.sets, cfg.ways, cfg.policy),
        }
    }

    /// Whether the block is resident, without touching replacement state.
    pub fn contains(&self, block: u64) -> bool {
        self.table.contains(block)
    }

    /// Performs a demand lookup for `block`.
    ///
    /// On a hit the replacement state is updated and the line's prefetch
    /// provenance is consumed. Misses do not install anything; the line
    /// arrives later through [`CacheModel::install`] when its fill completes.
    pub fn access(&mut self, block: u64) -> CacheAccess {
        match self.table.get_mut(block) {
            Some(line) => {
                let prefetched = line.prefetched;
                line.prefetched = false;
                CacheAccess {
                    hit: true,
                    prefetched,
                }
            }
            None => CacheAccess {
                hit: false,
                prefetched: false,
            },
        }
    }

    /// Installs a filled block, evicting per the configured policy.
    pub fn install(&mut self, block: u64, prefetched: bool) {
        let _ = self.table.insert(block, LineState { prefetched });
    }
}
