//! Per-tag access history log.
//!
//! A set-indexed array of fixed-size circular logs. Each entry records
//! (tag, block, cycle) for a past access; sets are selected from the low tag
//! bits and written round-robin through a per-set cursor, so the oldest entry
//! is implicitly invalidated by being overwritten.
//!
//! The backward scan answers the timeliness question: which earlier accesses
//! from this tag happened long enough ago that a prefetch issued then — taking
//! `latency` cycles to fill — would have completed before the current access
//! needed the data.

use tracing::trace;

use crate::common::MAX_TIMELY_SOURCES;

/// A past access that could have issued a timely prefetch for the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelySource {
    /// Tag of the historical access.
    pub tag: u64,
    /// Block of the historical access, truncated to the history window.
    pub addr: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct HistoryEntry {
    tag: u64,
    addr: u64,
    cycle: u64,
    valid: bool,
}

#[derive(Debug)]
struct HistorySet {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

/// Set-indexed circular logs of past accesses.
#[derive(Debug)]
pub struct AccessHistoryLog {
    sets: Vec<HistorySet>,
    set_mask: u64,
    addr_mask: u64,
    cycle_mask: u64,
}

impl AccessHistoryLog {
    /// Creates an empty log.
    ///
    /// `sets` must be a power of two (validated by the configuration) so the
    /// low tag bits select the set directly.
    pub fn new(sets: usize, ways: usize, addr_mask: u64, cycle_mask: u64) -> Self {
        let mut table = Vec::with_capacity(sets);
        for _ in 0..sets {
            table.push(HistorySet {
                entries: vec![HistoryEntry::default(); ways],
                cursor: 0,
            });
        }
        Self {
            sets: table,
            set_mask: sets as u64 - 1,
            addr_mask,
            cycle_mask,
        }
    }

    /// Records an access at cycle `now`, overwriting the oldest entry of the
    /// tag's set.
    pub fn record(&mut self, tag: u64, addr: u64, now: u64) {
        let set = &mut self.sets[(tag & self.set_mask) as usize];
        let ways = set.entries.len();
        set.entries[set.cursor] = HistoryEntry {
            tag,
            addr: addr & self.addr_mask,
            cycle: now & self.cycle_mask,
            valid: true,
        };
        set.cursor = (set.cursor + 1) % ways;
    }

    /// Finds past accesses from `tag` old enough to have produced a timely
    /// prefetch for the block filling now.
    ///
    /// A source at cycle `t` could have started a fill completing at
    /// `t + latency`; it is timely when that is no later than when the current
    /// access wanted the data, i.e. `t <= now - latency`. When `now < latency`
    /// the run is too young to contain any timely source. With `latency == 0`
    /// the comparison degenerates to strictly-before-now.
    ///
    /// Entries matching `exclude_addr` and duplicates of already-collected
    /// blocks are skipped. The walk visits the set newest-first for one full
    /// circle and caps the result at [`MAX_TIMELY_SOURCES`].
    pub fn find_timely_sources(
        &self,
        latency: u64,
        tag: u64,
        exclude_addr: u64,
        now: u64,
    ) -> Vec<TimelySource> {
        let mut sources = Vec::new();
        let now = now & self.cycle_mask;
        if now < latency {
            return sources;
        }
        let cutoff = now - latency;
        let exclude = exclude_addr & self.addr_mask;

        let set = &self.sets[(tag & self.set_mask) as usize];
        let ways = set.entries.len();
        for back in 1..=ways {
            let entry = &set.entries[(set.cursor + ways - back) % ways];
            if !entry.valid || entry.tag != tag {
                continue;
            }
            let timely = if latency == 0 {
                entry.cycle < now
            } else {
                entry.cycle <= cutoff
            };
            if !timely || entry.addr == exclude {
                continue;
            }
            if sources.iter().any(|s: &TimelySource| s.addr == entry.addr) {
                continue;
            }
            trace!(tag, addr = entry.addr, cycle = entry.cycle, "timely source");
            sources.push(TimelySource {
                tag: entry.tag,
                addr: entry.addr,
            });
            if sources.len() == MAX_TIMELY_SOURCES {
                break;
            }
        }
        sources
    }
}
