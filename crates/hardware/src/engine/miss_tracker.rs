//! Outstanding-miss tracker.
//!
//! A fixed-capacity table of in-flight misses. Each entry remembers the block
//! address, the issuing tag, and the cycle the miss was enqueued, so the fill
//! path can recover "when did servicing begin" and compute the observed
//! latency. A full table drops new records rather than evicting old ones:
//! tracking is best-effort, and an untracked miss simply produces no training
//! when it fills.

use tracing::trace;

/// Result of a [`OutstandingMissTracker::record`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The address is tracked; carries the entry's prefetch flag.
    Tracked {
        /// Whether the tracked request is prefetch-initiated.
        is_prefetch: bool,
    },
    /// The table was full and the record was dropped.
    NotTracked,
}

#[derive(Debug, Clone, Copy)]
struct MissEntry {
    addr: u64,
    tag: u64,
    cycle: u64,
    is_prefetch: bool,
}

/// Fixed-capacity table of in-flight misses.
#[derive(Debug)]
pub struct OutstandingMissTracker {
    slots: Vec<Option<MissEntry>>,
    cycle_mask: u64,
}

impl OutstandingMissTracker {
    /// Creates an empty tracker with the given capacity and cycle window.
    pub fn new(capacity: usize, cycle_mask: u64) -> Self {
        Self {
            slots: vec![None; capacity],
            cycle_mask,
        }
    }

    fn position(&self, addr: u64) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.is_some_and(|entry| entry.addr == addr))
    }

    /// Records an in-flight miss for `addr` at cycle `now`.
    ///
    /// If the address is already tracked the tag and prefetch flag are updated
    /// in place and the stored enqueue cycle is kept (idempotent re-record).
    /// With no free slot the record is dropped; older entries are never
    /// evicted.
    pub fn record(&mut self, addr: u64, tag: u64, is_prefetch: bool, now: u64) -> RecordOutcome {
        if let Some(pos) = self.position(addr) {
            if let Some(entry) = self.slots[pos].as_mut() {
                entry.tag = tag;
                entry.is_prefetch = is_prefetch;
                return RecordOutcome::Tracked { is_prefetch };
            }
        }

        let Some(free) = self.slots.iter().position(Option::is_none) else {
            trace!(addr, tag, "miss tracker full, record dropped");
            return RecordOutcome::NotTracked;
        };

        self.slots[free] = Some(MissEntry {
            addr,
            tag,
            cycle: now & self.cycle_mask,
            is_prefetch,
        });
        RecordOutcome::Tracked { is_prefetch }
    }

    /// Returns the enqueue cycle for `addr`, if tracked.
    pub fn peek(&self, addr: u64) -> Option<u64> {
        self.position(addr).and_then(|pos| self.slots[pos]).map(|entry| entry.cycle)
    }

    /// Returns the issuing tag for `addr`, if tracked.
    pub fn peek_tag(&self, addr: u64) -> Option<u64> {
        self.position(addr).and_then(|pos| self.slots[pos]).map(|entry| entry.tag)
    }

    /// Removes the entry for `addr` and returns its enqueue cycle.
    pub fn retire(&mut self, addr: u64) -> Option<u64> {
        let pos = self.position(addr)?;
        self.slots[pos].take().map(|entry| entry.cycle)
    }
}
