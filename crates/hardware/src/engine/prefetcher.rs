//! Prefetch engine orchestrator.
//!
//! Joins the outstanding-miss tracker, the access history log, the correlation
//! table, and the recency shadow behind the two entry points the owning cache
//! drives:
//! 1. **`notify_fill`:** retire the miss, compute the observed latency, mirror
//!    the fill into the shadow, and train the correlation table from timely
//!    history sources.
//! 2. **`calculate_prefetch`:** record the access, train from late-prefetch
//!    hits, and emit ranked candidate blocks for the access's tag.
//!
//! The engine is synchronous and single-owner: every call runs to completion
//! on the caller's event loop and no state is shared outside the instance. The
//! current cycle is an explicit argument; the engine truncates it to the
//! configured wraparound window and never reads ambient time.

use tracing::{debug, trace};

use crate::common::{LineAddr, ip_tag};
use crate::config::EngineConfig;
use crate::stats::PrefetchStats;

use super::correlation::CorrelationTable;
use super::event::{AccessEvent, FillEvent, PrefetchRequest};
use super::history::AccessHistoryLog;
use super::miss_tracker::{OutstandingMissTracker, RecordOutcome};
use super::shadow::RecencyShadow;

/// Timeliness-aware delta-correlation prefetcher.
#[derive(Debug)]
pub struct BertiPrefetcher {
    cfg: EngineConfig,
    tracker: OutstandingMissTracker,
    history: AccessHistoryLog,
    table: CorrelationTable,
    shadow: RecencyShadow,
    stats: PrefetchStats,
}

impl BertiPrefetcher {
    /// Creates an engine from a validated configuration.
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            tracker: OutstandingMissTracker::new(cfg.tracker_entries, cfg.cycle_mask),
            history: AccessHistoryLog::new(
                cfg.history_sets,
                cfg.history_ways,
                cfg.addr_mask,
                cfg.cycle_mask,
            ),
            table: CorrelationTable::new(cfg),
            shadow: RecencyShadow::new(cfg),
            stats: PrefetchStats::default(),
            cfg: cfg.clone(),
        }
    }

    /// Engine statistics accumulated so far.
    pub const fn stats(&self) -> &PrefetchStats {
        &self.stats
    }

    /// The correlation table, for inspection and reporting.
    pub const fn correlation(&self) -> &CorrelationTable {
        &self.table
    }

    /// Notifies the engine that a fill completed at cycle `now`.
    ///
    /// Retires the block from the miss tracker, derives the observed latency
    /// (0 when untracked, when the subtraction would go negative under the
    /// cycle wraparound, or when it exceeds the latency mask), mirrors the
    /// fill into the shadow, and — for demand fills with a real latency —
    /// trains the correlation table from timely history sources.
    pub fn notify_fill(&mut self, fill: &FillEvent, now: u64) {
        let addr = fill.addr.val();
        let now = now & self.cfg.cycle_mask;

        let tag = self.tracker.peek_tag(addr);
        let enqueued = self.tracker.retire(addr);

        let mut latency = match enqueued {
            Some(start) if now > start => now - start,
            _ => 0,
        };
        if latency > self.cfg.latency_mask {
            latency = 0;
        }

        trace!(addr, latency, is_prefetch = fill.is_prefetch, "fill");
        if fill.is_prefetch {
            self.stats.fills_prefetch += 1;
        } else {
            self.stats.fills_demand += 1;
        }

        self.shadow
            .record_fill(addr, fill.is_secure, fill.is_prefetch, latency);

        if latency != 0 && !fill.is_prefetch {
            if let Some(tag) = tag {
                self.train(latency, tag, addr, now);
            }
        }
    }

    /// Processes a demand access at cycle `now` and returns ranked prefetch
    /// candidates for its tag, at most `degree` of them, most preferred first.
    pub fn calculate_prefetch(&mut self, access: &AccessEvent, now: u64) -> Vec<PrefetchRequest> {
        let tag = ip_tag(access.ip, self.cfg.tag_mask);
        let addr = access.addr.val();
        let now = now & self.cfg.cycle_mask;
        trace!(tag, addr, is_miss = access.is_miss, "access");

        if access.is_miss {
            if self.tracker.record(addr, tag, false, now) == RecordOutcome::NotTracked {
                self.stats.tracker_drops += 1;
            }
            self.history.record(tag, addr, now);
            self.stats.train_on_miss += 1;
        } else if self.shadow.is_hit_and_prefetched(addr, access.is_secure) {
            // A demand hit on a line the prefetcher brought in: the prefetch
            // was late for whoever triggered it, so replay the training this
            // access would have produced had it missed.
            self.shadow.clear_prefetch_flag(addr, access.is_secure);
            match self.shadow.latency_of(addr, access.is_secure) {
                Some(latency) => {
                    debug!(tag, addr, latency, "late prefetch hit");
                    self.train(latency, tag, addr, now);
                    self.history.record(tag, addr, now);
                    self.stats.train_on_prefetch_hit += 1;
                }
                None => self.stats.shadow_skips += 1,
            }
        }

        let mut requests = Vec::new();
        for candidate in self.table.rank(tag, self.cfg.degree) {
            if candidate.delta == 0 {
                continue;
            }
            let target = LineAddr::new(addr).offset(candidate.delta);
            if self.tracker.peek(target.val()).is_some() {
                self.stats.suppressed += 1;
                continue;
            }
            trace!(tag, target = target.val(), delta = candidate.delta, "prefetch");
            requests.push(PrefetchRequest {
                addr: target,
                priority: requests.len(),
            });
        }
        self.stats.issued += requests.len() as u64;
        requests
    }

    /// Trains the correlation table from the timely sources of one
    /// (tag, block, latency) observation.
    fn train(&mut self, latency: u64, tag: u64, addr: u64, now: u64) {
        let sources = self
            .history
            .find_timely_sources(latency, tag, addr, now);
        self.stats.timely_sources += sources.len() as u64;

        let masked_addr = (addr & self.cfg.addr_mask) as i64;
        for (index, source) in sources.iter().enumerate() {
            if index == 0 && self.table.bump_tag_confidence(tag) {
                self.stats.promotion_sweeps += 1;
            }
            // Applications mostly walk upward through memory; keeping the
            // operand order fixed keeps negative deltas meaningful.
            let delta = masked_addr - source.addr as i64;
            if delta.unsigned_abs() < self.cfg.delta_bound {
                self.table.observe_delta(source.tag, delta);
                self.stats.deltas_observed += 1;
            }
        }
    }
}
