//! Simulator: owns the cache model and the engine side-by-side.
//!
//! One `step` per trace record: advance the clock, deliver fills that became
//! ready, look up the demand cache, hand the access to the engine, and queue
//! fills for the demand miss and any accepted prefetch candidates. Fills
//! complete `fill_latency` cycles after they are requested and are delivered
//! in completion order, so the engine sees the strictly serialized
//! access-then-fill stream it expects from hardware.

use std::collections::VecDeque;

use crate::common::{ConfigError, LineAddr};
use crate::config::Config;
use crate::engine::{AccessEvent, BertiPrefetcher, FillEvent};
use crate::stats::SimStats;

use super::cache::CacheModel;
use super::trace::TraceRecord;

#[derive(Debug, Clone, Copy)]
struct PendingFill {
    block: u64,
    ready_at: u64,
    is_prefetch: bool,
}

/// Trace-driven simulator: demand cache model + prefetch engine.
#[derive(Debug)]
pub struct Simulator {
    engine: BertiPrefetcher,
    cache: CacheModel,
    /// In-flight fills, completion-ordered (one shared latency keeps pushes
    /// sorted by `ready_at`).
    pending: VecDeque<PendingFill>,
    cycle: u64,
    stats: SimStats,
    block_shift: u32,
    access_period: u64,
    fill_latency: u64,
}

impl Simulator {
    /// Creates a simulator after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] the configuration tree produces.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            engine: BertiPrefetcher::new(&config.engine),
            cache: CacheModel::new(&config.cache),
            pending: VecDeque::new(),
            cycle: 0,
            stats: SimStats::default(),
            block_shift: config.sim.block_shift,
            access_period: config.sim.access_period,
            fill_latency: config.sim.fill_latency,
        })
    }

    /// The prefetch engine (for statistics and inspection).
    pub const fn engine(&self) -> &BertiPrefetcher {
        &self.engine
    }

    /// Harness statistics accumulated so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Current simulated cycle.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Processes one trace record.
    pub fn step(&mut self, record: &TraceRecord) {
        self.cycle += self.access_period;
        self.deliver_due_fills();

        let block = record.addr >> self.block_shift;
        let access = self.cache.access(block);

        self.stats.accesses += 1;
        if access.hit {
            self.stats.hits += 1;
            if access.prefetched {
                self.stats.useful_prefetch_hits += 1;
            }
        } else {
            self.stats.misses += 1;
        }

        let event = AccessEvent {
            ip: record.ip,
            addr: LineAddr::new(block),
            is_miss: !access.hit,
            is_secure: false,
            prefetched: access.prefetched,
        };
        let requests = self.engine.calculate_prefetch(&event, self.cycle);

        if !access.hit {
            self.request_fill(block, false);
        }
        for request in requests {
            self.request_fill(request.addr.val(), true);
        }
        self.stats.cycles = self.cycle;
    }

    /// Runs a whole trace and drains the outstanding fills at the end.
    pub fn run(&mut self, trace: &[TraceRecord]) {
        for record in trace {
            self.step(record);
        }
        self.finish();
    }

    /// Advances time past the last outstanding fill and delivers everything.
    pub fn finish(&mut self) {
        if let Some(last) = self.pending.back() {
            self.cycle = self.cycle.max(last.ready_at);
        }
        self.deliver_due_fills();
        self.stats.cycles = self.cycle;
    }

    /// Queues a fill unless the block is resident or already in flight.
    ///
    /// A demand miss that lands on an in-flight prefetch promotes it: the
    /// fill keeps its completion time but is delivered as a demand fill,
    /// the way a demand hit on a prefetch MSHR behaves in hardware.
    fn request_fill(&mut self, block: u64, is_prefetch: bool) {
        if self.cache.contains(block) {
            return;
        }
        if let Some(pending) = self.pending.iter_mut().find(|fill| fill.block == block) {
            if !is_prefetch {
                pending.is_prefetch = false;
            }
            return;
        }
        self.pending.push_back(PendingFill {
            block,
            ready_at: self.cycle + self.fill_latency,
            is_prefetch,
        });
    }

    /// Delivers every pending fill whose completion time has been reached.
    fn deliver_due_fills(&mut self) {
        while self
            .pending
            .front()
            .is_some_and(|fill| fill.ready_at <= self.cycle)
        {
            let Some(fill) = self.pending.pop_front() else {
                break;
            };
            self.cache.install(fill.block, fill.is_prefetch);
            if fill.is_prefetch {
                self.stats.prefetch_fills += 1;
            } else {
                self.stats.demand_fills += 1;
            }
            let event = FillEvent {
                addr: LineAddr::new(fill.block),
                is_prefetch: fill.is_prefetch,
                is_secure: false,
            };
            self.engine.notify_fill(&event, fill.ready_at);
        }
    }
}
