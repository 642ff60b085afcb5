//! Statistics collection and reporting.
//!
//! This module tracks behavioral counters for the prefetch simulator. It provides:
//! 1. **Engine counters:** training events, fills, promotion sweeps, and emitted
//!    or suppressed prefetch candidates.
//! 2. **Harness counters:** accesses, hit/miss totals, and delivered fills.
//! 3. **Reporting:** sectioned plain-text reports for the CLI.

/// Prefetch engine statistics.
///
/// Owned by the engine and incremented inline; every counter is observable
/// state, so tests can assert on the exact event counts a scenario produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefetchStats {
    /// History records written from demand misses.
    pub train_on_miss: u64,
    /// History records written from hits on prefetched lines (late-prefetch path).
    pub train_on_prefetch_hit: u64,
    /// Demand fills observed by `notify_fill`.
    pub fills_demand: u64,
    /// Prefetch fills observed by `notify_fill`.
    pub fills_prefetch: u64,
    /// Timely source accesses found across all history scans.
    pub timely_sources: u64,
    /// Deltas within bound handed to the correlation table.
    pub deltas_observed: u64,
    /// Promotion sweeps run by the correlation table.
    pub promotion_sweeps: u64,
    /// Prefetch candidates emitted to the caller.
    pub issued: u64,
    /// Candidates dropped because their address was already outstanding.
    pub suppressed: u64,
    /// Demand misses the outstanding-miss tracker had no room for.
    pub tracker_drops: u64,
    /// Late-prefetch hits whose shadow entry lacked a latency (correlation skipped).
    pub shadow_skips: u64,
}

/// Section names for selective engine stats output.
///
/// Valid identifiers: `"train"`, `"fill"`, `"prefetch"`. Pass an empty slice
/// to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["train", "fill", "prefetch"];

impl PrefetchStats {
    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"train"`, `"fill"`, or
    /// `"prefetch"`. Pass an empty slice to print everything (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        println!("----------------------------------------------------------");
        println!("PREFETCH ENGINE STATISTICS");
        println!("----------------------------------------------------------");
        if want("train") {
            println!("train.on_miss            {}", self.train_on_miss);
            println!("train.on_prefetch_hit    {}", self.train_on_prefetch_hit);
            println!("train.timely_sources     {}", self.timely_sources);
            println!("train.deltas_observed    {}", self.deltas_observed);
            println!("train.promotion_sweeps   {}", self.promotion_sweeps);
            println!("train.shadow_skips       {}", self.shadow_skips);
        }
        if want("fill") {
            println!("fill.demand              {}", self.fills_demand);
            println!("fill.prefetch            {}", self.fills_prefetch);
            println!("fill.tracker_drops       {}", self.tracker_drops);
        }
        if want("prefetch") {
            let proposed = self.issued + self.suppressed;
            let suppressed_pct = if proposed > 0 {
                (self.suppressed as f64 / proposed as f64) * 100.0
            } else {
                0.0
            };
            println!("pf.issued                {}", self.issued);
            println!(
                "pf.suppressed            {} ({:.2}%)",
                self.suppressed, suppressed_pct
            );
        }
        println!("----------------------------------------------------------");
    }

    /// Prints all engine statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

/// Simulation harness statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimStats {
    /// Final simulated cycle.
    pub cycles: u64,
    /// Trace records processed.
    pub accesses: u64,
    /// Demand cache hits.
    pub hits: u64,
    /// Demand cache misses.
    pub misses: u64,
    /// Demand fills delivered to the cache model.
    pub demand_fills: u64,
    /// Prefetch fills delivered to the cache model.
    pub prefetch_fills: u64,
    /// Demand hits that landed on a line installed by a prefetch.
    pub useful_prefetch_hits: u64,
}

impl SimStats {
    /// Prints the harness summary to stdout.
    pub fn print(&self) {
        let total = self.hits + self.misses;
        let hit_rate = if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("==========================================================");
        println!("PREFETCH SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_accesses             {}", self.accesses);
        println!(
            "cache.hits               {} ({:.2}%)",
            self.hits, hit_rate
        );
        println!("cache.misses             {}", self.misses);
        println!("fills.demand             {}", self.demand_fills);
        println!("fills.prefetch           {}", self.prefetch_fills);
        println!("pf.useful_hits           {}", self.useful_prefetch_hits);
    }
}
