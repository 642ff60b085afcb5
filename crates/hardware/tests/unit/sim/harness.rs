//! Simulation Harness Tests.
//!
//! Runs synthetic traces end-to-end through the cache model, fill queue, and
//! engine, and verifies the flow invariants: every miss produces exactly one
//! fill, prefetch fills install prefetched lines, and a streaming workload
//! eventually hits on lines the prefetcher brought in early enough.

use bertisim_core::config::{Config, EngineConfig};
use bertisim_core::sim::{Simulator, TraceRecord};

/// Stride-one streaming trace: one block per record, single IP.
fn stream_trace(blocks: u64) -> Vec<TraceRecord> {
    (0..blocks)
        .map(|i| TraceRecord {
            ip: 0x400,
            addr: 0x10_0000 + i * 64,
        })
        .collect()
}

fn wide_config() -> Config {
    Config {
        engine: EngineConfig {
            // Emit every learned delta so the far-ahead (timely) ones go out
            // alongside the near ones.
            degree: 16,
            ..EngineConfig::default()
        },
        ..Config::default()
    }
}

// ══════════════════════════════════════════════════════════
// 1. Flow invariants
// ══════════════════════════════════════════════════════════

/// Every record is processed and every miss is eventually filled.
#[test]
fn misses_produce_fills() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    let trace = stream_trace(100);
    sim.run(&trace);

    let stats = sim.stats();
    assert_eq!(stats.accesses, 100);
    assert!(stats.misses > 0, "a cold cache must miss");
    // A missed block's fill may arrive as a demand fill or as a prefetch fill
    // that was already in flight, but every missed block fills exactly once.
    assert!(
        stats.demand_fills + stats.prefetch_fills >= stats.misses,
        "every missed block must eventually fill"
    );
    assert!(stats.cycles >= stats.accesses * 4, "clock must advance per access");
}

/// The engine sees exactly the misses the cache model reports.
#[test]
fn engine_and_cache_agree_on_misses() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    sim.run(&stream_trace(50));
    assert_eq!(sim.engine().stats().train_on_miss, sim.stats().misses);
}

/// Identical runs are identical: no hidden entropy anywhere in the stack.
#[test]
fn runs_are_deterministic() {
    let trace = stream_trace(200);
    let mut a = Simulator::new(&wide_config()).unwrap();
    let mut b = Simulator::new(&wide_config()).unwrap();
    a.run(&trace);
    b.run(&trace);
    assert_eq!(a.stats().hits, b.stats().hits);
    assert_eq!(a.engine().stats().issued, b.engine().stats().issued);
    assert_eq!(a.engine().stats().deltas_observed, b.engine().stats().deltas_observed);
}

// ══════════════════════════════════════════════════════════
// 2. Prefetching pays off
// ══════════════════════════════════════════════════════════

/// A streaming workload trains the engine and the far-ahead deltas land
/// before their demand: the run ends with hits on prefetched lines.
#[test]
fn stream_workload_produces_useful_prefetches() {
    let mut sim = Simulator::new(&wide_config()).unwrap();
    sim.run(&stream_trace(400));

    let engine = sim.engine().stats();
    assert!(engine.deltas_observed > 0, "fills must train deltas");
    assert!(engine.issued > 0, "the warmed engine must emit candidates");
    assert!(sim.stats().prefetch_fills > 0, "accepted candidates must fill");
    assert!(
        sim.stats().useful_prefetch_hits > 0,
        "far-ahead prefetches must arrive before their demand"
    );
    assert!(
        engine.train_on_prefetch_hit > 0,
        "hits on prefetched lines must take the late-correlation path"
    );
}

/// Without prefetching distance, a cold streaming run is all misses; the
/// prefetcher must beat that baseline on hits.
#[test]
fn prefetching_beats_cold_baseline() {
    let trace = stream_trace(400);

    let mut off = Simulator::new(&Config {
        engine: EngineConfig {
            // Degree 1 with stride-1 ranking first means every prefetch is
            // late in this harness; effectively no useful prefetching.
            degree: 1,
            ..EngineConfig::default()
        },
        ..Config::default()
    })
    .unwrap();
    off.run(&trace);

    let mut on = Simulator::new(&wide_config()).unwrap();
    on.run(&trace);

    assert!(
        on.stats().hits > off.stats().hits,
        "wide degree ({}) must out-hit near-only degree ({})",
        on.stats().hits,
        off.stats().hits
    );
}
