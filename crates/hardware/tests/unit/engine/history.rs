//! Access History Log Tests.
//!
//! Verifies the circular write behavior and the timeliness scan: the cutoff
//! arithmetic, the strict comparison at latency 0, exclusion and
//! deduplication, ordering, and the output cap.

use bertisim_core::common::MAX_TIMELY_SOURCES;
use bertisim_core::engine::AccessHistoryLog;

const ADDR_MASK: u64 = 0xFF_FFFF;
const CYCLE_MASK: u64 = 0xFFFF;

fn log(sets: usize, ways: usize) -> AccessHistoryLog {
    AccessHistoryLog::new(sets, ways, ADDR_MASK, CYCLE_MASK)
}

// ══════════════════════════════════════════════════════════
// 1. Cutoff arithmetic
// ══════════════════════════════════════════════════════════

/// Only entries at or before `now - latency` are timely.
#[test]
fn cutoff_filters_recent_entries() {
    let mut h = log(8, 16);
    let tag = 3;
    h.record(tag, 0x100, 100);
    h.record(tag, 0x200, 120);

    // Cutoff 140 - 20 = 120: both qualify.
    let both = h.find_timely_sources(20, tag, 0x999, 140);
    assert_eq!(both.len(), 2);

    // Cutoff 140 - 25 = 115: only the older one.
    let older = h.find_timely_sources(25, tag, 0x999, 140);
    assert_eq!(older.len(), 1);
    assert_eq!(older[0].addr, 0x100);
}

/// An entry exactly at the cutoff is timely (inclusive comparison).
#[test]
fn entry_at_cutoff_is_timely() {
    let mut h = log(8, 16);
    h.record(5, 0x100, 100);
    let sources = h.find_timely_sources(30, 5, 0x999, 130);
    assert_eq!(sources.len(), 1);
}

/// With latency 0 the comparison is strict: an entry written at the query
/// cycle is not its own source.
#[test]
fn latency_zero_is_strict() {
    let mut h = log(8, 16);
    h.record(5, 0x100, 200);
    h.record(5, 0x200, 150);
    let sources = h.find_timely_sources(0, 5, 0x999, 200);
    assert_eq!(sources.len(), 1, "only the strictly earlier entry qualifies");
    assert_eq!(sources[0].addr, 0x200);
}

/// A run younger than the latency has no timely sources.
#[test]
fn too_early_in_run_yields_nothing() {
    let mut h = log(8, 16);
    h.record(5, 0x100, 10);
    assert!(h.find_timely_sources(50, 5, 0x999, 40).is_empty());
}

// ══════════════════════════════════════════════════════════
// 2. Matching rules
// ══════════════════════════════════════════════════════════

/// Entries from other tags never match, even in the same set.
#[test]
fn tag_must_match() {
    let mut h = log(8, 16);
    let (a, b) = (1, 9); // same set under an 8-set log
    h.record(a, 0x100, 50);
    h.record(b, 0x200, 50);
    let sources = h.find_timely_sources(10, a, 0x999, 100);
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].tag, a);
}

/// The excluded address is skipped, not a scan terminator: entries recorded
/// before it are still found.
#[test]
fn exclusion_skips_but_does_not_halt() {
    let mut h = log(8, 16);
    let tag = 2;
    h.record(tag, 0x100, 40);
    h.record(tag, 0x300, 60); // will be excluded; newer than 0x100
    let sources = h.find_timely_sources(10, tag, 0x300, 100);
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].addr, 0x100, "scan must continue past the exclusion");
}

/// A block recorded twice is reported once.
#[test]
fn duplicates_collapse() {
    let mut h = log(8, 16);
    let tag = 2;
    h.record(tag, 0x100, 40);
    h.record(tag, 0x100, 60);
    let sources = h.find_timely_sources(10, tag, 0x999, 100);
    assert_eq!(sources.len(), 1);
}

/// Matches come back newest-first.
#[test]
fn order_is_most_recent_first() {
    let mut h = log(8, 16);
    let tag = 2;
    h.record(tag, 0x100, 10);
    h.record(tag, 0x200, 20);
    h.record(tag, 0x300, 30);
    let sources = h.find_timely_sources(5, tag, 0x999, 100);
    let addrs: Vec<u64> = sources.iter().map(|s| s.addr).collect();
    assert_eq!(addrs, vec![0x300, 0x200, 0x100]);
}

/// Stored addresses are truncated to the history window before comparison.
#[test]
fn addresses_are_masked() {
    let mut h = log(8, 16);
    let tag = 2;
    h.record(tag, 0x1FF_1234, 10); // aliases 0xFF_1234 under the 24-bit mask
    let sources = h.find_timely_sources(5, tag, 0xFF_1234, 100);
    assert!(sources.is_empty(), "masked alias must hit the exclusion");
}

// ══════════════════════════════════════════════════════════
// 3. Capacity behavior
// ══════════════════════════════════════════════════════════

/// The circular log overwrites its oldest entry once full.
#[test]
fn circular_overwrite_drops_oldest() {
    let mut h = log(8, 4);
    let tag = 2;
    for i in 0..5u64 {
        h.record(tag, 0x100 + i, 10 + i);
    }
    let sources = h.find_timely_sources(1, tag, 0x999, 100);
    assert_eq!(sources.len(), 4, "one of five entries was overwritten");
    assert!(
        !sources.iter().any(|s| s.addr == 0x100),
        "the oldest entry must be gone"
    );
}

/// The scan caps its output even when more entries qualify.
#[test]
fn scan_output_is_capped() {
    let mut h = log(8, 32);
    let tag = 2;
    for i in 0..24u64 {
        h.record(tag, 0x100 + i, 10 + i);
    }
    let sources = h.find_timely_sources(1, tag, 0x999, 1000);
    assert_eq!(sources.len(), MAX_TIMELY_SOURCES);
}
