//! Outstanding-Miss Tracker Tests.
//!
//! Verifies the record/peek/retire lifecycle, the idempotent re-record
//! behavior, and the silent-drop policy when the table is full.

use bertisim_core::engine::{OutstandingMissTracker, RecordOutcome};

const CYCLE_MASK: u64 = 0xFFFF;

// ══════════════════════════════════════════════════════════
// 1. Record / retire round trip
// ══════════════════════════════════════════════════════════

/// A record followed by a retire returns the exact enqueue cycle.
#[test]
fn record_retire_round_trip() {
    let mut tracker = OutstandingMissTracker::new(4, CYCLE_MASK);
    let outcome = tracker.record(0x1000, 0x42, false, 1234);
    assert_eq!(outcome, RecordOutcome::Tracked { is_prefetch: false });
    assert_eq!(tracker.retire(0x1000), Some(1234));
}

/// Retiring frees the slot: a second retire finds nothing.
#[test]
fn retire_is_destructive() {
    let mut tracker = OutstandingMissTracker::new(4, CYCLE_MASK);
    let _ = tracker.record(0x1000, 0x42, false, 10);
    assert!(tracker.retire(0x1000).is_some());
    assert_eq!(tracker.retire(0x1000), None);
    assert_eq!(tracker.peek(0x1000), None);
}

/// `peek` observes without removing.
#[test]
fn peek_is_non_destructive() {
    let mut tracker = OutstandingMissTracker::new(4, CYCLE_MASK);
    let _ = tracker.record(0x1000, 0x42, false, 10);
    assert_eq!(tracker.peek(0x1000), Some(10));
    assert_eq!(tracker.peek(0x1000), Some(10));
    assert_eq!(tracker.peek_tag(0x1000), Some(0x42));
}

/// Enqueue cycles are stored truncated to the cycle window.
#[test]
fn cycle_is_truncated_on_record() {
    let mut tracker = OutstandingMissTracker::new(4, CYCLE_MASK);
    let _ = tracker.record(0x1000, 0x42, false, 0x1_2345);
    assert_eq!(tracker.peek(0x1000), Some(0x2345));
}

// ══════════════════════════════════════════════════════════
// 2. Idempotent re-record
// ══════════════════════════════════════════════════════════

/// Re-recording a tracked address updates tag and flag but keeps the
/// original enqueue cycle.
#[test]
fn rerecord_keeps_enqueue_cycle() {
    let mut tracker = OutstandingMissTracker::new(4, CYCLE_MASK);
    let _ = tracker.record(0x1000, 0x42, false, 100);
    let outcome = tracker.record(0x1000, 0x77, true, 200);
    assert_eq!(outcome, RecordOutcome::Tracked { is_prefetch: true });
    assert_eq!(tracker.peek_tag(0x1000), Some(0x77));
    assert_eq!(tracker.retire(0x1000), Some(100), "enqueue cycle must survive");
}

/// Re-recording does not consume a second slot.
#[test]
fn rerecord_consumes_no_slot() {
    let mut tracker = OutstandingMissTracker::new(2, CYCLE_MASK);
    let _ = tracker.record(0x1000, 1, false, 10);
    let _ = tracker.record(0x1000, 1, false, 20);
    assert_eq!(
        tracker.record(0x2000, 2, false, 30),
        RecordOutcome::Tracked { is_prefetch: false },
        "second slot must still be free"
    );
}

// ══════════════════════════════════════════════════════════
// 3. Capacity exhaustion
// ══════════════════════════════════════════════════════════

/// A full table drops new records and keeps the old ones.
#[test]
fn full_table_drops_new_records() {
    let mut tracker = OutstandingMissTracker::new(2, CYCLE_MASK);
    let _ = tracker.record(0x1000, 1, false, 10);
    let _ = tracker.record(0x2000, 2, false, 20);
    assert_eq!(tracker.record(0x3000, 3, false, 30), RecordOutcome::NotTracked);

    // The dropped address is invisible; the tracked ones are untouched.
    assert_eq!(tracker.peek(0x3000), None);
    assert_eq!(tracker.peek(0x1000), Some(10));
    assert_eq!(tracker.peek(0x2000), Some(20));
}

/// Retiring frees capacity for new records.
#[test]
fn retire_frees_capacity() {
    let mut tracker = OutstandingMissTracker::new(1, CYCLE_MASK);
    let _ = tracker.record(0x1000, 1, false, 10);
    assert_eq!(tracker.record(0x2000, 2, false, 20), RecordOutcome::NotTracked);
    assert_eq!(tracker.retire(0x1000), Some(10));
    assert_eq!(
        tracker.record(0x2000, 2, false, 30),
        RecordOutcome::Tracked { is_prefetch: false }
    );
}
