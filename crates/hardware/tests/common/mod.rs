//! Shared helpers for the unit tests.

use bertisim_core::config::EngineConfig;
use bertisim_core::engine::CorrelationTable;

/// Engine config with a tiny correlation table so eviction is reachable in a
/// few operations. Everything else keeps the defaults.
pub fn tiny_table_config(table_tags: usize) -> EngineConfig {
    EngineConfig {
        table_tags,
        ..EngineConfig::default()
    }
}

/// Builds a correlation table with the default geometry.
pub fn default_table() -> CorrelationTable {
    CorrelationTable::new(&EngineConfig::default())
}

/// Reconfirms `delta` for `tag` until its slot confidence reaches `target`.
///
/// The first observation creates the slot at confidence 1, so `target`
/// observations in total leave the slot at `min(target, confidence_max)`.
pub fn observe_n(table: &mut CorrelationTable, tag: u64, delta: i64, target: u32) {
    for _ in 0..target {
        table.observe_delta(tag, delta);
    }
}

/// Bumps the tag's aggregate confidence until a promotion sweep runs.
///
/// Panics if no sweep happens within 64 bumps; that means saturation is
/// broken, which is exactly what the caller wants surfaced.
pub fn bump_until_sweep(table: &mut CorrelationTable, tag: u64) {
    for _ in 0..64 {
        if table.bump_tag_confidence(tag) {
            return;
        }
    }
    panic!("no promotion sweep after 64 confidence bumps");
}
