//! Confidence-ranked delta correlation table.
//!
//! A bounded map from tag to a fixed array of delta candidates. Each candidate
//! carries a saturating confidence counter and a replacement class; each entry
//! carries an aggregate confidence that periodically triggers a promotion
//! sweep, reclassifying every candidate from its share of the aggregate and
//! resetting the counters. Tags beyond the table capacity evict the tag
//! tracked longest (insertion order, not access order).
//!
//! The table is a single insertion-ordered deque: the lookup structure and the
//! FIFO eviction order cannot drift apart because they are the same structure.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::common::constants::{FALLBACK_L1_SCORE, FALLBACK_L2_SCORE};
use crate::config::EngineConfig;

/// Replacement class of a delta candidate.
///
/// Doubles as eviction priority (lower classes give up their slot first) and
/// as ranking priority when candidates are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReplacementClass {
    /// Free to overwrite; also the class of every freshly learned delta.
    #[default]
    Replaceable,
    /// Second-level quality, still replaceable under pressure.
    L2Replaceable,
    /// Second-level prefetch candidate.
    L2,
    /// First-level prefetch candidate.
    L1,
}

impl ReplacementClass {
    /// Ranking group: L1 before L2 before everything else.
    ///
    /// `L2Replaceable` and `Replaceable` rank together on magnitude alone.
    const fn rank_group(self) -> u8 {
        match self {
            Self::L1 => 0,
            Self::L2 => 1,
            Self::L2Replaceable | Self::Replaceable => 2,
        }
    }
}

/// One delta candidate of a correlation entry.
///
/// Inside the table a slot with `delta == 0` is empty; `rank` never emits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeltaCandidate {
    /// Signed block delta.
    pub delta: i64,
    /// Saturating confidence; on the fallback ranking path this is the 0-100
    /// normalized score instead.
    pub confidence: u32,
    /// Replacement class.
    pub class: ReplacementClass,
}

#[derive(Debug)]
struct CorrelationEntry {
    tag: u64,
    confidence: u32,
    deltas: Vec<DeltaCandidate>,
}

/// Bounded, FIFO-evicted map from tag to delta candidates.
#[derive(Debug)]
pub struct CorrelationTable {
    entries: VecDeque<CorrelationEntry>,
    capacity: usize,
    slots_per_tag: usize,
    confidence_max: u32,
    confidence_inc: u32,
    confidence_init: u32,
    promote_l1_pct: u32,
    promote_l2_pct: u32,
    promote_l2r_pct: u32,
    activation_confidence: u32,
}

impl CorrelationTable {
    /// Creates an empty table from the engine configuration.
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(cfg.table_tags),
            capacity: cfg.table_tags,
            slots_per_tag: cfg.table_deltas,
            confidence_max: cfg.confidence_max,
            confidence_inc: cfg.confidence_inc,
            confidence_init: cfg.confidence_init,
            promote_l1_pct: cfg.promote_l1_pct,
            promote_l2_pct: cfg.promote_l2_pct,
            promote_l2r_pct: cfg.promote_l2r_pct,
            activation_confidence: cfg.activation_confidence,
        }
    }

    fn entry(&self, tag: u64) -> Option<&CorrelationEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    fn entry_mut(&mut self, tag: u64) -> Option<&mut CorrelationEntry> {
        self.entries.iter_mut().find(|entry| entry.tag == tag)
    }

    /// Lowest-confidence slot of the given class, if any.
    ///
    /// Empty slots carry class `Replaceable` at confidence 0, so they win the
    /// `Replaceable` scan before any learned candidate does. Ties keep the
    /// first slot found.
    fn victim_slot(deltas: &[DeltaCandidate], class: ReplacementClass) -> Option<usize> {
        let mut victim = None;
        let mut lowest = u32::MAX;
        for (index, slot) in deltas.iter().enumerate() {
            if slot.class == class && slot.confidence < lowest {
                lowest = slot.confidence;
                victim = Some(index);
            }
        }
        victim
    }

    /// Learns (or reconfirms) a delta for `tag`.
    ///
    /// Unknown tags allocate a new entry, FIFO-evicting the oldest tracked tag
    /// when the table is full. A delta already present has its confidence
    /// bumped (saturating). A new delta takes the lowest-confidence
    /// `Replaceable` slot, then the lowest-confidence `L2Replaceable` slot;
    /// with neither available it is dropped. Delta 0 is never stored.
    pub fn observe_delta(&mut self, tag: u64, delta: i64) {
        if delta == 0 {
            return;
        }
        let (inc, max, init) = (self.confidence_inc, self.confidence_max, self.confidence_init);

        if let Some(entry) = self.entry_mut(tag) {
            if let Some(slot) = entry.deltas.iter_mut().find(|slot| slot.delta == delta) {
                slot.confidence = (slot.confidence + inc).min(max);
                trace!(tag, delta, confidence = slot.confidence, "delta reconfirmed");
                return;
            }

            let victim = Self::victim_slot(&entry.deltas, ReplacementClass::Replaceable)
                .or_else(|| Self::victim_slot(&entry.deltas, ReplacementClass::L2Replaceable));
            if let Some(index) = victim {
                entry.deltas[index] = DeltaCandidate {
                    delta,
                    confidence: init,
                    class: ReplacementClass::Replaceable,
                };
                trace!(tag, delta, slot = index, "delta learned");
            }
            return;
        }

        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(tag = evicted.tag, "correlation entry evicted (FIFO)");
            }
        }
        let mut entry = CorrelationEntry {
            tag,
            confidence: inc.min(max),
            deltas: vec![DeltaCandidate::default(); self.slots_per_tag],
        };
        entry.deltas[0] = DeltaCandidate {
            delta,
            confidence: init,
            class: ReplacementClass::Replaceable,
        };
        self.entries.push_back(entry);
        trace!(tag, delta, "correlation entry allocated");
    }

    /// Bumps the aggregate confidence of `tag`; runs the promotion sweep when
    /// it saturates.
    ///
    /// The sweep scores every occupied slot by its share of the saturated
    /// aggregate (`confidence * 100 / confidence_max`), reclassifies it
    /// against the promotion thresholds, and resets all counters to zero.
    /// Returns whether a sweep ran. Unknown tags are a no-op.
    pub fn bump_tag_confidence(&mut self, tag: u64) -> bool {
        let (inc, max) = (self.confidence_inc, self.confidence_max);
        let (l1, l2, l2r) = (self.promote_l1_pct, self.promote_l2_pct, self.promote_l2r_pct);

        let Some(entry) = self.entry_mut(tag) else {
            return false;
        };
        entry.confidence = (entry.confidence + inc).min(max);
        if entry.confidence < max {
            return false;
        }

        debug!(tag, "promotion sweep");
        for slot in &mut entry.deltas {
            if slot.delta != 0 {
                let score = slot.confidence * 100 / max;
                slot.class = if score > l1 {
                    ReplacementClass::L1
                } else if score > l2 {
                    ReplacementClass::L2
                } else if score > l2r {
                    ReplacementClass::L2Replaceable
                } else {
                    ReplacementClass::Replaceable
                };
            }
            slot.confidence = 0;
        }
        entry.confidence = 0;
        true
    }

    /// Ranks the prefetch candidates of `tag`, best first, at most `degree`.
    ///
    /// The primary path emits the class-bearing (non-`Replaceable`) deltas
    /// ordered by class (L1, then L2, then the rest), ties by smaller
    /// magnitude, final tie by signed delta. When no slot carries a class yet
    /// and the aggregate confidence has reached the activation threshold, the
    /// fallback path scores every occupied slot against the aggregate
    /// (0-100), assigns call-local classes from the score, and orders by the
    /// same rule.
    pub fn rank(&self, tag: u64, degree: usize) -> Vec<DeltaCandidate> {
        let Some(entry) = self.entry(tag) else {
            return Vec::new();
        };

        let mut ranked: Vec<DeltaCandidate> = entry
            .deltas
            .iter()
            .filter(|slot| slot.delta != 0 && slot.class != ReplacementClass::Replaceable)
            .copied()
            .collect();

        if ranked.is_empty() {
            if entry.confidence < self.activation_confidence {
                return Vec::new();
            }
            ranked = entry
                .deltas
                .iter()
                .filter(|slot| slot.delta != 0)
                .map(|slot| {
                    let score = slot.confidence * 100 / entry.confidence;
                    DeltaCandidate {
                        delta: slot.delta,
                        confidence: score,
                        class: if score > FALLBACK_L1_SCORE {
                            ReplacementClass::L1
                        } else if score > FALLBACK_L2_SCORE {
                            ReplacementClass::L2
                        } else {
                            ReplacementClass::Replaceable
                        },
                    }
                })
                .collect();
        }

        ranked.sort_by_key(|c| (c.class.rank_group(), c.delta.unsigned_abs(), c.delta));
        ranked.truncate(degree);
        ranked
    }

    /// Whether `tag` currently has an entry.
    pub fn contains_tag(&self, tag: u64) -> bool {
        self.entry(tag).is_some()
    }

    /// Raw delta slots of `tag` (empty slots have `delta == 0`).
    pub fn slots(&self, tag: u64) -> Option<&[DeltaCandidate]> {
        self.entry(tag).map(|entry| entry.deltas.as_slice())
    }

    /// Aggregate confidence of `tag`.
    pub fn aggregate_confidence(&self, tag: u64) -> Option<u32> {
        self.entry(tag).map(|entry| entry.confidence)
    }

    /// Number of tracked tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table tracks no tags.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
