//! Configuration system for the prefetch simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (table geometry, masks,
//!    confidence thresholds, harness timing).
//! 2. **Structures:** Hierarchical config for the engine, the demand cache
//!    model, and the simulation loop.
//! 3. **Validation:** Geometry and mask checks returning typed errors.
//!
//! Configuration is supplied as JSON (CLI `--config`) or via `Config::default()`.

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in a JSON configuration file. The masks encode the
/// "forget old history" horizon of the engine; widening them widens the
/// effective working set the predictor can correlate across.
mod defaults {
    /// Tag mask applied after hashing the instruction pointer (10 bits).
    pub const TAG_MASK: u64 = 0x3FF;

    /// Cycle truncation mask (16 bits of cycle count).
    ///
    /// All cycle values stored by the engine wrap within this window; cycle
    /// comparisons are performed on the truncated values.
    pub const CYCLE_MASK: u64 = 0xFFFF;

    /// Fill latency mask (12 bits).
    ///
    /// A computed latency above this mask is coerced to the 0 sentinel and
    /// produces no timeliness classification.
    pub const LATENCY_MASK: u64 = 0xFFF;

    /// Block-address truncation mask for history entries (24 bits).
    pub const ADDR_MASK: u64 = 0xFF_FFFF;

    /// Exclusive bound on the magnitude of a learnable delta (4096 blocks).
    pub const DELTA_BOUND: u64 = 1 << 12;

    /// Access history log sets.
    pub const HISTORY_SETS: usize = 8;

    /// Access history log ways (entries per set, circularly overwritten).
    pub const HISTORY_WAYS: usize = 16;

    /// Outstanding-miss tracker capacity.
    pub const TRACKER_ENTRIES: usize = 64;

    /// Number of tags the correlation table tracks (FIFO-evicted).
    pub const TABLE_TAGS: usize = 16;

    /// Delta slots per correlation entry.
    pub const TABLE_DELTAS: usize = 16;

    /// Saturation bound for per-tag and per-delta confidence counters.
    pub const CONFIDENCE_MAX: u32 = 16;

    /// Confidence increment applied on each reconfirmation.
    pub const CONFIDENCE_INC: u32 = 1;

    /// Confidence assigned to a freshly written delta slot.
    pub const CONFIDENCE_INIT: u32 = 1;

    /// Promotion-sweep score (0-100) above which a delta is classed L1.
    pub const PROMOTE_L1_PCT: u32 = 65;

    /// Promotion-sweep score (0-100) above which a delta is classed L2.
    pub const PROMOTE_L2_PCT: u32 = 50;

    /// Promotion-sweep score (0-100) above which a delta stays L2-replaceable.
    pub const PROMOTE_L2R_PCT: u32 = 35;

    /// Aggregate confidence required before the low-confidence fallback
    /// ranking path may emit candidates.
    pub const ACTIVATION_CONFIDENCE: u32 = 8;

    /// Maximum prefetch candidates emitted per access.
    pub const DEGREE: usize = 4;

    /// Recency shadow sets.
    pub const SHADOW_SETS: usize = 32;

    /// Recency shadow associativity.
    pub const SHADOW_WAYS: usize = 8;

    /// Demand cache model sets.
    pub const CACHE_SETS: usize = 64;

    /// Demand cache model associativity.
    pub const CACHE_WAYS: usize = 8;

    /// Log2 of the cache line size in bytes (64-byte lines).
    pub const BLOCK_SHIFT: u32 = 6;

    /// Cycles the harness advances per trace record.
    pub const ACCESS_PERIOD: u64 = 4;

    /// Cycles between a fill request and its completion.
    pub const FILL_LATENCY: u64 = 60;
}

/// Replacement policy selection for associative structures.
///
/// Chooses the victim-selection algorithm used when a full set must give up
/// an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicyKind {
    /// Least Recently Used: evicts the entry untouched for the longest time.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// First In First Out: evicts entries in fill order (round-robin).
    #[serde(alias = "Fifo")]
    Fifo,
    /// Tree-based pseudo-LRU: LRU approximation with one bit per tree node.
    #[serde(alias = "Plru")]
    Plru,
    /// Random: evicts a pseudo-randomly selected entry (deterministic seed).
    #[serde(alias = "Random")]
    Random,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use bertisim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.engine.degree, 4);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON (typical CLI usage):
///
/// ```
/// use bertisim_core::config::{Config, ReplacementPolicyKind};
///
/// let json = r#"{
///     "engine": {
///         "degree": 2,
///         "history_sets": 16,
///         "shadow_policy": "PLRU"
///     },
///     "cache": {
///         "sets": 128,
///         "ways": 4,
///         "policy": "LRU"
///     },
///     "sim": {
///         "fill_latency": 80
///     }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.engine.degree, 2);
/// assert_eq!(config.engine.history_sets, 16);
/// assert_eq!(config.cache.policy, ReplacementPolicyKind::Lru);
/// assert_eq!(config.sim.fill_latency, 80);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Prefetch engine parameters.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Demand cache model parameters.
    #[serde(default)]
    pub cache: CacheModelConfig,
    /// Simulation loop timing parameters.
    #[serde(default)]
    pub sim: SimConfig,
}

impl Config {
    /// Validates the whole configuration tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found; a config that validates
    /// constructs every component without further failure paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.cache.validate()?;
        self.sim.validate()
    }
}

/// Prefetch engine parameters.
///
/// Masks, table geometry, and confidence thresholds. All masks must be
/// contiguous low-bit masks; set counts must be powers of two so tag bits
/// select sets directly.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Tag mask applied after the IP hash.
    #[serde(default = "EngineConfig::default_tag_mask")]
    pub tag_mask: u64,

    /// Cycle truncation mask (wraparound window).
    #[serde(default = "EngineConfig::default_cycle_mask")]
    pub cycle_mask: u64,

    /// Fill latency mask; larger latencies collapse to the 0 sentinel.
    #[serde(default = "EngineConfig::default_latency_mask")]
    pub latency_mask: u64,

    /// Block-address truncation mask for history entries.
    #[serde(default = "EngineConfig::default_addr_mask")]
    pub addr_mask: u64,

    /// Exclusive bound on |delta| for learnable deltas.
    #[serde(default = "EngineConfig::default_delta_bound")]
    pub delta_bound: u64,

    /// History log set count (power of two).
    #[serde(default = "EngineConfig::default_history_sets")]
    pub history_sets: usize,

    /// History log entries per set.
    #[serde(default = "EngineConfig::default_history_ways")]
    pub history_ways: usize,

    /// Outstanding-miss tracker capacity.
    #[serde(default = "EngineConfig::default_tracker_entries")]
    pub tracker_entries: usize,

    /// Correlation table tag capacity (FIFO-evicted beyond this).
    #[serde(default = "EngineConfig::default_table_tags")]
    pub table_tags: usize,

    /// Delta slots per correlation entry.
    #[serde(default = "EngineConfig::default_table_deltas")]
    pub table_deltas: usize,

    /// Saturation bound for confidence counters.
    #[serde(default = "EngineConfig::default_confidence_max")]
    pub confidence_max: u32,

    /// Confidence increment per reconfirmation.
    #[serde(default = "EngineConfig::default_confidence_inc")]
    pub confidence_inc: u32,

    /// Confidence of a freshly written delta slot.
    #[serde(default = "EngineConfig::default_confidence_init")]
    pub confidence_init: u32,

    /// Promotion sweep threshold for class L1 (score scale 0-100).
    #[serde(default = "EngineConfig::default_promote_l1_pct")]
    pub promote_l1_pct: u32,

    /// Promotion sweep threshold for class L2 (score scale 0-100).
    #[serde(default = "EngineConfig::default_promote_l2_pct")]
    pub promote_l2_pct: u32,

    /// Promotion sweep threshold for class L2-replaceable (score scale 0-100).
    #[serde(default = "EngineConfig::default_promote_l2r_pct")]
    pub promote_l2r_pct: u32,

    /// Aggregate confidence gating the fallback ranking path.
    #[serde(default = "EngineConfig::default_activation_confidence")]
    pub activation_confidence: u32,

    /// Maximum prefetch candidates emitted per access.
    #[serde(default = "EngineConfig::default_degree")]
    pub degree: usize,

    /// Recency shadow set count (power of two).
    #[serde(default = "EngineConfig::default_shadow_sets")]
    pub shadow_sets: usize,

    /// Recency shadow associativity.
    #[serde(default = "EngineConfig::default_shadow_ways")]
    pub shadow_ways: usize,

    /// Recency shadow victim-selection policy.
    #[serde(default)]
    pub shadow_policy: ReplacementPolicyKind,
}

impl EngineConfig {
    /// Returns the default tag mask.
    fn default_tag_mask() -> u64 {
        defaults::TAG_MASK
    }

    /// Returns the default cycle truncation mask.
    fn default_cycle_mask() -> u64 {
        defaults::CYCLE_MASK
    }

    /// Returns the default latency mask.
    fn default_latency_mask() -> u64 {
        defaults::LATENCY_MASK
    }

    /// Returns the default history address mask.
    fn default_addr_mask() -> u64 {
        defaults::ADDR_MASK
    }

    /// Returns the default delta magnitude bound.
    fn default_delta_bound() -> u64 {
        defaults::DELTA_BOUND
    }

    /// Returns the default history set count.
    fn default_history_sets() -> usize {
        defaults::HISTORY_SETS
    }

    /// Returns the default history ways per set.
    fn default_history_ways() -> usize {
        defaults::HISTORY_WAYS
    }

    /// Returns the default miss tracker capacity.
    fn default_tracker_entries() -> usize {
        defaults::TRACKER_ENTRIES
    }

    /// Returns the default correlation table tag capacity.
    fn default_table_tags() -> usize {
        defaults::TABLE_TAGS
    }

    /// Returns the default delta slots per correlation entry.
    fn default_table_deltas() -> usize {
        defaults::TABLE_DELTAS
    }

    /// Returns the default confidence saturation bound.
    fn default_confidence_max() -> u32 {
        defaults::CONFIDENCE_MAX
    }

    /// Returns the default confidence increment.
    fn default_confidence_inc() -> u32 {
        defaults::CONFIDENCE_INC
    }

    /// Returns the default initial slot confidence.
    fn default_confidence_init() -> u32 {
        defaults::CONFIDENCE_INIT
    }

    /// Returns the default L1 promotion threshold.
    fn default_promote_l1_pct() -> u32 {
        defaults::PROMOTE_L1_PCT
    }

    /// Returns the default L2 promotion threshold.
    fn default_promote_l2_pct() -> u32 {
        defaults::PROMOTE_L2_PCT
    }

    /// Returns the default L2-replaceable promotion threshold.
    fn default_promote_l2r_pct() -> u32 {
        defaults::PROMOTE_L2R_PCT
    }

    /// Returns the default fallback activation confidence.
    fn default_activation_confidence() -> u32 {
        defaults::ACTIVATION_CONFIDENCE
    }

    /// Returns the default prefetch degree.
    fn default_degree() -> usize {
        defaults::DEGREE
    }

    /// Returns the default shadow set count.
    fn default_shadow_sets() -> usize {
        defaults::SHADOW_SETS
    }

    /// Returns the default shadow associativity.
    fn default_shadow_ways() -> usize {
        defaults::SHADOW_WAYS
    }

    /// Validates engine geometry, masks, and confidence parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_mask("engine.tag_mask", self.tag_mask)?;
        check_mask("engine.cycle_mask", self.cycle_mask)?;
        check_mask("engine.latency_mask", self.latency_mask)?;
        check_mask("engine.addr_mask", self.addr_mask)?;
        check_power_of_two("engine.history_sets", self.history_sets)?;
        check_power_of_two("engine.shadow_sets", self.shadow_sets)?;
        check_nonzero("engine.history_ways", self.history_ways)?;
        check_nonzero("engine.tracker_entries", self.tracker_entries)?;
        check_nonzero("engine.table_tags", self.table_tags)?;
        check_nonzero("engine.table_deltas", self.table_deltas)?;
        check_nonzero("engine.shadow_ways", self.shadow_ways)?;
        if self.shadow_policy == ReplacementPolicyKind::Plru {
            // The PLRU decision tree only covers power-of-two way counts.
            check_power_of_two("engine.shadow_ways", self.shadow_ways)?;
        }
        check_nonzero("engine.degree", self.degree)?;
        check_nonzero("engine.delta_bound", self.delta_bound as usize)?;
        check_confidence("engine.confidence_inc", self.confidence_inc, self.confidence_max)?;
        check_confidence("engine.confidence_init", self.confidence_init, self.confidence_max)?;
        check_confidence(
            "engine.activation_confidence",
            self.activation_confidence,
            self.confidence_max,
        )?;
        Ok(())
    }
}

impl Default for EngineConfig {
    /// Creates the baseline engine configuration.
    fn default() -> Self {
        Self {
            tag_mask: defaults::TAG_MASK,
            cycle_mask: defaults::CYCLE_MASK,
            latency_mask: defaults::LATENCY_MASK,
            addr_mask: defaults::ADDR_MASK,
            delta_bound: defaults::DELTA_BOUND,
            history_sets: defaults::HISTORY_SETS,
            history_ways: defaults::HISTORY_WAYS,
            tracker_entries: defaults::TRACKER_ENTRIES,
            table_tags: defaults::TABLE_TAGS,
            table_deltas: defaults::TABLE_DELTAS,
            confidence_max: defaults::CONFIDENCE_MAX,
            confidence_inc: defaults::CONFIDENCE_INC,
            confidence_init: defaults::CONFIDENCE_INIT,
            promote_l1_pct: defaults::PROMOTE_L1_PCT,
            promote_l2_pct: defaults::PROMOTE_L2_PCT,
            promote_l2r_pct: defaults::PROMOTE_L2R_PCT,
            activation_confidence: defaults::ACTIVATION_CONFIDENCE,
            degree: defaults::DEGREE,
            shadow_sets: defaults::SHADOW_SETS,
            shadow_ways: defaults::SHADOW_WAYS,
            shadow_policy: ReplacementPolicyKind::default(),
        }
    }
}

/// Demand cache model parameters (harness side).
#[derive(Debug, Clone, Deserialize)]
pub struct CacheModelConfig {
    /// Set count (power of two).
    #[serde(default = "CacheModelConfig::default_sets")]
    pub sets: usize,

    /// Associativity (ways per set).
    #[serde(default = "CacheModelConfig::default_ways")]
    pub ways: usize,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicyKind,
}

impl CacheModelConfig {
    /// Returns the default cache set count.
    fn default_sets() -> usize {
        defaults::CACHE_SETS
    }

    /// Returns the default cache associativity.
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Validates cache geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_power_of_two("cache.sets", self.sets)?;
        check_nonzero("cache.ways", self.ways)?;
        if self.policy == ReplacementPolicyKind::Plru {
            // The PLRU decision tree only covers power-of-two way counts.
            check_power_of_two("cache.ways", self.ways)?;
        }
        Ok(())
    }
}

impl Default for CacheModelConfig {
    /// Creates the baseline cache model configuration.
    fn default() -> Self {
        Self {
            sets: defaults::CACHE_SETS,
            ways: defaults::CACHE_WAYS,
            policy: ReplacementPolicyKind::default(),
        }
    }
}

/// Simulation loop timing parameters (harness side).
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Log2 of the cache line size in bytes.
    #[serde(default = "SimConfig::default_block_shift")]
    pub block_shift: u32,

    /// Cycles the clock advances per trace record.
    #[serde(default = "SimConfig::default_access_period")]
    pub access_period: u64,

    /// Cycles between issuing a fill and its completion.
    #[serde(default = "SimConfig::default_fill_latency")]
    pub fill_latency: u64,
}

impl SimConfig {
    /// Returns the default log2 line size.
    fn default_block_shift() -> u32 {
        defaults::BLOCK_SHIFT
    }

    /// Returns the default cycles per trace record.
    fn default_access_period() -> u64 {
        defaults::ACCESS_PERIOD
    }

    /// Returns the default fill latency.
    fn default_fill_latency() -> u64 {
        defaults::FILL_LATENCY
    }

    /// Validates timing parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_nonzero("sim.access_period", self.access_period as usize)?;
        check_nonzero("sim.fill_latency", self.fill_latency as usize)
    }
}

impl Default for SimConfig {
    /// Creates the baseline simulation timing configuration.
    fn default() -> Self {
        Self {
            block_shift: defaults::BLOCK_SHIFT,
            access_period: defaults::ACCESS_PERIOD,
            fill_latency: defaults::FILL_LATENCY,
        }
    }
}

fn check_power_of_two(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || !value.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { name, value });
    }
    Ok(())
}

fn check_nonzero(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Zero { name });
    }
    Ok(())
}

fn check_mask(name: &'static str, value: u64) -> Result<(), ConfigError> {
    // A contiguous low-bit mask m satisfies m & (m + 1) == 0; zero is a
    // degenerate window that would truncate everything away.
    if value == 0 || value & (value.wrapping_add(1)) != 0 {
        return Err(ConfigError::BadMask { name, value });
    }
    Ok(())
}

fn check_confidence(name: &'static str, value: u32, limit: u32) -> Result<(), ConfigError> {
    if value == 0 || value > limit {
        return Err(ConfigError::ConfidenceRange { name, value, limit });
    }
    Ok(())
}
