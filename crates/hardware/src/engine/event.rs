//! Event types exchanged between the owning cache and the engine.
//!
//! Events are transient: the caller builds one per access or fill, the engine
//! consumes it within the call, and nothing is retained.

use crate::common::LineAddr;

/// One demand access as seen by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvent {
    /// Instruction pointer of the access; hashed to the table tag internally.
    pub ip: u64,
    /// Accessed block.
    pub addr: LineAddr,
    /// Whether the access missed the cache.
    pub is_miss: bool,
    /// Secure-world access; secure and non-secure images of a block are
    /// distinct lines in the shadow.
    pub is_secure: bool,
    /// Whether the cache reports the line was installed by a prior prefetch.
    pub prefetched: bool,
}

/// One completed fill as seen by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillEvent {
    /// Filled block.
    pub addr: LineAddr,
    /// Whether the fill itself was prefetch-initiated.
    pub is_prefetch: bool,
    /// Secure-world fill.
    pub is_secure: bool,
}

/// One prefetch candidate emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchRequest {
    /// Block to prefetch.
    pub addr: LineAddr,
    /// Rank of the candidate; 0 is the most preferred.
    pub priority: usize,
}
