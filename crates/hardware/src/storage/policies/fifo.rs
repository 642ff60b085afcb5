//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! Evicts ways in fill order, independent of hits. Each set keeps a
//! round-robin pointer to the next way to give up; filling the pointed-at way
//! advances the pointer, hits elsewhere leave it alone.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(1)
//!   - `victim()`: O(1)
//! - **Space Complexity:** O(S) pointers
//! - **Best Case:** Streaming accesses where all entries age equally
//! - **Worst Case:** Strong temporal locality (evicts hot entries)

use super::ReplacementPolicy;

/// FIFO policy state.
#[derive(Debug)]
pub struct FifoPolicy {
    /// Next way to evict, per set.
    cursor: Vec<usize>,
    /// Number of ways per set.
    ways: usize,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets.
    /// * `ways` - The associativity (number of ways).
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            cursor: vec![0; sets],
            ways,
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// Advances the eviction pointer when the pointed-at way is filled.
    ///
    /// Touches on other ways are hits and do not disturb fill order.
    fn touch(&mut self, set: usize, way: usize) {
        if self.cursor[set] == way {
            self.cursor[set] = (way + 1) % self.ways;
        }
    }

    /// Returns the current round-robin pointer for the set.
    fn victim(&mut self, set: usize) -> usize {
        self.cursor[set]
    }
}
