//! Core trie traits and statistics
//!
//! Keeps the trie surface independent of the concrete array layout so a
//! reference implementation can be checked against the double-array trie
//! through the same calls.

use crate::error::Result;

use serde::{Deserialize, Serialize};

/// Trait for mutable string-key sets
pub trait Trie {
    /// Insert a key
    ///
    /// # Returns
    /// * `true` if the key was newly inserted, `false` if it was already present
    fn insert(&mut self, key: &[u8]) -> Result<bool>;

    /// Check if a key exists in the trie
    fn contains(&self, key: &[u8]) -> bool;

    /// Remove a key, returning whether it was present
    fn remove(&mut self, key: &[u8]) -> bool;

    /// Get the number of keys in the trie
    fn len(&self) -> usize;

    /// Check if the trie is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Statistics about trie structure and memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrieStats {
    /// Number of keys stored
    pub num_keys: usize,
    /// Live states, root included
    pub num_states: usize,
    /// States pointing into the tail
    pub num_leaves: usize,
    /// Allocated base/check slots
    pub array_len: usize,
    /// Tail bytes in use, garbage included
    pub tail_len: usize,
    /// Tail bytes no key can reach any more
    pub tail_garbage: usize,
    /// Memory usage in bytes
    pub memory_usage: usize,
    /// Space efficiency (bits per key)
    pub bits_per_key: f64,
}

impl TrieStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate bits per key
    pub fn calculate_bits_per_key(&mut self) {
        if self.num_keys > 0 {
            self.bits_per_key = (self.memory_usage * 8) as f64 / self.num_keys as f64;
        }
    }

    /// Fraction of allocated slots that hold a live state
    pub fn array_density(&self) -> f64 {
        if self.array_len == 0 {
            0.0
        } else {
            self.num_states as f64 / self.array_len as f64
        }
    }
}

/// Trait for structures that report statistics
pub trait StatisticsProvider {
    /// Get statistics about this structure
    fn stats(&self) -> TrieStats;

    /// Get memory usage in bytes
    fn memory_usage(&self) -> usize {
        self.stats().memory_usage
    }

    /// Get bits per key ratio
    fn bits_per_key(&self) -> f64 {
        self.stats().bits_per_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_per_key() {
        let mut stats = TrieStats {
            num_keys: 4,
            memory_usage: 64,
            ..TrieStats::new()
        };
        stats.calculate_bits_per_key();
        assert_eq!(stats.bits_per_key, 128.0);

        let mut empty = TrieStats::new();
        empty.calculate_bits_per_key();
        assert_eq!(empty.bits_per_key, 0.0);
    }

    #[test]
    fn test_array_density() {
        let stats = TrieStats {
            num_states: 25,
            array_len: 100,
            ..TrieStats::new()
        };
        assert!((stats.array_density() - 0.25).abs() < f64::EPSILON);
        assert_eq!(TrieStats::new().array_density(), 0.0);
    }
}
