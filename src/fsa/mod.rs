//! Trie structures
//!
//! The double-array trie is composed from three layers, leaves first:
//! the alphabet codec, the base/check array pair, and the tail buffer.

pub mod alphabet;
pub mod base_check;
pub mod double_array_trie;
pub mod tail;
pub mod traits;

// Re-export core types
pub use alphabet::{Alphabet, Code, END_CODE, NO_CODE};
pub use base_check::{BaseCheck, NodeId};
pub use double_array_trie::{DoubleArrayTrie, ROOT};
pub use tail::TailStore;
pub use traits::{StatisticsProvider, Trie, TrieStats};
