//! # Tailtrie: Double-Array Trie with Tail Compression
//!
//! An in-memory string-key set built on the base/check double-array encoding.
//! Branching prefixes are array transitions; unbranching suffixes are stored
//! once in a shared tail buffer.
//!
//! ## Key Features
//!
//! - **O(key length) lookups**: one array probe per symbol, one tail compare at the end
//! - **Tail compression**: a key costs array slots only where it branches
//! - **Incremental updates**: sibling relocation and tail splitting keep every
//!   previously inserted key valid after each insertion
//! - **Configurable alphabets**: full bytes, lowercase ASCII, or a custom symbol set
//!
//! ## Quick Start
//!
//! ```rust
//! use tailtrie::{DoubleArrayTrie, StatisticsProvider};
//!
//! let mut trie = DoubleArrayTrie::new();
//! trie.add(b"bachelor").unwrap();
//! trie.add(b"jar").unwrap();
//! trie.add(b"badge").unwrap();
//!
//! assert!(trie.get(b"badge"));
//! assert!(!trie.get(b"badg"));
//!
//! assert!(trie.delete(b"jar"));
//! assert!(!trie.get(b"jar"));
//! assert_eq!(trie.stats().num_keys, 2);
//! ```
//!
//! ## Concurrency
//!
//! Mutation takes `&mut self`; share a trie across threads behind a lock.
//! Concurrent readers through `&self` are safe.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fsa;

// Re-export core types
pub use config::{AlphabetKind, Config, DoubleArrayConfig};
pub use error::{Result, TrieError};
pub use fsa::{
    Alphabet, BaseCheck, DoubleArrayTrie, NodeId, StatisticsProvider, TailStore, Trie, TrieStats,
};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version)
pub fn init() {
    log::debug!("Initializing tailtrie v{}", VERSION);
}
