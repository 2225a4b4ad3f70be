//! Error handling for the tailtrie library
//!
//! Lookup misses are not errors: `get` and `delete` report them as plain
//! booleans. Errors cover precondition violations (bad keys, bad tail
//! positions), capacity limits of the array encoding, configuration problems,
//! and internal invariant violations that indicate a bug.

use thiserror::Error;

/// Main error type for the tailtrie library
#[derive(Error, Debug)]
pub enum TrieError {
    /// I/O related errors (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Keys must contain at least one symbol
    #[error("Empty key")]
    EmptyKey,

    /// Key byte outside the alphabet, or the reserved boundary marker
    #[error("Invalid symbol 0x{byte:02x} at position {position}")]
    InvalidSymbol {
        /// The offending byte
        byte: u8,
        /// Its offset within the key
        position: usize,
    },

    /// Tail write outside the initialized buffer
    #[error("Invalid tail position {pos} (append cursor at {cursor})")]
    TailPosition {
        /// Requested 1-based position
        pos: usize,
        /// Current append cursor
        cursor: usize,
    },

    /// Tail text that cannot be framed or spliced
    #[error("Malformed tail fragment: {message}")]
    MalformedFragment {
        /// What was wrong with the fragment
        message: String,
    },

    /// Node id or tail offset no longer fits the base encoding
    #[error("Capacity overflow: {requested} exceeds the addressable range")]
    CapacityOverflow {
        /// The value that could not be encoded
        requested: usize,
    },

    /// Internal invariant violation
    #[error("Internal inconsistency: {message}")]
    Inconsistency {
        /// Which invariant broke
        message: String,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl TrieError {
    /// Create an invalid symbol error
    pub fn invalid_symbol(byte: u8, position: usize) -> Self {
        Self::InvalidSymbol { byte, position }
    }

    /// Create a tail position error
    pub fn tail_position(pos: usize, cursor: usize) -> Self {
        Self::TailPosition { pos, cursor }
    }

    /// Create a malformed fragment error
    pub fn malformed_fragment<S: Into<String>>(message: S) -> Self {
        Self::MalformedFragment { message: message.into() }
    }

    /// Create a capacity overflow error
    pub fn capacity_overflow(requested: usize) -> Self {
        Self::CapacityOverflow { requested }
    }

    /// Create an internal inconsistency error
    pub fn inconsistency<S: Into<String>>(message: S) -> Self {
        Self::Inconsistency { message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// Precondition violations leave the trie untouched, so the caller may
    /// retry with different input. An inconsistency means the structure can
    /// no longer be trusted.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::EmptyKey => true,
            Self::InvalidSymbol { .. } => true,
            Self::TailPosition { .. } => true,
            Self::MalformedFragment { .. } => true,
            Self::Configuration { .. } => true,
            Self::CapacityOverflow { .. } => false,
            Self::Inconsistency { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::EmptyKey | Self::InvalidSymbol { .. } => "key",
            Self::TailPosition { .. } | Self::MalformedFragment { .. } => "tail",
            Self::CapacityOverflow { .. } => "capacity",
            Self::Inconsistency { .. } => "invariant",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TrieError>;
