//! Double Array Trie Configuration
//!
//! Controls initial allocations, the tail boundary marker, and which symbols
//! keys may contain.

use crate::config::{parse_env_var, Config, ValidationError};
use crate::error::{Result, TrieError};
use crate::fsa::alphabet::Alphabet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Key symbol set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlphabetKind {
    /// Every byte except the boundary marker
    Bytes,
    /// `a..=z` only, smallest arc scans
    LowercaseAscii,
    /// Explicit symbol set
    Symbols(Vec<u8>),
}

impl Default for AlphabetKind {
    fn default() -> Self {
        Self::Bytes
    }
}

impl AlphabetKind {
    /// Build the codec for this symbol set
    pub fn build(&self, boundary: u8) -> Result<Alphabet> {
        match self {
            Self::Bytes => Ok(Alphabet::bytes(boundary)),
            Self::LowercaseAscii => Alphabet::lowercase(boundary),
            Self::Symbols(symbols) => Alphabet::from_symbols(symbols, boundary),
        }
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "bytes" => Self::Bytes,
            "lowercase" | "lowercase_ascii" => Self::LowercaseAscii,
            _ => Self::Symbols(value.as_bytes().to_vec()),
        }
    }
}

/// Boundary byte from its environment form
///
/// A single character is taken literally, so `"5"` is the byte `b'5'`.
/// Longer values are a byte number, hexadecimal with a `0x` prefix
/// (`"0x00"`, `"0x23"`) or decimal (`"00"`, `"35"`).
fn parse_boundary(value: &str) -> Result<u8> {
    let parsed = match value.as_bytes() {
        [byte] => Some(*byte),
        _ => match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
            Some(hex) => u8::from_str_radix(hex, 16).ok(),
            None => value.parse::<u8>().ok(),
        },
    };
    parsed.ok_or_else(|| {
        TrieError::configuration(format!(
            "boundary must be a single character, a 0x-prefixed hex byte or a decimal byte, got '{}'",
            value
        ))
    })
}

/// Configuration for [`DoubleArrayTrie`](crate::fsa::DoubleArrayTrie)
///
/// Environment keys read by [`Config::from_env_with_prefix`]:
/// `DA_INITIAL_CAPACITY`, `DA_TAIL_CAPACITY`, `DA_BOUNDARY` and
/// `DA_ALPHABET` (`bytes`, `lowercase`, or a literal symbol string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleArrayConfig {
    /// Base/check slots allocated up front
    pub initial_capacity: usize,
    /// Tail bytes reserved up front
    pub initial_tail_capacity: usize,
    /// Tail fragment terminator; never valid inside a key
    pub boundary: u8,
    /// Symbols keys may contain
    pub alphabet: AlphabetKind,
}

impl Default for DoubleArrayConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            initial_tail_capacity: 4096,
            boundary: 0,
            alphabet: AlphabetKind::Bytes,
        }
    }
}

impl Config for DoubleArrayConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.initial_capacity < 2 {
            errors.push(
                ValidationError::new(
                    "initial_capacity",
                    &self.initial_capacity.to_string(),
                    "the root occupies slot 1, so at least 2 slots are required",
                )
                .with_suggestion("256-65536"),
            );
        }

        if self.initial_capacity > i32::MAX as usize {
            errors.push(ValidationError::new(
                "initial_capacity",
                &self.initial_capacity.to_string(),
                "node ids must fit the signed 32-bit base encoding",
            ));
        }

        if let Err(e) = self.alphabet.build(self.boundary) {
            errors.push(ValidationError::new(
                "alphabet",
                &format!("{:?}", self.alphabet),
                &e.to_string(),
            ));
        }

        if !errors.is_empty() {
            return Err(TrieError::configuration(format!(
                "Configuration validation failed: {}",
                errors
                    .into_iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            )));
        }

        Ok(())
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();

        config.initial_capacity = parse_env_var(
            &format!("{}DA_INITIAL_CAPACITY", prefix),
            config.initial_capacity,
        );
        config.initial_tail_capacity = parse_env_var(
            &format!("{}DA_TAIL_CAPACITY", prefix),
            config.initial_tail_capacity,
        );

        if let Ok(boundary) = std::env::var(format!("{}DA_BOUNDARY", prefix)) {
            config.boundary = parse_boundary(&boundary)?;
        }

        if let Ok(alphabet) = std::env::var(format!("{}DA_ALPHABET", prefix)) {
            config.alphabet = AlphabetKind::parse(&alphabet);
        }

        config.validate()?;
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            initial_capacity: 1 << 16,
            initial_tail_capacity: 1 << 20,
            ..Self::default()
        }
    }

    fn memory_preset() -> Self {
        Self {
            initial_capacity: 64,
            initial_tail_capacity: 0,
            ..Self::default()
        }
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)
            .map_err(|e| TrieError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| TrieError::configuration(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }
}

impl DoubleArrayConfig {
    /// Start a builder from the defaults
    pub fn builder() -> DoubleArrayConfigBuilder {
        DoubleArrayConfigBuilder::new()
    }

    /// Build the alphabet codec this configuration describes
    pub fn build_alphabet(&self) -> Result<Alphabet> {
        self.alphabet.build(self.boundary)
    }
}

/// Builder for [`DoubleArrayConfig`]
#[derive(Debug, Clone)]
pub struct DoubleArrayConfigBuilder {
    config: DoubleArrayConfig,
}

impl DoubleArrayConfigBuilder {
    /// Create a builder with default values
    pub fn new() -> Self {
        Self {
            config: DoubleArrayConfig::default(),
        }
    }

    /// Set the initial base/check capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the initial tail capacity
    pub fn initial_tail_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_tail_capacity = capacity;
        self
    }

    /// Set the boundary marker
    pub fn boundary(mut self, boundary: u8) -> Self {
        self.config.boundary = boundary;
        self
    }

    /// Set the key alphabet
    pub fn alphabet(mut self, alphabet: AlphabetKind) -> Self {
        self.config.alphabet = alphabet;
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<DoubleArrayConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for DoubleArrayConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
