//! Alphabet codec mapping key bytes to dense transition codes
//!
//! Codes are laid out as:
//! ```text
//! 0               absent (no transition)
//! 1               END, the terminator transition; its symbol is the boundary marker
//! 2..=max_code    key symbols in ascending byte order
//! ```
//!
//! Every key is walked as its symbol codes followed by END, so a key that is a
//! proper prefix of another key still ends in its own leaf.

use crate::error::{Result, TrieError};

/// Dense transition code
pub type Code = u16;

/// Code reserved for "no transition"
pub const NO_CODE: Code = 0;

/// Terminator transition code
pub const END_CODE: Code = 1;

/// Bijective byte <-> code table
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    boundary: u8,
    to_code: [Code; 256],
    to_symbol: Vec<u8>,
}

impl Alphabet {
    /// Every byte except the boundary marker
    pub fn bytes(boundary: u8) -> Self {
        let symbols: Vec<u8> = (0u8..=255).filter(|&b| b != boundary).collect();
        Self::build(&symbols, boundary)
    }

    /// Lowercase ASCII letters, `a` -> 2 through `z` -> 27
    pub fn lowercase(boundary: u8) -> Result<Self> {
        let symbols: Vec<u8> = (b'a'..=b'z').collect();
        Self::from_symbols(&symbols, boundary)
    }

    /// Custom symbol set; order and duplicates in `symbols` do not matter
    pub fn from_symbols(symbols: &[u8], boundary: u8) -> Result<Self> {
        let mut sorted = symbols.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        if sorted.is_empty() {
            return Err(TrieError::configuration("alphabet must contain at least one symbol"));
        }
        if sorted.binary_search(&boundary).is_ok() {
            return Err(TrieError::configuration(format!(
                "boundary marker 0x{:02x} cannot be an alphabet symbol",
                boundary
            )));
        }
        Ok(Self::build(&sorted, boundary))
    }

    fn build(sorted: &[u8], boundary: u8) -> Self {
        let mut to_code = [NO_CODE; 256];
        let mut to_symbol = Vec::with_capacity(sorted.len() + 2);
        to_symbol.push(0);
        to_symbol.push(boundary);

        for &symbol in sorted {
            to_code[symbol as usize] = to_symbol.len() as Code;
            to_symbol.push(symbol);
        }

        Self {
            boundary,
            to_code,
            to_symbol,
        }
    }

    /// The reserved tail terminator
    #[inline]
    pub fn boundary(&self) -> u8 {
        self.boundary
    }

    /// Smallest live code (END)
    #[inline]
    pub fn min_code(&self) -> Code {
        END_CODE
    }

    /// Largest symbol code
    #[inline]
    pub fn max_code(&self) -> Code {
        (self.to_symbol.len() - 1) as Code
    }

    /// Number of key symbols (END excluded)
    #[inline]
    pub fn len(&self) -> usize {
        self.to_symbol.len() - 2
    }

    /// Always false: constructors reject empty symbol sets
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key symbols in code order
    #[inline]
    pub fn symbols(&self) -> &[u8] {
        &self.to_symbol[2..]
    }

    /// Whether `byte` may appear in a key
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.to_code[byte as usize] != NO_CODE
    }

    /// Code for a key byte; `None` for the boundary and unsupported bytes
    #[inline]
    pub fn encode(&self, byte: u8) -> Option<Code> {
        match self.to_code[byte as usize] {
            NO_CODE => None,
            code => Some(code),
        }
    }

    /// Symbol for a code; END decodes to the boundary marker
    #[inline]
    pub fn decode(&self, code: Code) -> Option<u8> {
        if code == NO_CODE {
            return None;
        }
        self.to_symbol.get(code as usize).copied()
    }

    /// Encode a key and append the END code
    pub fn encode_key(&self, key: &[u8]) -> Result<Vec<Code>> {
        if key.is_empty() {
            return Err(TrieError::EmptyKey);
        }
        self.encode_with_end(key)
    }

    /// Encode a tail fragment (possibly empty) and append the END code
    pub fn encode_fragment(&self, fragment: &[u8]) -> Result<Vec<Code>> {
        self.encode_with_end(fragment)
    }

    fn encode_with_end(&self, bytes: &[u8]) -> Result<Vec<Code>> {
        let mut codes = Vec::with_capacity(bytes.len() + 1);
        for (position, &byte) in bytes.iter().enumerate() {
            let code = self
                .encode(byte)
                .ok_or_else(|| TrieError::invalid_symbol(byte, position))?;
            codes.push(code);
        }
        codes.push(END_CODE);
        Ok(codes)
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alphabet")
            .field("boundary", &format_args!("0x{:02x}", self.boundary))
            .field("symbols", &self.len())
            .field("max_code", &self.max_code())
            .finish()
    }
}
