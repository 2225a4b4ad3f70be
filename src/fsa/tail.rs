//! Tail buffer for tail-compressed key suffixes
//!
//! One contiguous byte buffer holding `suffix + boundary` fragments. Positions
//! are 1-based; `cursor()` is the next unused position. Positions handed out
//! by the store never move: a splice that shortens a fragment leaves the
//! surplus bytes behind as unreachable garbage instead of shifting later
//! fragments.
//!
//! ```text
//! write("hello#", 1)   hello#
//! write("world#", 7)   hello#world#
//! write("p#", 3)       hep#o#world#     read(1) = "hep", read(7) = "world"
//! ```

use crate::error::{Result, TrieError};

/// Growable suffix storage owning all tail position arithmetic
#[derive(Clone)]
pub struct TailStore {
    buf: Vec<u8>,
    boundary: u8,
    garbage: usize,
}

impl TailStore {
    /// Create an empty store framing fragments with `boundary`
    pub fn new(boundary: u8) -> Self {
        Self::with_capacity(boundary, 0)
    }

    /// Create an empty store with reserved space
    pub fn with_capacity(boundary: u8, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            boundary,
            garbage: 0,
        }
    }

    /// Next unused position
    #[inline]
    pub fn cursor(&self) -> usize {
        self.buf.len() + 1
    }

    /// Bytes in use, garbage included
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing was ever written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes no live fragment can reach
    #[inline]
    pub fn garbage(&self) -> usize {
        self.garbage
    }

    /// Raw buffer contents
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes held by the buffer
    pub fn memory_usage(&self) -> usize {
        self.buf.capacity()
    }

    /// Fragment at `pos` without its boundary
    ///
    /// Empty when `pos` is out of range or no boundary follows it.
    pub fn read(&self, pos: usize) -> &[u8] {
        match self.fragment_end(pos) {
            Some(end) => &self.buf[pos - 1..end],
            None => &[],
        }
    }

    /// Whether a boundary-terminated fragment starts at `pos`
    pub fn is_framed(&self, pos: usize) -> bool {
        self.fragment_end(pos).is_some()
    }

    /// Index of the boundary closing the fragment at `pos`
    fn fragment_end(&self, pos: usize) -> Option<usize> {
        if pos == 0 || pos > self.buf.len() {
            return None;
        }
        let start = pos - 1;
        self.buf[start..]
            .iter()
            .position(|&b| b == self.boundary)
            .map(|offset| start + offset)
    }

    /// Write `text` at `pos`
    ///
    /// Only `text` up to and including its first boundary is written. At the
    /// cursor this appends. Inside the buffer it splices over the fragment
    /// region starting at `pos`: the last region may be replaced by anything,
    /// any other region only by something no longer than itself.
    pub fn write(&mut self, text: &[u8], pos: usize) -> Result<()> {
        let cursor = self.cursor();
        if pos == 0 || pos > cursor {
            return Err(TrieError::tail_position(pos, cursor));
        }
        let frame_len = text
            .iter()
            .position(|&b| b == self.boundary)
            .map(|i| i + 1)
            .ok_or_else(|| TrieError::malformed_fragment("text is not boundary-terminated"))?;
        let fragment = &text[..frame_len];

        if pos == cursor {
            self.buf.extend_from_slice(fragment);
            return Ok(());
        }

        let start = pos - 1;
        match self.fragment_end(pos) {
            Some(end) if end + 1 < self.buf.len() => {
                let region = end + 1 - start;
                if frame_len > region {
                    return Err(TrieError::malformed_fragment(format!(
                        "splice of {} bytes at {} overruns the {}-byte fragment",
                        frame_len, pos, region
                    )));
                }
                self.buf[start..start + frame_len].copy_from_slice(fragment);
                self.garbage += region - frame_len;
            }
            _ => {
                self.buf.truncate(start);
                self.buf.extend_from_slice(fragment);
            }
        }
        Ok(())
    }

    /// Append `suffix` plus boundary at the cursor and return its position
    pub fn append(&mut self, suffix: &[u8]) -> Result<usize> {
        let pos = self.cursor();
        self.store(suffix, pos)?;
        Ok(pos)
    }

    /// Frame `suffix` with the boundary and write it at `pos`
    pub fn store(&mut self, suffix: &[u8], pos: usize) -> Result<()> {
        if let Some(i) = suffix.iter().position(|&b| b == self.boundary) {
            return Err(TrieError::malformed_fragment(format!(
                "suffix contains the boundary marker at offset {}",
                i
            )));
        }
        let mut text = Vec::with_capacity(suffix.len() + 1);
        text.extend_from_slice(suffix);
        text.push(self.boundary);
        self.write(&text, pos)
    }

    /// Account the fragment at `pos` as garbage
    pub fn release(&mut self, pos: usize) {
        if let Some(end) = self.fragment_end(pos) {
            self.garbage += end + 2 - pos;
        }
    }
}

impl std::fmt::Debug for TailStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TailStore")
            .field("len", &self.buf.len())
            .field("cursor", &self.cursor())
            .field("garbage", &self.garbage)
            .finish()
    }
}
