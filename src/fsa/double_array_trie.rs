//! Double Array Trie with tail compression
//!
//! Branching prefixes live in the base/check arrays; each unbranching suffix
//! is stored once in the tail buffer and referenced by a leaf whose base is
//! the negated tail position.
//!
//! # Algorithm Overview
//!
//! For a transition from node `s` with code `c`:
//! ```text
//! t = base[s] + c
//! check[t] == s     transition exists
//! base[t] < 0       t is a leaf; the key's remainder is tail[-base[t]..boundary]
//! ```
//!
//! Insertion diverges from lookup at the first missing transition:
//!
//! - free slot: install a leaf (`separate`)
//! - slot owned by another parent: move the smaller sibling set to a fresh
//!   base found by `x_check` (`relocate_base`), then install the leaf
//! - leaf reached before the key is exhausted: unfold the shared prefix of the
//!   stored suffix and the new remainder into array nodes and hang both
//!   remainders off the divergence node (`tail_insert`)
//!
//! Deletion tombstones the leaf slot only. Slots are never reclaimed, so the
//! arrays grow monotonically under add/delete churn.
//!
//! The trie is not synchronized. Concurrent `get` calls are fine; any
//! mutation needs exclusive access, which `&mut self` already enforces.

use crate::config::{AlphabetKind, Config, DoubleArrayConfig};
use crate::error::{Result, TrieError};
use crate::fsa::alphabet::{Alphabet, Code, END_CODE};
use crate::fsa::base_check::{BaseCheck, NodeId};
use crate::fsa::tail::TailStore;
use crate::fsa::traits::{StatisticsProvider, Trie, TrieStats};

/// The permanent root node
pub const ROOT: NodeId = 1;

/// Base of the root in an empty trie
const ROOT_BASE: i32 = 1;

/// Double-array trie over byte-string keys
#[derive(Clone)]
pub struct DoubleArrayTrie {
    cells: BaseCheck,
    tail: TailStore,
    alphabet: Alphabet,
    num_keys: usize,
    config: DoubleArrayConfig,
}

/// Leaf base encoding a tail position
#[inline]
fn leaf_base(pos: usize) -> Result<i32> {
    i32::try_from(pos)
        .map(|p| -p)
        .map_err(|_| TrieError::capacity_overflow(pos))
}

/// Tail position stored in a leaf base
#[inline]
fn tail_pos(base: i32) -> usize {
    base.unsigned_abs() as usize
}

/// Key bytes left after the transition at `consumed` was taken
#[inline]
fn remainder(key: &[u8], consumed: usize) -> &[u8] {
    key.get(consumed + 1..).unwrap_or_default()
}

impl DoubleArrayTrie {
    /// Create an empty trie accepting every byte except `0x00`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailtrie::DoubleArrayTrie;
    ///
    /// let mut trie = DoubleArrayTrie::new();
    /// trie.add(b"bachelor").unwrap();
    /// trie.add(b"jar").unwrap();
    /// assert!(trie.get(b"bachelor"));
    /// assert!(!trie.get(b"bach"));
    /// ```
    pub fn new() -> Self {
        let config = DoubleArrayConfig::default();
        let alphabet = Alphabet::bytes(config.boundary);
        Self::from_parts(config, alphabet)
    }

    /// Create an empty trie from a validated configuration
    pub fn with_config(config: DoubleArrayConfig) -> Result<Self> {
        config.validate()?;
        let alphabet = config.build_alphabet()?;
        Ok(Self::from_parts(config, alphabet))
    }

    /// Create an empty trie over a prebuilt alphabet
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        let config = DoubleArrayConfig {
            boundary: alphabet.boundary(),
            alphabet: AlphabetKind::Symbols(alphabet.symbols().to_vec()),
            ..DoubleArrayConfig::default()
        };
        Self::from_parts(config, alphabet)
    }

    /// Build a trie by adding every key in order
    pub fn from_keys<I, K>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let mut trie = Self::new();
        for key in keys {
            trie.add(key.as_ref())?;
        }

        if log::log_enabled!(log::Level::Debug) {
            let stats = trie.stats();
            log::debug!(
                "Built double-array trie from {} keys: {} slots, density {:.3}, tail {} bytes",
                stats.num_keys,
                stats.array_len,
                stats.array_density(),
                stats.tail_len
            );
        }
        Ok(trie)
    }

    fn from_parts(config: DoubleArrayConfig, alphabet: Alphabet) -> Self {
        let mut cells = BaseCheck::with_capacity(config.initial_capacity);
        cells.set_base(ROOT, ROOT_BASE);
        let tail = TailStore::with_capacity(alphabet.boundary(), config.initial_tail_capacity);

        log::debug!(
            "Created double-array trie: capacity={}, symbols={}, boundary=0x{:02x}",
            cells.len(),
            alphabet.len(),
            alphabet.boundary()
        );

        Self {
            cells,
            tail,
            alphabet,
            num_keys: 0,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &DoubleArrayConfig {
        &self.config
    }

    /// Get the alphabet codec
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Allocated base/check slots
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.num_keys
    }

    /// Whether no keys are stored
    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    /// Base value of a node, for inspection
    #[inline]
    pub fn base(&self, node: NodeId) -> i32 {
        self.cells.base(node)
    }

    /// Check value of a node, for inspection
    #[inline]
    pub fn check(&self, node: NodeId) -> NodeId {
        self.cells.check(node)
    }

    /// Tail fragment at `pos`, for inspection
    #[inline]
    pub fn read_tail(&self, pos: usize) -> &[u8] {
        self.tail.read(pos)
    }

    /// The tail buffer, for inspection
    pub fn tail(&self) -> &TailStore {
        &self.tail
    }

    /// Live outgoing codes of a node
    pub fn find_arcs(&self, node: NodeId) -> Vec<Code> {
        self.cells.find_arcs(node, self.alphabet.max_code())
    }

    /// Walk `codes` from the root until a leaf is reached
    ///
    /// Returns the index of the code whose transition reached the leaf, and
    /// the leaf itself.
    fn walk(&self, codes: &[Code]) -> Option<(usize, NodeId)> {
        let mut s = ROOT;
        for (idx, &code) in codes.iter().enumerate() {
            let t = self.cells.child(s, code)?;
            if self.cells.base(t) < 0 {
                return Some((idx, t));
            }
            s = t;
        }
        None
    }

    /// Leaf holding exactly `key`
    fn find_leaf(&self, key: &[u8], codes: &[Code]) -> Option<NodeId> {
        let (idx, t) = self.walk(codes)?;
        let stored = self.tail.read(tail_pos(self.cells.base(t)));
        if stored == remainder(key, idx) {
            Some(t)
        } else {
            None
        }
    }

    /// Check key membership
    pub fn get(&self, key: &[u8]) -> bool {
        let codes = match self.alphabet.encode_key(key) {
            Ok(codes) => codes,
            Err(_) => return false,
        };
        self.find_leaf(key, &codes).is_some()
    }

    /// Insert a key
    ///
    /// # Returns
    /// * `Ok(true)` if the key was inserted, `Ok(false)` if it was already present
    /// * `Err` for empty keys, bytes outside the alphabet, or a broken invariant
    pub fn add(&mut self, key: &[u8]) -> Result<bool> {
        let codes = self.alphabet.encode_key(key)?;
        let mut s = ROOT;

        for (idx, &code) in codes.iter().enumerate() {
            let t = self.cells.child_slot(s, code).ok_or_else(|| {
                TrieError::inconsistency(format!("node {} has no positive base", s))
            })?;
            let owner = self.cells.check(t);

            if owner == s {
                let base = self.cells.base(t);
                if base < 0 {
                    let rest = remainder(key, idx);
                    if self.tail.read(tail_pos(base)) == rest {
                        return Ok(false);
                    }
                    self.tail_insert(t, key, idx, &codes)?;
                    self.num_keys += 1;
                    return Ok(true);
                }
                if base == 0 {
                    return Err(TrieError::inconsistency(format!(
                        "live node {} has neither a base nor a tail",
                        t
                    )));
                }
                s = t;
                continue;
            }

            if owner != 0 {
                s = self.relocate_base(s, t, code)?;
            }
            self.separate(s, code, remainder(key, idx), None)?;
            self.num_keys += 1;
            return Ok(true);
        }

        Err(TrieError::inconsistency(
            "terminator transition does not lead to a leaf",
        ))
    }

    /// Remove a key, tombstoning its leaf
    pub fn delete(&mut self, key: &[u8]) -> bool {
        let codes = match self.alphabet.encode_key(key) {
            Ok(codes) => codes,
            Err(_) => return false,
        };
        match self.find_leaf(key, &codes) {
            Some(t) => {
                self.tail.release(tail_pos(self.cells.base(t)));
                self.cells.clear(t);
                self.num_keys -= 1;
                true
            }
            None => false,
        }
    }

    /// Install a leaf for `code` under `parent` holding `suffix`
    ///
    /// With `reuse` the suffix is spliced over the fragment at that tail
    /// position instead of being appended.
    fn separate(
        &mut self,
        parent: NodeId,
        code: Code,
        suffix: &[u8],
        reuse: Option<usize>,
    ) -> Result<NodeId> {
        let t = self.cells.child_slot(parent, code).ok_or_else(|| {
            TrieError::inconsistency(format!("node {} has no positive base", parent))
        })?;
        if self.cells.check(t) != 0 {
            return Err(TrieError::inconsistency(format!(
                "slot {} is still owned by node {}",
                t,
                self.cells.check(t)
            )));
        }

        let pos = match reuse {
            Some(pos) => {
                self.tail.store(suffix, pos)?;
                pos
            }
            None => self.tail.append(suffix)?,
        };
        let base = leaf_base(pos)?;

        self.cells.set_check(t, parent);
        self.cells.set_base(t, base);
        Ok(t)
    }

    /// Resolve a collision at slot `t`, wanted by `s` for `code`
    ///
    /// Moves whichever of `s` (plus the new code) and the slot's current owner
    /// has fewer children. Returns the id of `s` afterwards, which changes
    /// when `s` itself was one of the moved children.
    fn relocate_base(&mut self, s: NodeId, t: NodeId, code: Code) -> Result<NodeId> {
        let rival = self.cells.check(t);
        let max_code = self.alphabet.max_code();
        let own_arcs = self.cells.find_arcs(s, max_code);
        let rival_arcs = self.cells.find_arcs(rival, max_code);

        if own_arcs.len() + 1 < rival_arcs.len() {
            log::trace!(
                "slot {} taken by node {}; moving {} arcs of node {}",
                t,
                rival,
                own_arcs.len(),
                s
            );
            let mut reserve = own_arcs.clone();
            reserve.push(code);
            self.move_children(s, &own_arcs, &reserve)?;
            Ok(s)
        } else {
            log::trace!(
                "slot {} wanted by node {}; moving {} arcs of node {}",
                t,
                s,
                rival_arcs.len(),
                rival
            );
            let moves = self.move_children(rival, &rival_arcs, &rival_arcs)?;
            Ok(moves
                .iter()
                .find(|&&(old, _)| old == s)
                .map_or(s, |&(_, new)| new))
        }
    }

    /// Give `node` a new base with room for `reserve` and move its `arcs` there
    ///
    /// Returns the `(old, new)` id of every moved child.
    fn move_children(
        &mut self,
        node: NodeId,
        arcs: &[Code],
        reserve: &[Code],
    ) -> Result<Vec<(NodeId, NodeId)>> {
        let max_code = self.alphabet.max_code();
        let old_base = self.cells.base(node);
        let new_base = self.cells.x_check(reserve);
        self.cells.set_base(node, new_base);

        let mut moves = Vec::with_capacity(arcs.len());
        for &code in arcs {
            let (old, new) = match (BaseCheck::slot(old_base, code), BaseCheck::slot(new_base, code)) {
                (Some(old), Some(new)) => (old, new),
                _ => {
                    return Err(TrieError::inconsistency(format!(
                        "cannot move code {} of node {} from base {} to {}",
                        code, node, old_base, new_base
                    )))
                }
            };

            let child_base = self.cells.base(old);
            let grandchildren = self.cells.find_arcs(old, max_code);

            self.cells.set_base(new, child_base);
            self.cells.set_check(new, node);
            for grandchild in grandchildren {
                if let Some(g) = BaseCheck::slot(child_base, grandchild) {
                    self.cells.set_check(g, new);
                }
            }
            self.cells.clear(old);
            moves.push((old, new));
        }
        Ok(moves)
    }

    /// Split the leaf `t`, reached at `codes[idx]`, for a key whose remainder differs
    fn tail_insert(&mut self, t: NodeId, key: &[u8], idx: usize, codes: &[Code]) -> Result<()> {
        let old_pos = tail_pos(self.cells.base(t));
        let old_suffix = self.tail.read(old_pos).to_vec();
        let old_codes = self.alphabet.encode_fragment(&old_suffix).map_err(|e| {
            TrieError::inconsistency(format!("tail fragment at {} is not encodable: {}", old_pos, e))
        })?;
        let new_codes = &codes[idx + 1..];

        let common = old_codes
            .iter()
            .zip(new_codes)
            .take_while(|(a, b)| a == b)
            .count();
        if common >= old_codes.len() || common >= new_codes.len() {
            return Err(TrieError::inconsistency("tail split on identical suffixes"));
        }

        log::trace!(
            "splitting leaf {} (tail {}): {} shared symbols",
            t,
            old_pos,
            common
        );

        let mut s = t;
        for &code in &old_codes[..common] {
            let q = self.cells.x_check(&[code]);
            self.cells.set_base(s, q);
            let next = BaseCheck::slot(q, code)
                .ok_or_else(|| TrieError::inconsistency("x_check returned a non-positive base"))?;
            self.cells.set_check(next, s);
            s = next;
        }

        let (old_code, new_code) = (old_codes[common], new_codes[common]);
        let q = self.cells.x_check(&[old_code, new_code]);
        self.cells.set_base(s, q);

        let old_rest = old_suffix.get(common + 1..).unwrap_or_default();
        self.separate(s, old_code, old_rest, Some(old_pos))?;
        self.separate(s, new_code, remainder(key, idx + 1 + common), None)?;
        Ok(())
    }

    /// Every stored key, in ascending byte order
    pub fn keys(&self) -> Vec<Vec<u8>> {
        let mut out = Vec::with_capacity(self.num_keys);
        self.collect_keys(ROOT, &mut Vec::new(), &mut out);
        out
    }

    /// Stored keys starting with `prefix`, in ascending byte order
    pub fn keys_with_prefix(&self, prefix: &[u8]) -> Vec<Vec<u8>> {
        let mut s = ROOT;
        for (i, &byte) in prefix.iter().enumerate() {
            let t = match self
                .alphabet
                .encode(byte)
                .and_then(|code| self.cells.child(s, code))
            {
                Some(t) => t,
                None => return Vec::new(),
            };

            let base = self.cells.base(t);
            if base < 0 {
                let mut key = prefix[..=i].to_vec();
                key.extend_from_slice(self.tail.read(tail_pos(base)));
                return if key.starts_with(prefix) {
                    vec![key]
                } else {
                    Vec::new()
                };
            }
            s = t;
        }

        let mut out = Vec::new();
        self.collect_keys(s, &mut prefix.to_vec(), &mut out);
        out
    }

    /// Depth-first walk below `node` in ascending code order
    ///
    /// Unfolded shared prefixes make paths as deep as the longest key, so the
    /// walk keeps its own stack of `(node, arcs, next arc, prefix length)`.
    fn collect_keys(&self, node: NodeId, prefix: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        let root_depth = prefix.len();
        let mut stack: Vec<(NodeId, Vec<Code>, usize, usize)> =
            vec![(node, self.find_arcs(node), 0, root_depth)];

        loop {
            let (parent, code, depth) = match stack.last_mut() {
                Some(frame) => {
                    let code = frame.1.get(frame.2).copied();
                    frame.2 += 1;
                    (frame.0, code, frame.3)
                }
                None => break,
            };
            let code = match code {
                Some(code) => code,
                None => {
                    stack.pop();
                    continue;
                }
            };
            let t = match BaseCheck::slot(self.cells.base(parent), code) {
                Some(t) => t,
                None => continue,
            };

            prefix.truncate(depth);
            if code != END_CODE {
                if let Some(symbol) = self.alphabet.decode(code) {
                    prefix.push(symbol);
                }
            }

            let child_base = self.cells.base(t);
            if child_base < 0 {
                let mut key = prefix.clone();
                key.extend_from_slice(self.tail.read(tail_pos(child_base)));
                out.push(key);
            } else {
                stack.push((t, self.find_arcs(t), 0, prefix.len()));
            }
        }
        prefix.truncate(root_depth);
    }

    /// Verify the structural invariants of the arrays and tail
    ///
    /// Checks that the root is internal, every live slot's owner is a live
    /// internal node whose base maps back to the slot with a valid code,
    /// leaves point at framed tail fragments, terminator transitions are
    /// leaves, and the leaf count equals `len()`.
    pub fn validate_integrity(&self) -> Result<()> {
        let result = self.check_invariants();
        if let Err(ref e) = result {
            log::warn!("Double-array integrity check failed: {}", e);
        }
        result
    }

    fn check_invariants(&self) -> Result<()> {
        if self.cells.base(ROOT) <= 0 {
            return Err(TrieError::inconsistency("root base is not a positive offset"));
        }
        if self.cells.check(ROOT) != 0 {
            return Err(TrieError::inconsistency("root has an owner"));
        }

        let min_code = i64::from(self.alphabet.min_code());
        let max_code = i64::from(self.alphabet.max_code());
        let mut leaves = 0usize;

        for t in (ROOT + 1)..self.cells.len() as NodeId {
            let parent = self.cells.check(t);
            let base = self.cells.base(t);

            if parent == 0 {
                if base != 0 {
                    return Err(TrieError::inconsistency(format!(
                        "free slot {} has base {}",
                        t, base
                    )));
                }
                continue;
            }

            if parent != ROOT && self.cells.check(parent) == 0 {
                return Err(TrieError::inconsistency(format!(
                    "slot {} is owned by dead node {}",
                    t, parent
                )));
            }

            let parent_base = self.cells.base(parent);
            let code = i64::from(t) - i64::from(parent_base);
            if parent_base <= 0 || code < min_code || code > max_code {
                return Err(TrieError::inconsistency(format!(
                    "slot {} is not reachable from its owner {} (base {})",
                    t, parent, parent_base
                )));
            }

            if base < 0 {
                if !self.tail.is_framed(tail_pos(base)) {
                    return Err(TrieError::inconsistency(format!(
                        "leaf {} points at unframed tail position {}",
                        t,
                        tail_pos(base)
                    )));
                }
                leaves += 1;
            } else if base == 0 {
                return Err(TrieError::inconsistency(format!(
                    "live node {} has neither a base nor a tail",
                    t
                )));
            } else if code == i64::from(END_CODE) {
                return Err(TrieError::inconsistency(format!(
                    "terminator slot {} is not a leaf",
                    t
                )));
            }
        }

        if leaves != self.num_keys {
            return Err(TrieError::inconsistency(format!(
                "{} leaves for {} keys",
                leaves, self.num_keys
            )));
        }
        Ok(())
    }
}

impl Default for DoubleArrayTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DoubleArrayTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoubleArrayTrie")
            .field("cells", &self.cells)
            .field("tail", &self.tail)
            .field("alphabet", &self.alphabet)
            .field("num_keys", &self.num_keys)
            .finish()
    }
}

impl Trie for DoubleArrayTrie {
    fn insert(&mut self, key: &[u8]) -> Result<bool> {
        self.add(key)
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.get(key)
    }

    fn remove(&mut self, key: &[u8]) -> bool {
        self.delete(key)
    }

    fn len(&self) -> usize {
        self.num_keys
    }
}

impl StatisticsProvider for DoubleArrayTrie {
    fn stats(&self) -> TrieStats {
        let mut stats = TrieStats {
            num_keys: self.num_keys,
            num_states: self.cells.live_slots() + 1,
            num_leaves: self.num_keys,
            array_len: self.cells.len(),
            tail_len: self.tail.len(),
            tail_garbage: self.tail.garbage(),
            memory_usage: std::mem::size_of::<Self>()
                + self.cells.memory_usage()
                + self.tail.memory_usage(),
            bits_per_key: 0.0,
        };
        stats.calculate_bits_per_key();
        stats
    }
}
