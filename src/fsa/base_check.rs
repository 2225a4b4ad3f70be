//! Base/check array pair
//!
//! Two parallel arrays indexed by 1-based node id. For a transition labeled
//! `c` out of node `s`:
//! ```text
//! t = base[s] + c
//! the transition is live iff check[t] == s
//! ```
//! A negative base marks a leaf whose remaining suffix lives in the tail
//! buffer at `-base`. Slot 0 is never addressed. Reads past the allocated
//! length yield 0, and growth zero-fills, so "unallocated" and "free" are the
//! same thing.

use crate::fsa::alphabet::Code;

/// Node id within the base/check arrays
pub type NodeId = u32;

/// Minimum number of slots ever allocated
const MIN_CAPACITY: usize = 16;

/// Parallel base and check arrays of equal length
#[derive(Clone, Default)]
pub struct BaseCheck {
    base: Vec<i32>,
    check: Vec<NodeId>,
}

impl BaseCheck {
    /// Create arrays with `capacity` zeroed slots
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            base: vec![0; capacity],
            check: vec![0; capacity],
        }
    }

    /// Allocated slots (including the unused slot 0)
    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Whether nothing has been allocated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Base value at `pos`, 0 past the allocation
    #[inline]
    pub fn base(&self, pos: NodeId) -> i32 {
        self.base.get(pos as usize).copied().unwrap_or(0)
    }

    /// Check value at `pos`, 0 past the allocation
    #[inline]
    pub fn check(&self, pos: NodeId) -> NodeId {
        self.check.get(pos as usize).copied().unwrap_or(0)
    }

    /// Write base, growing both arrays if needed
    #[inline]
    pub fn set_base(&mut self, pos: NodeId, value: i32) {
        self.ensure_index(pos as usize);
        self.base[pos as usize] = value;
    }

    /// Write check, growing both arrays if needed
    #[inline]
    pub fn set_check(&mut self, pos: NodeId, owner: NodeId) {
        self.ensure_index(pos as usize);
        self.check[pos as usize] = owner;
    }

    /// Zero both arrays at `pos`
    #[inline]
    pub fn clear(&mut self, pos: NodeId) {
        if (pos as usize) < self.len() {
            self.base[pos as usize] = 0;
            self.check[pos as usize] = 0;
        }
    }

    /// Doubling growth keeps both arrays the same length
    fn ensure_index(&mut self, index: usize) {
        if index < self.len() {
            return;
        }
        let new_len = (index + 1).max(self.len() * 2).max(MIN_CAPACITY);
        self.base.resize(new_len, 0);
        self.check.resize(new_len, 0);
    }

    /// Slot reached from a node with the given base via `code`
    ///
    /// `None` when the base is not a positive offset or the sum overflows.
    #[inline]
    pub fn slot(base: i32, code: Code) -> Option<NodeId> {
        if base <= 0 {
            return None;
        }
        (base as NodeId).checked_add(code as NodeId)
    }

    /// Transition slot of `node` for `code`, whether or not it is live
    #[inline]
    pub fn child_slot(&self, node: NodeId, code: Code) -> Option<NodeId> {
        Self::slot(self.base(node), code)
    }

    /// Live child of `node` labeled `code`
    #[inline]
    pub fn child(&self, node: NodeId, code: Code) -> Option<NodeId> {
        self.child_slot(node, code)
            .filter(|&t| self.check(t) == node)
    }

    /// Codes in `1..=max_code` with a live transition out of `node`, ascending
    pub fn find_arcs(&self, node: NodeId, max_code: Code) -> Vec<Code> {
        let base = self.base(node);
        if base <= 0 {
            return Vec::new();
        }
        (1..=max_code)
            .filter(|&code| {
                Self::slot(base, code).map_or(false, |t| self.check(t) == node)
            })
            .collect()
    }

    /// Smallest positive base `q` with `q + c` free for every code in `codes`
    ///
    /// Linear scan from 1. Slots past the allocation count as free, so the
    /// search always terminates.
    pub fn x_check(&self, codes: &[Code]) -> i32 {
        let mut q: i32 = 1;
        loop {
            let fits = codes.iter().all(|&code| {
                Self::slot(q, code).map_or(false, |t| self.check(t) == 0)
            });
            if fits {
                return q;
            }
            q += 1;
        }
    }

    /// Slots currently owned by some parent
    pub fn live_slots(&self) -> usize {
        self.check.iter().filter(|&&owner| owner != 0).count()
    }

    /// Bytes held by both arrays
    pub fn memory_usage(&self) -> usize {
        self.base.capacity() * std::mem::size_of::<i32>()
            + self.check.capacity() * std::mem::size_of::<NodeId>()
    }
}

impl std::fmt::Debug for BaseCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseCheck")
            .field("base", &format!("Vec<i32> len={}", self.base.len()))
            .field("check", &format!("Vec<u32> len={}", self.check.len()))
            .field("live_slots", &self.live_slots())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_past_end_are_zero() {
        let cells = BaseCheck::with_capacity(4);
        assert_eq!(cells.len(), MIN_CAPACITY);
        assert_eq!(cells.base(10_000), 0);
        assert_eq!(cells.check(10_000), 0);
    }

    #[test]
    fn test_set_grows_and_zero_fills() {
        let mut cells = BaseCheck::with_capacity(16);
        cells.set_base(2, 5);
        cells.set_check(2, 1);
        assert_eq!(cells.base(2), 5);
        assert_eq!(cells.check(2), 1);

        cells.set_check(100, 7);
        assert!(cells.len() > 100);
        assert_eq!(cells.check(100), 7);
        assert_eq!(cells.base(100), 0);
        assert_eq!(cells.check(99), 0);
        assert_eq!(cells.base(2), 5);
    }

    #[test]
    fn test_clear() {
        let mut cells = BaseCheck::with_capacity(16);
        cells.set_base(3, -4);
        cells.set_check(3, 1);
        cells.clear(3);
        assert_eq!(cells.base(3), 0);
        assert_eq!(cells.check(3), 0);
        cells.clear(1_000);
    }

    #[test]
    fn test_slot_rejects_leaf_and_empty_bases() {
        assert_eq!(BaseCheck::slot(0, 3), None);
        assert_eq!(BaseCheck::slot(-2, 3), None);
        assert_eq!(BaseCheck::slot(4, 3), Some(7));
    }

    #[test]
    fn test_find_arcs_single() {
        let mut cells = BaseCheck::with_capacity(16);
        cells.set_base(3, 1);
        cells.set_check(3, 1);
        cells.set_base(2, -1);
        cells.set_check(2, 3);

        assert_eq!(cells.find_arcs(3, 255), vec![1]);
    }

    #[test]
    fn test_find_arcs_multiple() {
        let mut cells = BaseCheck::with_capacity(16);
        cells.set_base(1, 1);
        cells.set_base(2, 1);
        cells.set_base(3, -1);
        cells.set_base(4, -12);
        cells.set_base(10, -9);

        cells.set_check(1, 3);
        cells.set_check(2, 1);
        cells.set_check(3, 2);
        cells.set_check(4, 2);
        cells.set_check(10, 1);

        assert_eq!(cells.find_arcs(2, 255), vec![2, 3]);
        assert_eq!(cells.find_arcs(1, 255), vec![1, 9]);
        assert!(cells.find_arcs(3, 255).is_empty());
    }

    #[test]
    fn test_x_check_single_code() {
        let mut cells = BaseCheck::with_capacity(16);
        cells.set_check(1, 3);
        cells.set_check(2, 1);
        cells.set_check(3, 2);
        cells.set_check(4, 2);
        cells.set_check(10, 1);

        assert_eq!(cells.x_check(&[1]), 4);
    }

    #[test]
    fn test_x_check_sibling_set_without_collision() {
        let mut cells = BaseCheck::with_capacity(16);
        cells.set_check(1, 3);
        cells.set_check(2, 1);
        cells.set_check(10, 1);

        assert_eq!(cells.x_check(&[2, 10]), 1);
    }

    #[test]
    fn test_x_check_sibling_set_with_collision() {
        let mut cells = BaseCheck::with_capacity(16);
        cells.set_check(1, 3);
        cells.set_check(2, 1);
        cells.set_check(3, 2);
        cells.set_check(4, 2);
        cells.set_check(10, 1);

        // q=1 hits slot 3, q=2 hits slot 4
        assert_eq!(cells.x_check(&[2, 10]), 3);
    }

    #[test]
    fn test_x_check_matches_brute_force_table() {
        let occupied = [2u32, 3, 5, 6, 7, 11, 13, 14, 20];
        let mut cells = BaseCheck::with_capacity(16);
        for &slot in &occupied {
            cells.set_check(slot, 1);
        }

        let codes = [1u16, 3, 6];
        let expected = (1i32..)
            .find(|&q| {
                codes
                    .iter()
                    .all(|&c| !occupied.contains(&(q as u32 + c as u32)))
            })
            .unwrap();
        assert_eq!(cells.x_check(&codes), expected);
    }

    #[test]
    fn test_live_slots() {
        let mut cells = BaseCheck::with_capacity(16);
        assert_eq!(cells.live_slots(), 0);
        cells.set_check(5, 1);
        cells.set_check(6, 1);
        assert_eq!(cells.live_slots(), 2);
        assert!(cells.memory_usage() >= cells.len() * 8);
    }
}
