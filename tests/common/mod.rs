//! Reference trie used as an oracle by the integration tests
//!
//! One hash map of children per node, no compression, no cleverness.

#![allow(dead_code)]

use std::collections::HashMap;
use tailtrie::{Result, Trie};

#[derive(Debug, Default)]
struct Node {
    children: HashMap<u8, Node>,
    terminal: bool,
}

/// Map-of-children trie
#[derive(Debug, Default)]
pub struct MapTrie {
    root: Node,
    len: usize,
}

impl MapTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored key, sorted
    pub fn keys(&self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        Self::collect(&self.root, &mut Vec::new(), &mut out);
        out.sort();
        out
    }

    fn collect(node: &Node, prefix: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if node.terminal {
            out.push(prefix.clone());
        }
        for (&byte, child) in &node.children {
            prefix.push(byte);
            Self::collect(child, prefix, out);
            prefix.pop();
        }
    }
}

impl Trie for MapTrie {
    fn insert(&mut self, key: &[u8]) -> Result<bool> {
        let mut node = &mut self.root;
        for &byte in key {
            node = node.children.entry(byte).or_default();
        }
        let inserted = !node.terminal;
        node.terminal = true;
        if inserted {
            self.len += 1;
        }
        Ok(inserted)
    }

    fn contains(&self, key: &[u8]) -> bool {
        let mut node = &self.root;
        for byte in key {
            match node.children.get(byte) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.terminal
    }

    fn remove(&mut self, key: &[u8]) -> bool {
        let mut node = &mut self.root;
        for byte in key {
            node = match node.children.get_mut(byte) {
                Some(child) => child,
                None => return false,
            };
        }
        let removed = node.terminal;
        node.terminal = false;
        if removed {
            self.len -= 1;
        }
        removed
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Sequential keys sharing long prefixes
pub fn generate_sequential_keys(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("key_{:06}", i).into_bytes())
        .collect()
}

/// Keys designed to branch at every depth
pub fn generate_collision_prone_keys() -> Vec<Vec<u8>> {
    let mut keys = Vec::new();
    for i in 0..60 {
        let base = format!("collision_{:02}", i);
        keys.push(format!("{}_variant", base).into_bytes());
        keys.push(format!("{}x", base).into_bytes());
        keys.push(base.into_bytes());
    }
    keys
}

/// Words with heavy prefix overlap
pub fn generate_prefix_keys() -> Vec<Vec<u8>> {
    [
        "app", "apple", "application", "apply", "banana", "band", "bandana", "cat", "catch",
        "dog", "a", "ap", "bachelor", "badge", "jar", "baby", "bach", "badger",
    ]
    .iter()
    .map(|s| s.as_bytes().to_vec())
    .collect()
}
