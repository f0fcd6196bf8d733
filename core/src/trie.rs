//! Prefix tree for autocomplete.
//!
//! Nodes live in a single arena and refer to their children by index; every
//! node except the root has exactly one parent. Enumeration walks children in
//! ascending character order, so suggestions come out lexicographically.

use std::collections::BTreeMap;

use crate::tokenizer::tokenize;

const ROOT: usize = 0;

#[derive(Debug, Default)]
struct TrieNode {
    terminal: bool,
    children: BTreeMap<char, usize>,
}

#[derive(Debug)]
pub struct TrieEngine {
    nodes: Vec<TrieNode>,
    words: usize,
}

impl Default for TrieEngine {
    fn default() -> Self { Self::new() }
}

impl TrieEngine {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::default()], words: 0 }
    }

    /// Insert a word as given. Returns `false` if it was already present or empty.
    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let mut node = ROOT;
        for c in word.chars() {
            node = match self.nodes[node].children.get(&c) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(c, child);
                    child
                }
            };
        }
        let node = &mut self.nodes[node];
        if node.terminal {
            return false;
        }
        node.terminal = true;
        self.words += 1;
        true
    }

    /// Tokenize `text` and insert every token; returns how many were new.
    pub fn insert_text(&mut self, text: &str) -> usize {
        tokenize(text).iter().filter(|t| self.insert(t)).count()
    }

    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty() && self.find(word).is_some_and(|n| self.nodes[n].terminal)
    }

    /// Every inserted word starting with `prefix`; empty when nothing does.
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.collect(prefix, usize::MAX)
    }

    /// Like [`Self::autocomplete`], keeping only the first `limit` words.
    pub fn autocomplete_limited(&self, prefix: &str, limit: usize) -> Vec<String> {
        self.collect(prefix, limit)
    }

    pub fn len(&self) -> usize { self.words }

    pub fn is_empty(&self) -> bool { self.words == 0 }

    fn find(&self, prefix: &str) -> Option<usize> {
        prefix
            .chars()
            .try_fold(ROOT, |node, c| self.nodes[node].children.get(&c).copied())
    }

    fn collect(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut results = Vec::new();
        if limit == 0 {
            return results;
        }
        let Some(start) = self.find(prefix) else {
            return results;
        };

        let mut stack = vec![(start, prefix.to_string())];
        while let Some((node, word)) = stack.pop() {
            let node = &self.nodes[node];
            // children are pushed in reverse so the smallest is popped first
            for (&c, &child) in node.children.iter().rev() {
                let mut next = word.clone();
                next.push(c);
                stack.push((child, next));
            }
            if node.terminal {
                results.push(word);
                if results.len() == limit {
                    break;
                }
            }
        }
        tracing::debug!(prefix, matches = results.len(), "autocomplete");
        results
    }
}
