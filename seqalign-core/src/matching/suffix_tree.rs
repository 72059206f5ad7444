//! Suffix tree built with Ukkonen's online algorithm
//!
//! Nodes live in an arena and refer to each other by index. Edge labels
//! are `[start, end)` ranges into the text; leaves keep an open end while
//! the tree grows. Symbols are widened to `u16` so the terminator sits
//! outside the byte range. Text and patterns are compared ASCII
//! case-insensitively.

use crate::error::{AlignError, Result};
use std::collections::BTreeMap;
use std::ops::Range;

const TERMINATOR: u16 = 256;
const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node {
    start: usize,
    /// `None` while the node is a leaf under construction
    end: Option<usize>,
    suffix_link: usize,
    children: BTreeMap<u16, usize>,
    /// Label length from the root to the end of this node's edge
    depth: usize,
    /// Leaves in this subtree
    leaf_count: usize,
    /// Smallest suffix start in this subtree
    first_suffix: usize,
}

impl Node {
    fn new(start: usize, end: Option<usize>) -> Self {
        Self {
            start,
            end,
            suffix_link: ROOT,
            children: BTreeMap::new(),
            depth: 0,
            leaf_count: 0,
            first_suffix: usize::MAX,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Generalized substring index over one text.
#[derive(Debug, Clone)]
pub struct SuffixTree {
    text: Vec<u16>,
    nodes: Vec<Node>,
}

impl SuffixTree {
    /// Build the tree in O(n) time and nodes.
    pub fn new<T: AsRef<[u8]> + ?Sized>(text: &T) -> Self {
        let text: Vec<u16> = text
            .as_ref()
            .iter()
            .map(|&b| u16::from(b.to_ascii_uppercase()))
            .chain(std::iter::once(TERMINATOR))
            .collect();

        let mut tree = Self {
            text,
            nodes: vec![Node::new(0, Some(0))],
        };
        tree.build();
        tree.annotate();

        log::debug!(
            "suffix tree over {} symbols: {} nodes",
            tree.text.len() - 1,
            tree.nodes.len()
        );
        tree
    }

    /// Length of the indexed text, terminator excluded
    pub fn text_len(&self) -> usize {
        self.text.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_length(&self, node: usize, position: usize) -> usize {
        let n = &self.nodes[node];
        n.end.unwrap_or(position + 1) - n.start
    }

    fn add_node(&mut self, start: usize, end: Option<usize>) -> usize {
        self.nodes.push(Node::new(start, end));
        self.nodes.len() - 1
    }

    fn build(&mut self) {
        let mut active_node = ROOT;
        let mut active_edge = 0usize;
        let mut active_length = 0usize;
        let mut remaining = 0usize;

        for i in 0..self.text.len() {
            remaining += 1;
            let mut last_internal: Option<usize> = None;
            let symbol = self.text[i];

            while remaining > 0 {
                if active_length == 0 {
                    active_edge = i;
                }
                let edge_symbol = self.text[active_edge];

                match self.nodes[active_node].children.get(&edge_symbol).copied() {
                    None => {
                        let leaf = self.add_node(i, None);
                        self.nodes[active_node].children.insert(edge_symbol, leaf);
                        if let Some(internal) = last_internal.take() {
                            self.nodes[internal].suffix_link = active_node;
                        }
                    }
                    Some(next) => {
                        let length = self.edge_length(next, i);
                        if active_length >= length {
                            // walk down
                            active_edge += length;
                            active_length -= length;
                            active_node = next;
                            continue;
                        }

                        if self.text[self.nodes[next].start + active_length] == symbol {
                            // already present: extension ends this phase
                            if active_node != ROOT {
                                if let Some(internal) = last_internal.take() {
                                    self.nodes[internal].suffix_link = active_node;
                                }
                            }
                            active_length += 1;
                            break;
                        }

                        let split_start = self.nodes[next].start;
                        let split = self.add_node(split_start, Some(split_start + active_length));
                        self.nodes[active_node].children.insert(edge_symbol, split);

                        let leaf = self.add_node(i, None);
                        self.nodes[split].children.insert(symbol, leaf);

                        self.nodes[next].start += active_length;
                        let next_symbol = self.text[self.nodes[next].start];
                        self.nodes[split].children.insert(next_symbol, next);

                        if let Some(internal) = last_internal.replace(split) {
                            self.nodes[internal].suffix_link = split;
                        }
                    }
                }

                remaining -= 1;
                if active_node == ROOT && active_length > 0 {
                    active_length -= 1;
                    active_edge = i + 1 - remaining;
                } else if active_node != ROOT {
                    active_node = self.nodes[active_node].suffix_link;
                }
            }
        }

        let total = self.text.len();
        for node in self.nodes.iter_mut().skip(1) {
            if node.end.is_none() {
                node.end = Some(total);
            }
        }
    }

    /// Fill depth, leaf counts and first suffix positions.
    fn annotate(&mut self) {
        let total = self.text.len();
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];

        while let Some(node) = stack.pop() {
            order.push(node);
            let depth = self.nodes[node].depth;
            let children: Vec<usize> = self.nodes[node].children.values().copied().collect();
            for child in children {
                let edge = self.edge_length(child, total);
                self.nodes[child].depth = depth + edge;
                stack.push(child);
            }
        }

        // children before parents
        for &node in order.iter().rev() {
            if self.nodes[node].is_leaf() {
                let suffix = total - self.nodes[node].depth;
                let leaf = &mut self.nodes[node];
                leaf.leaf_count = 1;
                leaf.first_suffix = suffix;
            } else {
                let (count, first) = self.nodes[node]
                    .children
                    .values()
                    .fold((0, usize::MAX), |(count, first), &child| {
                        let c = &self.nodes[child];
                        (count + c.leaf_count, first.min(c.first_suffix))
                    });
                self.nodes[node].leaf_count = count;
                self.nodes[node].first_suffix = first;
            }
        }
    }

    /// Node whose subtree holds every occurrence of `pattern`.
    fn locate(&self, pattern: &[u8]) -> Result<Option<usize>> {
        if pattern.is_empty() {
            return Err(AlignError::invalid_argument("pattern", "must not be empty"));
        }

        let mut node = ROOT;
        let mut matched = 0;
        while matched < pattern.len() {
            let symbol = u16::from(pattern[matched].to_ascii_uppercase());
            let Some(&child) = self.nodes[node].children.get(&symbol) else {
                return Ok(None);
            };

            let (start, end) = (self.nodes[child].start, self.nodes[child].end.unwrap_or(self.text.len()));
            for &label in &self.text[start..end] {
                if matched == pattern.len() {
                    break;
                }
                if label != u16::from(pattern[matched].to_ascii_uppercase()) {
                    return Ok(None);
                }
                matched += 1;
            }
            node = child;
        }
        Ok(Some(node))
    }

    pub fn contains<P: AsRef<[u8]> + ?Sized>(&self, pattern: &P) -> Result<bool> {
        Ok(self.locate(pattern.as_ref())?.is_some())
    }

    /// Number of (possibly overlapping) occurrences
    pub fn count<P: AsRef<[u8]> + ?Sized>(&self, pattern: &P) -> Result<usize> {
        Ok(self
            .locate(pattern.as_ref())?
            .map_or(0, |node| self.nodes[node].leaf_count))
    }

    /// Start positions of every occurrence, ascending.
    pub fn find_all<P: AsRef<[u8]> + ?Sized>(&self, pattern: &P) -> Result<Vec<usize>> {
        let Some(top) = self.locate(pattern.as_ref())? else {
            return Ok(Vec::new());
        };

        let total = self.text.len();
        let mut positions = Vec::with_capacity(self.nodes[top].leaf_count);
        let mut stack = vec![top];
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node];
            if n.is_leaf() {
                positions.push(total - n.depth);
            } else {
                stack.extend(n.children.values().copied());
            }
        }
        positions.sort_unstable();
        Ok(positions)
    }

    /// Longest substring occurring at least twice, as a range into the
    /// text. Ties go to the repeat that occurs first.
    pub fn longest_repeat(&self) -> Option<Range<usize>> {
        let mut best: Option<&Node> = None;
        for node in self.nodes.iter().skip(1).filter(|n| !n.is_leaf()) {
            best = match best {
                Some(current)
                    if current.depth > node.depth
                        || (current.depth == node.depth && current.first_suffix <= node.first_suffix) =>
                {
                    Some(current)
                }
                _ => Some(node),
            };
        }
        best.map(|node| node.first_suffix..node.first_suffix + node.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_find(text: &str, pattern: &str) -> Vec<usize> {
        let (t, p) = (text.as_bytes(), pattern.as_bytes());
        if p.len() > t.len() {
            return Vec::new();
        }
        (0..=t.len() - p.len())
            .filter(|&i| t[i..i + p.len()].eq_ignore_ascii_case(p))
            .collect()
    }

    #[test]
    fn test_banana() {
        let tree = SuffixTree::new("banana");
        assert_eq!(tree.find_all("ana").unwrap(), vec![1, 3]);
        assert_eq!(tree.count("a").unwrap(), 3);
        assert_eq!(tree.count("nab").unwrap(), 0);
        assert!(tree.contains("banana").unwrap());
        assert!(!tree.contains("bananas").unwrap());
        assert_eq!(tree.longest_repeat(), Some(1..4));
    }

    #[test]
    fn test_matches_naive_scan() {
        let text = "GATTACAGATTACATTAGACCAGATTA";
        let tree = SuffixTree::new(text);
        for pattern in ["GATTA", "TTA", "A", "CAG", "AGAT", "TTT", "GATTACAGATTACATTAGACCAGATTA"] {
            assert_eq!(tree.find_all(pattern).unwrap(), naive_find(text, pattern), "{}", pattern);
            assert_eq!(tree.count(pattern).unwrap(), naive_find(text, pattern).len());
        }
    }

    #[test]
    fn test_homopolymer() {
        let tree = SuffixTree::new("AAAAAA");
        assert_eq!(tree.find_all("AAAA").unwrap(), vec![0, 1, 2]);
        assert_eq!(tree.longest_repeat(), Some(0..5));
    }

    #[test]
    fn test_case_insensitive() {
        let tree = SuffixTree::new("acgtACGT");
        assert_eq!(tree.find_all("ACGT").unwrap(), vec![0, 4]);
        assert_eq!(tree.find_all("cg").unwrap(), vec![1, 5]);
    }

    #[test]
    fn test_empty_text_and_pattern() {
        let tree = SuffixTree::new("");
        assert_eq!(tree.text_len(), 0);
        assert!(!tree.contains("A").unwrap());
        assert!(tree.longest_repeat().is_none());

        let tree = SuffixTree::new("ACGT");
        assert!(matches!(tree.count(""), Err(AlignError::InvalidArgument { .. })));
    }

    #[test]
    fn test_no_repeat() {
        assert!(SuffixTree::new("ACGT").longest_repeat().is_none());
    }

    #[test]
    fn test_node_count_is_linear() {
        let text = "ACGT".repeat(100);
        let tree = SuffixTree::new(&text);
        assert!(tree.node_count() <= 2 * (text.len() + 1));
    }
}
