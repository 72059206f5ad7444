//! Exact and approximate matching substrate
//!
//! [`SuffixTree`] answers exact substring queries in time proportional to
//! the pattern; [`approximate`] adds Hamming and edit-distance search;
//! [`kmer`] packs nucleotide k-mers for counting and pre-filtering.

pub mod approximate;
pub mod kmer;
pub mod suffix_tree;

pub use approximate::{
    count_approximate, edit_distance, find_approximate, hamming_distance, ApproximateMatch, Metric,
};
pub use suffix_tree::SuffixTree;

use crate::error::{AlignError, Result};
use kmer::{kmer_positions, MAX_K};
use std::collections::HashSet;

/// Cheap screen run before a full alignment: the share of the query's
/// k-mers that occur exactly in the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KmerPrefilter {
    pub k: usize,
    pub min_shared_fraction: f64,
}

impl Default for KmerPrefilter {
    fn default() -> Self {
        Self {
            k: 11,
            min_shared_fraction: 0.1,
        }
    }
}

impl KmerPrefilter {
    pub fn new(k: usize, min_shared_fraction: f64) -> Result<Self> {
        if k == 0 {
            return Err(AlignError::invalid_argument("k", "must be positive"));
        }
        if !(0.0..=1.0).contains(&min_shared_fraction) {
            return Err(AlignError::invalid_argument(
                "min_shared_fraction",
                format!("must be within [0, 1], got {}", min_shared_fraction),
            ));
        }
        Ok(Self {
            k,
            min_shared_fraction,
        })
    }

    /// Fraction of query windows of length `k` found in `target`, or
    /// `None` when the query is shorter than `k`.
    pub fn shared_fraction<Q, T>(&self, query: &Q, target: &T) -> Option<f64>
    where
        Q: AsRef<[u8]> + ?Sized,
        T: AsRef<[u8]> + ?Sized,
    {
        let query = query.as_ref();
        if self.k == 0 || query.len() < self.k {
            return None;
        }

        let target = target.as_ref();
        let windows = query.len() - self.k + 1;
        let shared = match self.shared_packed(query, target) {
            Some(shared) => shared,
            None => {
                let index = SuffixTree::new(target);
                query
                    .windows(self.k)
                    .filter(|window| index.contains(*window).unwrap_or(false))
                    .count()
            }
        };

        Some(shared as f64 / windows as f64)
    }

    /// Shared window count via 2-bit packed k-mers. Only applies when both
    /// sequences are plain ACGT and `k` fits a `u64`.
    fn shared_packed(&self, query: &[u8], target: &[u8]) -> Option<usize> {
        let plain = |s: &[u8]| s.iter().all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T'));
        if self.k > MAX_K || !plain(query) || !plain(target) {
            return None;
        }

        let target_kmers: HashSet<u64> = kmer_positions(target, self.k, false)
            .ok()?
            .into_iter()
            .map(|(_, hash)| hash)
            .collect();
        let shared = kmer_positions(query, self.k, false)
            .ok()?
            .into_iter()
            .filter(|(_, hash)| target_kmers.contains(hash))
            .count();
        Some(shared)
    }

    /// Whether the pair is worth aligning. Queries shorter than `k` cannot
    /// be screened and always pass.
    pub fn passes<Q, T>(&self, query: &Q, target: &T) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
        T: AsRef<[u8]> + ?Sized,
    {
        match self.shared_fraction(query, target) {
            Some(fraction) => {
                let passed = fraction >= self.min_shared_fraction;
                if !passed {
                    log::debug!(
                        "prefilter rejected pair: {:.3} shared {}-mers (< {:.3})",
                        fraction,
                        self.k,
                        self.min_shared_fraction
                    );
                }
                passed
            }
            None => true,
        }
    }
}
