//! 2-bit nucleotide k-mers
//!
//! Windows containing a symbol outside ACGT (or U) are skipped, so
//! ambiguity codes split a sequence into independent runs.

use crate::error::{AlignError, Result};
use std::collections::HashMap;

/// Largest k that fits a 2-bit packed `u64`
pub const MAX_K: usize = 32;

/// Encode a nucleotide to 2 bits. `U` is read as `T`.
pub fn encode_nucleotide(nucleotide: u8) -> Option<u64> {
    match nucleotide.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

/// Inverse of the packing used by [`RollingHash`].
pub fn decode_kmer(hash: u64, k: usize) -> Vec<u8> {
    (0..k)
        .rev()
        .map(|i| match (hash >> (2 * i)) & 3 {
            0 => b'A',
            1 => b'C',
            2 => b'G',
            _ => b'T',
        })
        .collect()
}

/// Packed reverse complement: A(0)<->T(3), C(1)<->G(2).
pub fn reverse_complement_hash(hash: u64, k: usize) -> u64 {
    let mut result = 0u64;
    let mut remaining = hash;
    for _ in 0..k {
        result = (result << 2) | (3 - (remaining & 3));
        remaining >>= 2;
    }
    result
}

/// Smaller of a k-mer and its reverse complement
pub fn canonical_kmer(hash: u64, k: usize) -> u64 {
    hash.min(reverse_complement_hash(hash, k))
}

fn check_k(k: usize) -> Result<()> {
    if k == 0 || k > MAX_K {
        return Err(AlignError::invalid_argument(
            "k",
            format!("must be between 1 and {}, got {}", MAX_K, k),
        ));
    }
    Ok(())
}

/// Rolling 2-bit hash over the last `k` valid nucleotides.
#[derive(Debug, Clone)]
pub struct RollingHash {
    k: usize,
    hash: u64,
    mask: u64,
    valid: usize,
}

impl RollingHash {
    pub fn new(k: usize) -> Result<Self> {
        check_k(k)?;
        let mask = if k == MAX_K { u64::MAX } else { (1u64 << (2 * k)) - 1 };
        Ok(Self {
            k,
            hash: 0,
            mask,
            valid: 0,
        })
    }

    /// Shift in one symbol. Returns the hash once `k` consecutive valid
    /// nucleotides have been seen; an invalid symbol restarts the window.
    pub fn push(&mut self, nucleotide: u8) -> Option<u64> {
        match encode_nucleotide(nucleotide) {
            Some(code) => {
                self.hash = ((self.hash << 2) | code) & self.mask;
                self.valid = (self.valid + 1).min(self.k);
                (self.valid == self.k).then_some(self.hash)
            }
            None => {
                self.reset();
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.hash = 0;
        self.valid = 0;
    }
}

/// Start position and packed value of every valid k-mer.
pub fn kmer_positions<S: AsRef<[u8]> + ?Sized>(
    sequence: &S,
    k: usize,
    canonical: bool,
) -> Result<Vec<(usize, u64)>> {
    let mut hasher = RollingHash::new(k)?;
    let sequence = sequence.as_ref();

    Ok(sequence
        .iter()
        .enumerate()
        .filter_map(|(i, &symbol)| {
            hasher.push(symbol).map(|hash| {
                let hash = if canonical { canonical_kmer(hash, k) } else { hash };
                (i + 1 - k, hash)
            })
        })
        .collect())
}

/// Occurrence count of each k-mer.
pub fn count_kmers<S: AsRef<[u8]> + ?Sized>(
    sequence: &S,
    k: usize,
    canonical: bool,
) -> Result<HashMap<u64, u32>> {
    let mut counts = HashMap::new();
    for (_, hash) in kmer_positions(sequence, k, canonical)? {
        *counts.entry(hash).or_insert(0) += 1;
    }
    Ok(counts)
}
