//! Star multiple alignment
//!
//! The first sequence is the star center. Every other sequence is aligned
//! globally against it and the independently gapped copies of the center
//! are merged into one column layout. This is a heuristic: results depend
//! on input order and there is no guide tree.

use crate::align::{self, AlignmentResult, AlignmentType, PairwiseAligner, GAP};
use crate::error::Result;
use crate::scoring::ScoringMatrix;
use crate::types::Sequence;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Rows of equal length plus a per-column majority consensus.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultipleAlignmentResult {
    /// Input ids in input order
    pub ids: Vec<String>,
    pub aligned_sequences: Vec<String>,
    pub consensus: String,
    /// Sum of the pairwise scores against the center
    pub total_score: i64,
}

impl MultipleAlignmentResult {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.aligned_sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_sequences.is_empty()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.consensus.len()
    }

    /// Classic sum-of-pairs score over every pair of rows. Columns where
    /// both rows hold a gap are skipped; gap runs are scored affinely per
    /// pair.
    pub fn sum_of_pairs_score(&self, scoring: &ScoringMatrix) -> i64 {
        let rows: Vec<&[u8]> = self.aligned_sequences.iter().map(|s| s.as_bytes()).collect();
        let mut total = 0i64;

        for (r, first) in rows.iter().enumerate() {
            for second in &rows[r + 1..] {
                total += pair_score(first, second, scoring);
            }
        }
        total
    }

    /// Per column, the fraction of rows whose symbol equals the consensus.
    pub fn column_conservation(&self) -> Vec<f64> {
        if self.aligned_sequences.is_empty() {
            return Vec::new();
        }
        let rows = self.aligned_sequences.len() as f64;

        self.consensus
            .bytes()
            .enumerate()
            .map(|(column, symbol)| {
                let agreeing = self
                    .aligned_sequences
                    .iter()
                    .filter(|row| row.as_bytes()[column].eq_ignore_ascii_case(&symbol))
                    .count();
                agreeing as f64 / rows
            })
            .collect()
    }
}

fn pair_score(first: &[u8], second: &[u8], scoring: &ScoringMatrix) -> i64 {
    let mut score = 0i64;
    let mut gap_in_first = false;
    let mut gap_in_second = false;

    for (&a, &b) in first.iter().zip(second) {
        match (a == GAP, b == GAP) {
            (true, true) => continue,
            (true, false) => {
                score += i64::from(if gap_in_first { scoring.gap_extend } else { scoring.gap_open });
                gap_in_first = true;
                gap_in_second = false;
            }
            (false, true) => {
                score += i64::from(if gap_in_second { scoring.gap_extend } else { scoring.gap_open });
                gap_in_second = true;
                gap_in_first = false;
            }
            (false, false) => {
                score += i64::from(scoring.score_pair(a, b));
                gap_in_first = false;
                gap_in_second = false;
            }
        }
    }
    score
}

/// Star aligner built on the pairwise engine.
#[derive(Debug, Clone, Default)]
pub struct MultipleAligner {
    aligner: PairwiseAligner,
}

impl MultipleAligner {
    pub fn new(scoring: ScoringMatrix) -> Self {
        Self {
            aligner: PairwiseAligner::new(scoring),
        }
    }

    /// Align raw sequences; rows are named `seq1`, `seq2`, ...
    ///
    /// The consensus is upper-cased except for a single input, which is
    /// returned unchanged as its own consensus.
    pub fn align<S>(&self, sequences: &[S]) -> Result<MultipleAlignmentResult>
    where
        S: AsRef<[u8]> + Sync,
    {
        let ids = (1..=sequences.len()).map(|i| format!("seq{}", i)).collect();
        self.align_with_ids(sequences, ids)
    }

    /// Align validated sequences, keeping their ids.
    pub fn align_sequences(&self, sequences: &[Sequence]) -> Result<MultipleAlignmentResult> {
        let ids = sequences.iter().map(|s| s.id().to_string()).collect();
        self.align_with_ids(sequences, ids)
    }

    fn align_with_ids<S>(&self, sequences: &[S], ids: Vec<String>) -> Result<MultipleAlignmentResult>
    where
        S: AsRef<[u8]> + Sync,
    {
        let Some((center, others)) = sequences.split_first() else {
            return Ok(MultipleAlignmentResult::default());
        };
        let center = center.as_ref();
        align::validate("sequences[0]", center)?;

        log::debug!(
            "star alignment of {} sequences, center length {}",
            sequences.len(),
            center.len()
        );

        // Independent pairwise alignments; collect keeps input order
        let pairwise: Vec<AlignmentResult> = others
            .par_iter()
            .map(|other| self.aligner.align(center, other, AlignmentType::Global))
            .collect::<Result<_>>()?;

        let slots = insertion_slots(center.len(), &pairwise);
        let width = slots.iter().sum::<usize>() + center.len();

        let mut rows = Vec::with_capacity(sequences.len());
        rows.push(project(center.iter().map(|&c| (c, c)), &slots, width));
        for result in &pairwise {
            rows.push(project(result.columns(), &slots, width));
        }

        // A lone sequence is its own consensus, case included
        let consensus = if pairwise.is_empty() {
            center.to_vec()
        } else {
            consensus(&rows, width)
        };
        let total_score = pairwise.iter().map(|r| i64::from(r.score)).sum();

        Ok(MultipleAlignmentResult {
            ids,
            aligned_sequences: rows.into_iter().map(into_string).collect(),
            consensus: into_string(consensus),
            total_score,
        })
    }
}

/// For each center slot `p` (before residue `p`, or trailing when
/// `p == len`), the largest number of gaps any pairwise alignment put into
/// the center there.
fn insertion_slots(center_len: usize, pairwise: &[AlignmentResult]) -> Vec<usize> {
    let mut slots = vec![0usize; center_len + 1];

    for result in pairwise {
        let mut gaps = vec![0usize; center_len + 1];
        let mut position = 0;
        for symbol in result.aligned_seq1.bytes() {
            if symbol == GAP {
                gaps[position] += 1;
            } else {
                position += 1;
            }
        }
        for (slot, count) in slots.iter_mut().zip(gaps) {
            *slot = (*slot).max(count);
        }
    }
    slots
}

/// Re-project one pairwise alignment (center, other) onto the merged
/// layout. Residues the other sequence inserts inside a slot are
/// left-justified and padded with gaps.
fn project<I>(columns: I, slots: &[usize], width: usize) -> Vec<u8>
where
    I: Iterator<Item = (u8, u8)>,
{
    let mut row = Vec::with_capacity(width);
    let mut pending = Vec::new();
    let mut position = 0;

    for (center, other) in columns {
        if center == GAP {
            pending.push(other);
        } else {
            flush_slot(&mut row, &mut pending, slots[position]);
            row.push(other);
            position += 1;
        }
    }
    flush_slot(&mut row, &mut pending, slots[position]);

    row
}

fn flush_slot(row: &mut Vec<u8>, pending: &mut Vec<u8>, slot: usize) {
    let padding = slot - pending.len();
    row.append(pending);
    row.resize(row.len() + padding, GAP);
}

/// Majority symbol per column, upper-cased. Gaps may win; ties go to the
/// symbol seen first in row order.
fn consensus(rows: &[Vec<u8>], width: usize) -> Vec<u8> {
    let mut consensus = Vec::with_capacity(width);
    let mut counts: Vec<(u8, usize)> = Vec::new();

    for column in 0..width {
        counts.clear();
        for row in rows {
            let symbol = row[column].to_ascii_uppercase();
            match counts.iter_mut().find(|(s, _)| *s == symbol) {
                Some((_, count)) => *count += 1,
                None => counts.push((symbol, 1)),
            }
        }

        let mut best = counts[0];
        for &candidate in &counts[1..] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        consensus.push(best.0);
    }
    consensus
}

// Rows are built from validated ASCII input
fn into_string(bytes: Vec<u8>) -> String {
    bytes.into_iter().map(char::from).collect()
}
