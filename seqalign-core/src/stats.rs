//! Column-level summary of a pairwise alignment

use crate::align::{AlignmentResult, GAP};
use crate::error::{AlignError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column counts and derived ratios for one alignment.
///
/// Every column is exactly one of match, mismatch or gap, so
/// `matches + mismatches + gaps == alignment_length`. Ratios are fractions
/// in `[0, 1]` and are all zero for an empty alignment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentStatistics {
    pub matches: usize,
    pub mismatches: usize,
    pub gaps: usize,
    /// Mismatch columns accepted by the similarity predicate
    pub similar: usize,
    pub alignment_length: usize,
    pub identity: f64,
    pub similarity: f64,
    /// Fraction of gap columns (`gaps / alignment_length`)
    pub gap_percent: f64,
}

impl AlignmentStatistics {
    pub fn compute(result: &AlignmentResult, similar: Option<&dyn Fn(u8, u8) -> bool>) -> Self {
        Self::tally(result.columns(), similar)
    }

    /// Statistics for two aligned rows that did not come from the engine.
    pub fn from_aligned(
        aligned1: &str,
        aligned2: &str,
        similar: Option<&dyn Fn(u8, u8) -> bool>,
    ) -> Result<Self> {
        if aligned1.len() != aligned2.len() {
            return Err(AlignError::length_mismatch(aligned1.len(), aligned2.len()));
        }
        Ok(Self::tally(aligned1.bytes().zip(aligned2.bytes()), similar))
    }

    fn tally<I>(columns: I, similar: Option<&dyn Fn(u8, u8) -> bool>) -> Self
    where
        I: Iterator<Item = (u8, u8)>,
    {
        let mut stats = Self::default();

        for (a, b) in columns {
            stats.alignment_length += 1;
            if a == GAP || b == GAP {
                stats.gaps += 1;
            } else if a.eq_ignore_ascii_case(&b) {
                stats.matches += 1;
            } else {
                stats.mismatches += 1;
                if similar.map_or(false, |is_similar| is_similar(a, b)) {
                    stats.similar += 1;
                }
            }
        }

        if stats.alignment_length > 0 {
            let length = stats.alignment_length as f64;
            stats.identity = stats.matches as f64 / length;
            stats.similarity = (stats.matches + stats.similar) as f64 / length;
            stats.gap_percent = stats.gaps as f64 / length;
        }

        stats
    }
}

impl fmt::Display for AlignmentStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let length = self.alignment_length;
        writeln!(f, "Length:     {}", length)?;
        writeln!(
            f,
            "Identity:   {}/{} ({:.1}%)",
            self.matches,
            length,
            self.identity * 100.0
        )?;
        writeln!(
            f,
            "Similarity: {}/{} ({:.1}%)",
            self.matches + self.similar,
            length,
            self.similarity * 100.0
        )?;
        write!(
            f,
            "Gaps:       {}/{} ({:.1}%)",
            self.gaps,
            length,
            self.gap_percent * 100.0
        )
    }
}
