//! Scoring configuration for the alignment engines
//!
//! All values are signed and added to the running score, so penalties are
//! normally negative. A gap run of length `L` contributes
//! `gap_open + (L - 1) * gap_extend`.

use crate::substitution::SubstitutionMatrix;

/// Match/mismatch scalars plus an affine gap model, optionally backed by a
/// substitution matrix.
///
/// No sign constraints are enforced; a configuration where extending a gap
/// costs more than opening one is unusual but well-defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringMatrix {
    /// Reward for identical symbols
    pub match_score: i32,
    /// Score for differing symbols
    pub mismatch: i32,
    /// Score for the first symbol of a gap run
    pub gap_open: i32,
    /// Score for each further symbol of a gap run
    pub gap_extend: i32,
    /// When present, replaces `match_score`/`mismatch` for symbol pairs
    pub substitution: Option<SubstitutionMatrix>,
}

impl Default for ScoringMatrix {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch: -1,
            gap_open: -2,
            gap_extend: -1,
            substitution: None,
        }
    }
}

impl ScoringMatrix {
    pub fn new(match_score: i32, mismatch: i32, gap_open: i32, gap_extend: i32) -> Self {
        Self {
            match_score,
            mismatch,
            gap_open,
            gap_extend,
            substitution: None,
        }
    }

    /// Linear gap model: every gap symbol costs `gap`.
    pub fn simple(match_score: i32, mismatch: i32, gap: i32) -> Self {
        Self::new(match_score, mismatch, gap, gap)
    }

    /// blastn-style nucleotide scoring.
    pub fn dna_blastn() -> Self {
        Self::new(2, -3, -5, -2)
    }

    /// BLOSUM62 with the customary protein gap costs.
    pub fn protein_blosum62() -> Self {
        Self::new(1, -1, -11, -1).with_substitution(SubstitutionMatrix::blosum62())
    }

    pub fn with_substitution(mut self, matrix: SubstitutionMatrix) -> Self {
        self.substitution = Some(matrix);
        self
    }

    /// Score for aligning `a` against `b`.
    #[inline]
    pub fn score_pair(&self, a: u8, b: u8) -> i32 {
        match &self.substitution {
            Some(matrix) => matrix.score(a, b),
            None if a.eq_ignore_ascii_case(&b) => self.match_score,
            None => self.mismatch,
        }
    }

    /// Total score of a single gap run of `len` symbols.
    pub fn gap_cost(&self, len: usize) -> i32 {
        if len == 0 {
            return 0;
        }
        let extensions = i32::try_from(len - 1).unwrap_or(i32::MAX);
        self.gap_open
            .saturating_add(self.gap_extend.saturating_mul(extensions))
    }

    /// Similarity predicate used for alignment statistics: a positive
    /// substitution score when a matrix is configured, never otherwise.
    pub fn is_similar(&self, a: u8, b: u8) -> bool {
        self.substitution
            .as_ref()
            .map_or(false, |matrix| matrix.is_similar(a, b))
    }

    pub fn is_symmetric(&self) -> bool {
        self.substitution
            .as_ref()
            .map_or(true, SubstitutionMatrix::is_symmetric)
    }
}
