//! Pairwise alignment engine
//!
//! Global (Needleman-Wunsch), local (Smith-Waterman) and semi-global
//! alignment under an affine gap model. All three share one Gotoh fill in
//! [`dp`]; only the borders and the traceback start cell differ.
//!
//! Coordinates in [`AlignmentResult`] are 0-based and half-open: the
//! aligned region of sequence 1 is `seq1[start1..end1]`.

mod dp;
mod traceback;

#[cfg(test)]
mod tests;

use crate::cancel::{CancelSignal, NeverCancel};
use crate::error::{AlignError, Result};
use crate::scoring::ScoringMatrix;
use crate::stats::AlignmentStatistics;
use dp::TraceMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gap symbol used in aligned output. Input sequences may not contain it.
pub const GAP: u8 = b'-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentType {
    /// End-to-end over both sequences
    #[default]
    Global,
    /// Best-scoring pair of substrings
    Local,
    /// One sequence end-to-end, the other with unpenalized overhangs
    SemiGlobal,
}

impl fmt::Display for AlignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentType::Global => write!(f, "global"),
            AlignmentType::Local => write!(f, "local"),
            AlignmentType::SemiGlobal => write!(f, "semi-global"),
        }
    }
}

impl FromStr for AlignmentType {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "global" | "nw" => Ok(AlignmentType::Global),
            "local" | "sw" => Ok(AlignmentType::Local),
            "semi-global" | "semiglobal" | "glocal" => Ok(AlignmentType::SemiGlobal),
            other => Err(AlignError::invalid_argument(
                "mode",
                format!("unknown alignment type '{}'", other),
            )),
        }
    }
}

/// Which sequence may overhang for free in semi-global mode.
///
/// With the default, sequence 1 is the query and must be aligned end to
/// end while sequence 2 acts as a reference whose leading and trailing
/// symbols cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FreeEnds {
    Sequence1,
    #[default]
    Sequence2,
}

impl FromStr for FreeEnds {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "seq1" | "sequence1" | "1" => Ok(FreeEnds::Sequence1),
            "seq2" | "sequence2" | "2" => Ok(FreeEnds::Sequence2),
            other => Err(AlignError::invalid_argument(
                "free_ends",
                format!("expected seq1 or seq2, got '{}'", other),
            )),
        }
    }
}

/// Engine options that are not part of the scoring scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignerConfig {
    pub free_ends: FreeEnds,
}

/// Outcome of one pairwise alignment.
///
/// Both aligned strings have the same length. Removing gaps from
/// `aligned_seq1` yields `seq1[start1..end1]`, and likewise for sequence 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub aligned_seq1: String,
    pub aligned_seq2: String,
    pub score: i32,
    pub alignment_type: AlignmentType,
    pub start1: usize,
    pub end1: usize,
    pub start2: usize,
    pub end2: usize,
}

impl AlignmentResult {
    /// Number of alignment columns
    pub fn len(&self) -> usize {
        self.aligned_seq1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_seq1.is_empty()
    }

    /// Iterate over `(symbol1, symbol2)` column pairs.
    pub fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.aligned_seq1
            .bytes()
            .zip(self.aligned_seq2.bytes())
    }

    /// Statistics without a similarity predicate.
    pub fn statistics(&self) -> AlignmentStatistics {
        AlignmentStatistics::compute(self, None)
    }

    /// Statistics counting positive substitution scores as similar.
    pub fn statistics_with(&self, scoring: &ScoringMatrix) -> AlignmentStatistics {
        let similar = |a: u8, b: u8| scoring.is_similar(a, b);
        AlignmentStatistics::compute(self, Some(&similar))
    }

    /// Extended CIGAR string relative to sequence 1: `=` match, `X`
    /// mismatch, `I` gap in sequence 1, `D` gap in sequence 2.
    pub fn cigar(&self) -> String {
        let mut cigar = String::new();
        let mut run: Option<(char, usize)> = None;

        for (a, b) in self.columns() {
            let op = if a == GAP {
                'I'
            } else if b == GAP {
                'D'
            } else if a.eq_ignore_ascii_case(&b) {
                '='
            } else {
                'X'
            };

            run = match run {
                Some((prev, count)) if prev == op => Some((prev, count + 1)),
                Some((prev, count)) => {
                    cigar.push_str(&format!("{}{}", count, prev));
                    Some((op, 1))
                }
                None => Some((op, 1)),
            };
        }

        if let Some((op, count)) = run {
            cigar.push_str(&format!("{}{}", count, op));
        }
        cigar
    }
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (score {})", self.alignment_type, self.score)?;
        writeln!(f, "{}", self.aligned_seq1)?;
        write!(f, "{}", self.aligned_seq2)
    }
}

/// Stateless pairwise aligner holding a scoring scheme. Safe to share
/// across threads; every call allocates its own matrices.
#[derive(Debug, Clone, Default)]
pub struct PairwiseAligner {
    scoring: ScoringMatrix,
    config: AlignerConfig,
}

impl PairwiseAligner {
    pub fn new(scoring: ScoringMatrix) -> Self {
        Self::with_config(scoring, AlignerConfig::default())
    }

    pub fn with_config(scoring: ScoringMatrix, config: AlignerConfig) -> Self {
        Self { scoring, config }
    }

    pub fn scoring(&self) -> &ScoringMatrix {
        &self.scoring
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn align<A, B>(&self, seq1: &A, seq2: &B, mode: AlignmentType) -> Result<AlignmentResult>
    where
        A: AsRef<[u8]> + ?Sized,
        B: AsRef<[u8]> + ?Sized,
    {
        self.align_cancellable(seq1, seq2, mode, &NeverCancel)
    }

    /// Like [`align`](Self::align), polling `signal` once per matrix row.
    pub fn align_cancellable<A, B, S>(
        &self,
        seq1: &A,
        seq2: &B,
        mode: AlignmentType,
        signal: &S,
    ) -> Result<AlignmentResult>
    where
        A: AsRef<[u8]> + ?Sized,
        B: AsRef<[u8]> + ?Sized,
        S: CancelSignal + ?Sized,
    {
        run(seq1.as_ref(), seq2.as_ref(), &self.scoring, &self.config, mode, signal)
    }

    /// Optimal score only, in linear memory.
    pub fn score_only<A, B>(&self, seq1: &A, seq2: &B, mode: AlignmentType) -> Result<i32>
    where
        A: AsRef<[u8]> + ?Sized,
        B: AsRef<[u8]> + ?Sized,
    {
        let (seq1, seq2) = (seq1.as_ref(), seq2.as_ref());
        validate("seq1", seq1)?;
        validate("seq2", seq2)?;
        let outcome = dp::fill(
            seq1,
            seq2,
            &self.scoring,
            mode,
            self.config.free_ends,
            None,
            &NeverCancel,
        )?;
        Ok(outcome.score)
    }

    /// Align many independent pairs in parallel. Results keep input order.
    pub fn align_batch<A, B>(&self, pairs: &[(A, B)], mode: AlignmentType) -> Vec<Result<AlignmentResult>>
    where
        A: AsRef<[u8]> + Sync,
        B: AsRef<[u8]> + Sync,
    {
        log::debug!("aligning batch of {} pairs ({})", pairs.len(), mode);
        pairs
            .par_iter()
            .map(|(seq1, seq2)| self.align(seq1, seq2, mode))
            .collect()
    }
}

/// Align two sequences without constructing an aligner.
pub fn align<A, B>(seq1: &A, seq2: &B, scoring: &ScoringMatrix, mode: AlignmentType) -> Result<AlignmentResult>
where
    A: AsRef<[u8]> + ?Sized,
    B: AsRef<[u8]> + ?Sized,
{
    run(
        seq1.as_ref(),
        seq2.as_ref(),
        scoring,
        &AlignerConfig::default(),
        mode,
        &NeverCancel,
    )
}

fn run<S: CancelSignal + ?Sized>(
    seq1: &[u8],
    seq2: &[u8],
    scoring: &ScoringMatrix,
    config: &AlignerConfig,
    mode: AlignmentType,
    signal: &S,
) -> Result<AlignmentResult> {
    validate("seq1", seq1)?;
    validate("seq2", seq2)?;

    log::debug!("{} alignment of {}x{}", mode, seq1.len(), seq2.len());

    let mut trace = TraceMatrix::new(seq1.len() + 1, seq2.len() + 1);
    let outcome = dp::fill(
        seq1,
        seq2,
        scoring,
        mode,
        config.free_ends,
        Some(&mut trace),
        signal,
    )?;
    log::trace!("traceback from {:?}, score {}", outcome.end, outcome.score);
    let walk = traceback::trace_back(&trace, seq1, seq2, outcome.end);

    Ok(AlignmentResult {
        aligned_seq1: to_string(&walk.aligned1),
        aligned_seq2: to_string(&walk.aligned2),
        score: outcome.score,
        alignment_type: mode,
        start1: walk.start.0,
        end1: outcome.end.0,
        start2: walk.start.1,
        end2: outcome.end.1,
    })
}

/// Inputs must be ASCII and free of the gap symbol.
pub(crate) fn validate(name: &str, seq: &[u8]) -> Result<()> {
    if let Some(position) = seq.iter().position(|&b| b == GAP || !b.is_ascii()) {
        return Err(AlignError::invalid_argument(
            name,
            format!("unexpected symbol 0x{:02x} at position {}", seq[position], position),
        ));
    }
    Ok(())
}

// Inputs are validated as ASCII, so a byte-wise widening is exact.
fn to_string(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
