//! seqalign core library
//!
//! Pairwise alignment (global, local, semi-global) under an affine gap
//! model, star multiple alignment, alignment statistics, and a suffix-tree
//! based exact/approximate matching substrate.

pub mod error;
pub mod types;
pub mod substitution;
pub mod scoring;
pub mod cancel;
pub mod align;
pub mod stats;
pub mod msa;
pub mod matching;
pub mod format;
pub mod io;

// Re-export commonly used types and functions
pub use error::{AlignError, Result};
pub use types::{Alphabet, Sequence};
pub use substitution::SubstitutionMatrix;
pub use scoring::ScoringMatrix;
pub use cancel::{CancelSignal, CancellationToken, NeverCancel};
pub use align::{align, AlignerConfig, AlignmentResult, AlignmentType, FreeEnds, PairwiseAligner, GAP};
pub use stats::AlignmentStatistics;
pub use msa::{MultipleAligner, MultipleAlignmentResult};
pub use matching::{
    count_approximate, edit_distance, find_approximate, hamming_distance, ApproximateMatch, KmerPrefilter,
    Metric, SuffixTree,
};
pub use format::AlignmentFormatter;

/// Version information for the seqalign core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
