//! Sequence file input
//!
//! Parsers are feature-gated so the alignment core can be built without
//! any file-format dependencies.

#[cfg(feature = "io-fasta")] pub mod fasta;

#[cfg(feature = "io-fasta")] pub use fasta::{read_sequences, read_sequences_from, write_record, FastaError, FastaResult};
