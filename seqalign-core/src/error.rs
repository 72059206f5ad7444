//! Error taxonomy for the alignment core

use crate::types::Alphabet;
use thiserror::Error;

/// Errors reported by the alignment engines and the matching substrate.
///
/// Numeric edge cases (empty sequences, negative optimal scores, traceback
/// ties) are defined behaviour and never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Invalid symbol '{symbol}' at position {position} for {alphabet} alphabet")]
    InvalidSymbol {
        symbol: char,
        position: usize,
        alphabet: Alphabet,
    },

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Alignment cancelled")]
    Cancelled,
}

impl AlignError {
    pub fn invalid_argument<A: Into<String>, R: Into<String>>(argument: A, reason: R) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// True for the cooperative-cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for alignment operations
pub type Result<T> = std::result::Result<T, AlignError>;
