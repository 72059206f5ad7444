//! Alphabets and validated sequences

use crate::error::{AlignError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Symbol set a [`Sequence`] is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
}

impl Alphabet {
    /// Case-insensitive membership test
    pub fn contains(&self, symbol: u8) -> bool {
        let s = symbol.to_ascii_uppercase();
        match self {
            Alphabet::Dna => matches!(s, b'A' | b'C' | b'G' | b'T') || is_iupac_ambiguity(s),
            Alphabet::Rna => matches!(s, b'A' | b'C' | b'G' | b'U') || is_iupac_ambiguity(s),
            Alphabet::Protein => matches!(
                s,
                b'A' | b'R' | b'N' | b'D' | b'C' | b'Q' | b'E' | b'G' | b'H' | b'I'
                    | b'L' | b'K' | b'M' | b'F' | b'P' | b'S' | b'T' | b'W' | b'Y' | b'V'
                    | b'B' | b'Z' | b'J' | b'U' | b'O' | b'X' | b'*'
            ),
        }
    }

    pub fn is_nucleotide(&self) -> bool {
        matches!(self, Alphabet::Dna | Alphabet::Rna)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alphabet::Dna => write!(f, "DNA"),
            Alphabet::Rna => write!(f, "RNA"),
            Alphabet::Protein => write!(f, "protein"),
        }
    }
}

fn is_iupac_ambiguity(symbol: u8) -> bool {
    matches!(
        symbol,
        b'N' | b'R' | b'Y' | b'S' | b'W' | b'K' | b'M' | b'B' | b'D' | b'H' | b'V'
    )
}

/// An immutable, alphabet-validated biological sequence.
///
/// Symbols are stored upper-cased. There are no mutating methods;
/// transformations such as [`Sequence::reverse_complement`] return new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    id: String,
    alphabet: Alphabet,
    data: Vec<u8>,
}

impl Sequence {
    /// Validate `data` against `alphabet`. Empty data is valid.
    pub fn new<I: Into<String>, D: AsRef<[u8]>>(id: I, data: D, alphabet: Alphabet) -> Result<Self> {
        let data = data.as_ref();
        if let Some(position) = data.iter().position(|&b| !alphabet.contains(b)) {
            return Err(AlignError::InvalidSymbol {
                symbol: char::from(data[position]),
                position,
                alphabet,
            });
        }

        Ok(Self {
            id: id.into(),
            alphabet,
            data: data.to_ascii_uppercase(),
        })
    }

    pub fn dna<I: Into<String>, D: AsRef<[u8]>>(id: I, data: D) -> Result<Self> {
        Self::new(id, data, Alphabet::Dna)
    }

    pub fn rna<I: Into<String>, D: AsRef<[u8]>>(id: I, data: D) -> Result<Self> {
        Self::new(id, data, Alphabet::Rna)
    }

    pub fn protein<I: Into<String>, D: AsRef<[u8]>>(id: I, data: D) -> Result<Self> {
        Self::new(id, data, Alphabet::Protein)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reverse complement for nucleotide sequences; IUPAC codes are
    /// complemented too.
    pub fn reverse_complement(&self) -> Result<Self> {
        if !self.alphabet.is_nucleotide() {
            return Err(AlignError::invalid_argument(
                "alphabet",
                "reverse complement requires a nucleotide sequence",
            ));
        }

        let rna = self.alphabet == Alphabet::Rna;
        let data = self
            .data
            .iter()
            .rev()
            .map(|&base| complement(base, rna))
            .collect();

        Ok(Self {
            id: format!("{}_RC", self.id),
            alphabet: self.alphabet,
            data,
        })
    }

    /// Copy of the half-open `range`, keeping the id and alphabet.
    pub fn subsequence(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.data.len() {
            return Err(AlignError::invalid_argument(
                "range",
                format!("{}..{} outside sequence of length {}", range.start, range.end, self.data.len()),
            ));
        }

        Ok(Self {
            id: self.id.clone(),
            alphabet: self.alphabet,
            data: self.data[range].to_vec(),
        })
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}

fn complement(base: u8, rna: bool) -> u8 {
    match base {
        b'A' if rna => b'U',
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        // S, W and N are self-complementary
        _ => base,
    }
}
