//! Substitution matrices
//!
//! Named score tables resolving every ordered symbol pair in O(1) through a
//! 256-entry byte index. Symbols missing from a table score the table's
//! minimum, so lookups never fail.

use crate::error::{AlignError, Result};

const ABSENT: u8 = u8::MAX;

/// A named, square substitution score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    name: String,
    symbols: Vec<u8>,
    scores: Vec<i32>,
    index: Vec<u8>,
    min_score: i32,
}

impl SubstitutionMatrix {
    /// Build a matrix from an ordered symbol list and a row-major score table.
    pub fn from_table<N: Into<String>>(name: N, symbols: &[u8], scores: Vec<i32>) -> Result<Self> {
        let dim = symbols.len();
        if dim == 0 || dim >= ABSENT as usize {
            return Err(AlignError::invalid_argument(
                "symbols",
                format!("matrix must have between 1 and {} symbols", ABSENT as usize - 1),
            ));
        }
        if scores.len() != dim * dim {
            return Err(AlignError::invalid_argument(
                "scores",
                format!("expected {} cells for {} symbols, got {}", dim * dim, dim, scores.len()),
            ));
        }

        let mut index = vec![ABSENT; 256];
        for (i, &symbol) in symbols.iter().enumerate() {
            let key = symbol.to_ascii_uppercase() as usize;
            if index[key] != ABSENT {
                return Err(AlignError::invalid_argument(
                    "symbols",
                    format!("duplicate symbol '{}'", char::from(symbol)),
                ));
            }
            index[key] = i as u8;
            index[symbol.to_ascii_lowercase() as usize] = i as u8;
        }

        let min_score = scores.iter().copied().min().unwrap_or(0);
        Ok(Self {
            name: name.into(),
            symbols: symbols.iter().map(|s| s.to_ascii_uppercase()).collect(),
            scores,
            index,
            min_score,
        })
    }

    /// Parse NCBI-style matrix text.
    ///
    /// Lines starting with `#` are comments. The first remaining line lists
    /// the column symbols; each following line is a row symbol followed by one
    /// integer per column.
    pub fn parse<N: Into<String>>(name: N, text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let header: Vec<u8> = match lines.next() {
            Some(line) => line
                .split_whitespace()
                .map(parse_symbol)
                .collect::<Result<_>>()?,
            None => {
                return Err(AlignError::invalid_argument("matrix", "no header row"));
            }
        };

        let dim = header.len();
        let mut scores = vec![0i32; dim * dim];
        let mut seen = vec![false; dim];

        for line in lines {
            let mut fields = line.split_whitespace();
            let row_symbol = match fields.next() {
                Some(field) => parse_symbol(field)?,
                None => continue,
            };
            let row = header
                .iter()
                .position(|s| s.eq_ignore_ascii_case(&row_symbol))
                .ok_or_else(|| {
                    AlignError::invalid_argument(
                        "matrix",
                        format!("row symbol '{}' missing from header", char::from(row_symbol)),
                    )
                })?;

            let values: Vec<i32> = fields
                .map(|f| {
                    f.parse::<i32>().map_err(|_| {
                        AlignError::invalid_argument("matrix", format!("non-integer cell '{}'", f))
                    })
                })
                .collect::<Result<_>>()?;
            if values.len() != dim {
                return Err(AlignError::invalid_argument(
                    "matrix",
                    format!(
                        "row '{}' has {} values, expected {}",
                        char::from(row_symbol),
                        values.len(),
                        dim
                    ),
                ));
            }

            scores[row * dim..(row + 1) * dim].copy_from_slice(&values);
            seen[row] = true;
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(AlignError::invalid_argument(
                "matrix",
                format!("missing row for symbol '{}'", char::from(header[missing])),
            ));
        }

        Self::from_table(name, &header, scores)
    }

    /// Resolve a built-in matrix by name (case-insensitive).
    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().replace(|c: char| matches!(c, '.' | '-' | '_'), "").as_str() {
            "BLOSUM62" => Ok(Self::blosum62()),
            "PAM250" => Ok(Self::pam250()),
            "NUC44" => Ok(Self::nuc44()),
            _ => Err(AlignError::invalid_argument(
                "matrix",
                format!("unknown substitution matrix '{}' (expected BLOSUM62, PAM250 or NUC.4.4)", name),
            )),
        }
    }

    /// NCBI BLOSUM62.
    pub fn blosum62() -> Self {
        Self::builtin("BLOSUM62", AMINO_ACIDS, &BLOSUM62)
    }

    /// Dayhoff PAM250.
    pub fn pam250() -> Self {
        Self::builtin("PAM250", AMINO_ACIDS, &PAM250)
    }

    /// NCBI NUC.4.4 nucleotide matrix with IUPAC ambiguity codes. `U` scores as `T`.
    pub fn nuc44() -> Self {
        let mut matrix = Self::builtin("NUC.4.4", NUCLEOTIDES, &NUC44);
        let t = matrix.index[b'T' as usize];
        matrix.index[b'U' as usize] = t;
        matrix.index[b'u' as usize] = t;
        matrix
    }

    fn builtin(name: &str, symbols: &[u8], scores: &[i32]) -> Self {
        debug_assert_eq!(symbols.len() * symbols.len(), scores.len());
        let mut index = vec![ABSENT; 256];
        for (i, &symbol) in symbols.iter().enumerate() {
            index[symbol as usize] = i as u8;
            index[symbol.to_ascii_lowercase() as usize] = i as u8;
        }
        Self {
            name: name.to_string(),
            symbols: symbols.to_vec(),
            scores: scores.to_vec(),
            index,
            min_score: scores.iter().copied().min().unwrap_or(0),
        }
    }

    /// Score for the ordered pair `(a, b)`.
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        let i = self.index[a as usize];
        let j = self.index[b as usize];
        if i == ABSENT || j == ABSENT {
            return self.min_score;
        }
        self.scores[i as usize * self.symbols.len() + j as usize]
    }

    /// Default similarity predicate: a strictly positive substitution score.
    pub fn is_similar(&self, a: u8, b: u8) -> bool {
        self.score(a, b) > 0
    }

    pub fn is_symmetric(&self) -> bool {
        let dim = self.symbols.len();
        (0..dim).all(|i| (0..i).all(|j| self.scores[i * dim + j] == self.scores[j * dim + i]))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn min_score(&self) -> i32 {
        self.min_score
    }
}

fn parse_symbol(field: &str) -> Result<u8> {
    match field.as_bytes() {
        [symbol] => Ok(*symbol),
        _ => Err(AlignError::invalid_argument(
            "matrix",
            format!("expected a single-character symbol, got '{}'", field),
        )),
    }
}

const AMINO_ACIDS: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX*";
const NUCLEOTIDES: &[u8] = b"ATGCSWRYKMBVHDN";

// Row/column order: A R N D C Q E G H I L K M F P S T W Y V B Z X *
#[rustfmt::skip]
const BLOSUM62: [i32; 576] = [
     4,  -1,  -2,  -2,   0,  -1,  -1,   0,  -2,  -1,  -1,  -1,  -1,  -2,  -1,   1,   0,  -3,  -2,   0,  -2,  -1,   0,  -4,
    -1,   5,   0,  -2,  -3,   1,   0,  -2,   0,  -3,  -2,   2,  -1,  -3,  -2,  -1,  -1,  -3,  -2,  -3,  -1,   0,  -1,  -4,
    -2,   0,   6,   1,  -3,   0,   0,   0,   1,  -3,  -3,   0,  -2,  -3,  -2,   1,   0,  -4,  -2,  -3,   3,   0,  -1,  -4,
    -2,  -2,   1,   6,  -3,   0,   2,  -1,  -1,  -3,  -4,  -1,  -3,  -3,  -1,   0,  -1,  -4,  -3,  -3,   4,   1,  -1,  -4,
     0,  -3,  -3,  -3,   9,  -3,  -4,  -3,  -3,  -1,  -1,  -3,  -1,  -2,  -3,  -1,  -1,  -2,  -2,  -1,  -3,  -3,  -2,  -4,
    -1,   1,   0,   0,  -3,   5,   2,  -2,   0,  -3,  -2,   1,   0,  -3,  -1,   0,  -1,  -2,  -1,  -2,   0,   3,  -1,  -4,
    -1,   0,   0,   2,  -4,   2,   5,  -2,   0,  -3,  -3,   1,  -2,  -3,  -1,   0,  -1,  -3,  -2,  -2,   1,   4,  -1,  -4,
     0,  -2,   0,  -1,  -3,  -2,  -2,   6,  -2,  -4,  -4,  -2,  -3,  -3,  -2,   0,  -2,  -2,  -3,  -3,  -1,  -2,  -1,  -4,
    -2,   0,   1,  -1,  -3,   0,   0,  -2,   8,  -3,  -3,  -1,  -2,  -1,  -2,  -1,  -2,  -2,   2,  -3,   0,   0,  -1,  -4,
    -1,  -3,  -3,  -3,  -1,  -3,  -3,  -4,  -3,   4,   2,  -3,   1,   0,  -3,  -2,  -1,  -3,  -1,   3,  -3,  -3,  -1,  -4,
    -1,  -2,  -3,  -4,  -1,  -2,  -3,  -4,  -3,   2,   4,  -2,   2,   0,  -3,  -2,  -1,  -2,  -1,   1,  -4,  -3,  -1,  -4,
    -1,   2,   0,  -1,  -3,   1,   1,  -2,  -1,  -3,  -2,   5,  -1,  -3,  -1,   0,  -1,  -3,  -2,  -2,   0,   1,  -1,  -4,
    -1,  -1,  -2,  -3,  -1,   0,  -2,  -3,  -2,   1,   2,  -1,   5,   0,  -2,  -1,  -1,  -1,  -1,   1,  -3,  -1,  -1,  -4,
    -2,  -3,  -3,  -3,  -2,  -3,  -3,  -3,  -1,   0,   0,  -3,   0,   6,  -4,  -2,  -2,   1,   3,  -1,  -3,  -3,  -1,  -4,
    -1,  -2,  -2,  -1,  -3,  -1,  -1,  -2,  -2,  -3,  -3,  -1,  -2,  -4,   7,  -1,  -1,  -4,  -3,  -2,  -2,  -1,  -2,  -4,
     1,  -1,   1,   0,  -1,   0,   0,   0,  -1,  -2,  -2,   0,  -1,  -2,  -1,   4,   1,  -3,  -2,  -2,   0,   0,   0,  -4,
     0,  -1,   0,  -1,  -1,  -1,  -1,  -2,  -2,  -1,  -1,  -1,  -1,  -2,  -1,   1,   5,  -2,  -2,   0,  -1,  -1,   0,  -4,
    -3,  -3,  -4,  -4,  -2,  -2,  -3,  -2,  -2,  -3,  -2,  -3,  -1,   1,  -4,  -3,  -2,  11,   2,  -3,  -4,  -3,  -2,  -4,
    -2,  -2,  -2,  -3,  -2,  -1,  -2,  -3,   2,  -1,  -1,  -2,  -1,   3,  -3,  -2,  -2,   2,   7,  -1,  -3,  -2,  -1,  -4,
     0,  -3,  -3,  -3,  -1,  -2,  -2,  -3,  -3,   3,   1,  -2,   1,  -1,  -2,  -2,   0,  -3,  -1,   4,  -3,  -2,  -1,  -4,
    -2,  -1,   3,   4,  -3,   0,   1,  -1,   0,  -3,  -4,   0,  -3,  -3,  -2,   0,  -1,  -4,  -3,  -3,   4,   1,  -1,  -4,
    -1,   0,   0,   1,  -3,   3,   4,  -2,   0,  -3,  -3,   1,  -1,  -3,  -1,   0,  -1,  -3,  -2,  -2,   1,   4,  -1,  -4,
     0,  -1,  -1,  -1,  -2,  -1,  -1,  -1,  -1,  -1,  -1,  -1,  -1,  -1,  -2,   0,   0,  -2,  -1,  -1,  -1,  -1,  -1,  -4,
    -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,  -4,   1,
];

#[rustfmt::skip]
const PAM250: [i32; 576] = [
     2,  -2,   0,   0,  -2,   0,   0,   1,  -1,  -1,  -2,  -1,  -1,  -3,   1,   1,   1,  -6,  -3,   0,   0,   0,   0,  -8,
    -2,   6,   0,  -1,  -4,   1,  -1,  -3,   2,  -2,  -3,   3,   0,  -4,   0,   0,  -1,   2,  -4,  -2,  -1,   0,  -1,  -8,
     0,   0,   2,   2,  -4,   1,   1,   0,   2,  -2,  -3,   1,  -2,  -3,   0,   1,   0,  -4,  -2,  -2,   2,   1,   0,  -8,
     0,  -1,   2,   4,  -5,   2,   3,   1,   1,  -2,  -4,   0,  -3,  -6,  -1,   0,   0,  -7,  -4,  -2,   3,   3,  -1,  -8,
    -2,  -4,  -4,  -5,  12,  -5,  -5,  -3,  -3,  -2,  -6,  -5,  -5,  -4,  -3,   0,  -2,  -8,   0,  -2,  -4,  -5,  -3,  -8,
     0,   1,   1,   2,  -5,   4,   2,  -1,   3,  -2,  -2,   1,  -1,  -5,   0,  -1,  -1,  -5,  -4,  -2,   1,   3,  -1,  -8,
     0,  -1,   1,   3,  -5,   2,   4,   0,   1,  -2,  -3,   0,  -2,  -5,  -1,   0,   0,  -7,  -4,  -2,   3,   3,  -1,  -8,
     1,  -3,   0,   1,  -3,  -1,   0,   5,  -2,  -3,  -4,  -2,  -3,  -5,   0,   1,   0,  -7,  -5,  -1,   0,   0,  -1,  -8,
    -1,   2,   2,   1,  -3,   3,   1,  -2,   6,  -2,  -2,   0,  -2,  -2,   0,  -1,  -1,  -3,   0,  -2,   1,   2,  -1,  -8,
    -1,  -2,  -2,  -2,  -2,  -2,  -2,  -3,  -2,   5,   2,  -2,   2,   1,  -2,  -1,   0,  -5,  -1,   4,  -2,  -2,  -1,  -8,
    -2,  -3,  -3,  -4,  -6,  -2,  -3,  -4,  -2,   2,   6,  -3,   4,   2,  -3,  -3,  -2,  -2,  -1,   2,  -3,  -3,  -1,  -8,
    -1,   3,   1,   0,  -5,   1,   0,  -2,   0,  -2,  -3,   5,   0,  -5,  -1,   0,   0,  -3,  -4,  -2,   1,   0,  -1,  -8,
    -1,   0,  -2,  -3,  -5,  -1,  -2,  -3,  -2,   2,   4,   0,   6,   0,  -2,  -2,  -1,  -4,  -2,   2,  -2,  -2,  -1,  -8,
    -3,  -4,  -3,  -6,  -4,  -5,  -5,  -5,  -2,   1,   2,  -5,   0,   9,  -5,  -3,  -3,   0,   7,  -1,  -4,  -5,  -2,  -8,
     1,   0,   0,  -1,  -3,   0,  -1,   0,   0,  -2,  -3,  -1,  -2,  -5,   6,   1,   0,  -6,  -5,  -1,  -1,   0,  -1,  -8,
     1,   0,   1,   0,   0,  -1,   0,   1,  -1,  -1,  -3,   0,  -2,  -3,   1,   2,   1,  -2,  -3,  -1,   0,   0,   0,  -8,
     1,  -1,   0,   0,  -2,  -1,   0,   0,  -1,   0,  -2,   0,  -1,  -3,   0,   1,   3,  -5,  -3,   0,   0,  -1,   0,  -8,
    -6,   2,  -4,  -7,  -8,  -5,  -7,  -7,  -3,  -5,  -2,  -3,  -4,   0,  -6,  -2,  -5,  17,   0,  -6,  -5,  -6,  -4,  -8,
    -3,  -4,  -2,  -4,   0,  -4,  -4,  -5,   0,  -1,  -1,  -4,  -2,   7,  -5,  -3,  -3,   0,  10,  -2,  -3,  -4,  -2,  -8,
     0,  -2,  -2,  -2,  -2,  -2,  -2,  -1,  -2,   4,   2,  -2,   2,  -1,  -1,  -1,   0,  -6,  -2,   4,  -2,  -2,  -1,  -8,
     0,  -1,   2,   3,  -4,   1,   3,   0,   1,  -2,  -3,   1,  -2,  -4,  -1,   0,   0,  -5,  -3,  -2,   3,   2,  -1,  -8,
     0,   0,   1,   3,  -5,   3,   3,   0,   2,  -2,  -3,   0,  -2,  -5,   0,   0,  -1,  -6,  -4,  -2,   2,   3,  -1,  -8,
     0,  -1,   0,  -1,  -3,  -1,  -1,  -1,  -1,  -1,  -1,  -1,  -1,  -2,  -1,   0,   0,  -4,  -2,  -1,  -1,  -1,  -1,  -8,
    -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,  -8,   1,
];

// Row/column order: A T G C S W R Y K M B V H D N
#[rustfmt::skip]
const NUC44: [i32; 225] = [
     5, -4, -4, -4, -4,  1,  1, -4, -4,  1, -4, -1, -1, -1, -2,
    -4,  5, -4, -4, -4,  1, -4,  1,  1, -4, -1, -4, -1, -1, -2,
    -4, -4,  5, -4,  1, -4,  1, -4,  1, -4, -1, -1, -4, -1, -2,
    -4, -4, -4,  5,  1, -4, -4,  1, -4,  1, -1, -1, -1, -4, -2,
    -4, -4,  1,  1, -1, -4, -2, -2, -2, -2, -1, -1, -3, -3, -1,
     1,  1, -4, -4, -4, -1, -2, -2, -2, -2, -3, -3, -1, -1, -1,
     1, -4,  1, -4, -2, -2, -1, -4, -2, -2, -3, -1, -3, -1, -1,
    -4,  1, -4,  1, -2, -2, -4, -1, -2, -2, -1, -3, -1, -3, -1,
    -4,  1,  1, -4, -2, -2, -2, -2, -1, -4, -1, -3, -3, -1, -1,
     1, -4, -4,  1, -2, -2, -2, -2, -4, -1, -3, -1, -1, -3, -1,
    -4, -1, -1, -1, -1, -3, -3, -1, -1, -3, -1, -2, -2, -2, -1,
    -1, -4, -1, -1, -1, -3, -1, -3, -3, -1, -2, -1, -2, -2, -1,
    -1, -1, -4, -1, -3, -1, -3, -1, -3, -1, -2, -2, -1, -2, -1,
    -1, -1, -1, -4, -3, -1, -1, -3, -1, -3, -2, -2, -2, -1, -1,
    -2, -2, -2, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];
