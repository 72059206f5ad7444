//! Human-readable rendering of pairwise alignments

use crate::align::{AlignmentResult, GAP};
use crate::scoring::ScoringMatrix;
use std::fmt::{self, Write};

/// Renders an alignment as three-line blocks: sequence 1, a match line and
/// sequence 2, each sequence line framed by 1-based coordinates.
///
/// Match line symbols: `|` identical, `:` similar (positive substitution
/// score), `.` mismatch, space for a gap.
#[derive(Debug, Clone)]
pub struct AlignmentFormatter {
    /// Columns per block; 0 puts the whole alignment in one block
    pub line_width: usize,
    name1: String,
    name2: String,
}

impl Default for AlignmentFormatter {
    fn default() -> Self {
        Self::new(60)
    }
}

impl AlignmentFormatter {
    pub fn new(line_width: usize) -> Self {
        Self {
            line_width,
            name1: "seq1".to_string(),
            name2: "seq2".to_string(),
        }
    }

    pub fn with_names<A: Into<String>, B: Into<String>>(mut self, name1: A, name2: B) -> Self {
        self.name1 = name1.into();
        self.name2 = name2.into();
        self
    }

    pub fn format(&self, result: &AlignmentResult, scoring: Option<&ScoringMatrix>) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write(&mut out, result, scoring);
        out
    }

    pub fn write<W: Write>(
        &self,
        out: &mut W,
        result: &AlignmentResult,
        scoring: Option<&ScoringMatrix>,
    ) -> fmt::Result {
        let row1 = result.aligned_seq1.as_bytes();
        let row2 = result.aligned_seq2.as_bytes();
        let width = if self.line_width == 0 {
            row1.len().max(1)
        } else {
            self.line_width
        };
        let label = self.name1.len().max(self.name2.len());

        let mut pos1 = result.start1;
        let mut pos2 = result.start2;

        for (block, (chunk1, chunk2)) in row1.chunks(width).zip(row2.chunks(width)).enumerate() {
            if block > 0 {
                writeln!(out)?;
            }

            let residues1 = chunk1.iter().filter(|&&b| b != GAP).count();
            let residues2 = chunk2.iter().filter(|&&b| b != GAP).count();
            let matches: String = chunk1
                .iter()
                .zip(chunk2)
                .map(|(&a, &b)| match_symbol(a, b, scoring))
                .collect();

            writeln!(
                out,
                "{:<label$} {:>6} {} {}",
                self.name1,
                pos1 + 1,
                as_text(chunk1),
                pos1 + residues1,
                label = label
            )?;
            writeln!(out, "{:<label$} {:>6} {}", "", "", matches, label = label)?;
            writeln!(
                out,
                "{:<label$} {:>6} {} {}",
                self.name2,
                pos2 + 1,
                as_text(chunk2),
                pos2 + residues2,
                label = label
            )?;

            pos1 += residues1;
            pos2 += residues2;
        }
        Ok(())
    }
}

fn match_symbol(a: u8, b: u8, scoring: Option<&ScoringMatrix>) -> char {
    if a == GAP || b == GAP {
        ' '
    } else if a.eq_ignore_ascii_case(&b) {
        '|'
    } else if scoring.map_or(false, |s| s.is_similar(a, b)) {
        ':'
    } else {
        '.'
    }
}

fn as_text(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{align, AlignmentType};

    fn textbook() -> AlignmentResult {
        let scoring = ScoringMatrix::new(1, -1, -1, -1);
        align("GCATGCG", "GATTACA", &scoring, AlignmentType::Global).unwrap()
    }

    #[test]
    fn test_single_block() {
        let text = AlignmentFormatter::new(0).format(&textbook(), None);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "seq1      1 GCA-TGCG 7");
        assert_eq!(lines[1], "            | | |.|.");
        assert_eq!(lines[2], "seq2      1 G-ATTACA 7");
    }

    #[test]
    fn test_blocks_carry_coordinates() {
        let text = AlignmentFormatter::new(4)
            .with_names("query", "ref")
            .format(&textbook(), None);
        let lines: Vec<&str> = text.lines().collect();

        // two blocks of three lines separated by a blank line
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "query      1 GCA- 3");
        assert_eq!(lines[2], "ref        1 G-AT 3");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "query      4 TGCG 7");
        assert_eq!(lines[6], "ref        4 TACA 7");
    }

    #[test]
    fn test_similar_symbols() {
        let scoring = ScoringMatrix::protein_blosum62();
        let result = align("IKW", "VKA", &scoring, AlignmentType::Global).unwrap();
        let text = AlignmentFormatter::new(0).format(&result, Some(&scoring));
        assert_eq!(text.lines().nth(1).map(str::trim), Some(":|."));
    }

    #[test]
    fn test_empty_alignment_renders_nothing() {
        let result = align("AAAA", "TTTT", &ScoringMatrix::default(), AlignmentType::Local).unwrap();
        assert!(AlignmentFormatter::default().format(&result, None).is_empty());
    }
}
