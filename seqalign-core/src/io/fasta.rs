//! FASTA/FASTQ input
//!
//! Parsing is delegated to needletail, which also sniffs gzip input. Every
//! record is validated into a [`Sequence`] of the requested alphabet.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

use needletail::parse_fastx_reader;

use crate::error::AlignError;
use crate::types::{Alphabet, Sequence};

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid record '{id}': {source}")]
    Sequence {
        id: String,
        #[source]
        source: AlignError,
    },
    #[error("Empty file or no sequences found")]
    EmptyFile,
}

pub type FastaResult<T> = std::result::Result<T, FastaError>;

/// Read every record of a FASTA/FASTQ file (optionally gzipped).
pub fn read_sequences<P: AsRef<Path>>(path: P, alphabet: Alphabet) -> FastaResult<Vec<Sequence>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let sequences = read_sequences_from(file, alphabet)?;
    log::debug!("read {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Read every record from any byte source.
pub fn read_sequences_from<R>(reader: R, alphabet: Alphabet) -> FastaResult<Vec<Sequence>>
where
    R: Read + Send + 'static,
{
    let mut fastx_reader = parse_fastx_reader(reader).map_err(|e| FastaError::Parse(e.to_string()))?;
    let mut sequences = Vec::new();

    while let Some(record) = fastx_reader.next() {
        let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;

        // header up to the first whitespace
        let header = String::from_utf8_lossy(record.id());
        let id = header.split_whitespace().next().unwrap_or_default().to_string();

        let sequence = Sequence::new(id.clone(), &*record.seq(), alphabet)
            .map_err(|source| FastaError::Sequence { id, source })?;
        sequences.push(sequence);
    }

    if sequences.is_empty() {
        Err(FastaError::EmptyFile)
    } else {
        Ok(sequences)
    }
}

/// Write one FASTA record, wrapping the body at `line_width` (0 = no wrap).
pub fn write_record<W: Write>(writer: &mut W, id: &str, data: &[u8], line_width: usize) -> std::io::Result<()> {
    writeln!(writer, ">{}", id)?;
    if data.is_empty() {
        return writeln!(writer);
    }
    let width = if line_width == 0 { data.len() } else { line_width };
    for line in data.chunks(width) {
        writer.write_all(line)?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">chr1 first record").unwrap();
        writeln!(file, "ACGT").unwrap();
        writeln!(file, "acgt").unwrap();
        writeln!(file, ">chr2").unwrap();
        writeln!(file, "GATTACA").unwrap();
        file.flush().unwrap();

        let sequences = read_sequences(file.path(), Alphabet::Dna).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].id(), "chr1");
        assert_eq!(sequences[0].as_bytes(), b"ACGTACGT");
        assert_eq!(sequences[1].id(), "chr2");
        assert_eq!(sequences[1].len(), 7);
    }

    #[test]
    fn test_invalid_symbol_names_record() {
        let data = b">good\nACGT\n>bad\nACXT\n".to_vec();
        let err = read_sequences_from(Cursor::new(data), Alphabet::Dna).unwrap_err();
        match err {
            FastaError::Sequence { id, source } => {
                assert_eq!(id, "bad");
                assert!(matches!(source, AlignError::InvalidSymbol { position: 2, .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_protein_records() {
        let data = b">p1\nMKVLA\n".to_vec();
        let sequences = read_sequences_from(Cursor::new(data), Alphabet::Protein).unwrap();
        assert_eq!(sequences[0].alphabet(), Alphabet::Protein);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(read_sequences_from(Cursor::new(Vec::new()), Alphabet::Dna).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_sequences("/nonexistent/reads.fa", Alphabet::Dna).unwrap_err();
        assert!(matches!(err, FastaError::Io(_)));
    }

    #[test]
    fn test_write_record_wraps() {
        let mut out = Vec::new();
        write_record(&mut out, "s1", b"ACGTACGTAC", 4).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">s1\nACGT\nACGT\nAC\n");
    }
}
