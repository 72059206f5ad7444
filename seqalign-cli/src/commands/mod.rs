//! Subcommand implementations

#[cfg(feature = "align")] pub mod align;
#[cfg(feature = "msa")] pub mod msa;
#[cfg(feature = "search")] pub mod search;

use anyhow::Result;
use std::path::Path;

use seqalign_core::io::read_sequences;
use seqalign_core::{Alphabet, ScoringMatrix, Sequence};

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::ScoringArgs;

/// Read every record of a FASTA/FASTQ file. Never returns an empty list.
pub fn load_records(path: &Path, alphabet: Alphabet) -> CliResult<Vec<Sequence>> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()));
    }
    let records = read_sequences(path, alphabet).map_err(|err| CliError::from_fasta(path, err))?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Scoring scheme from the configuration with command-line overrides applied.
pub fn resolve_scoring(config: &Config, args: &ScoringArgs) -> Result<ScoringMatrix> {
    let mut section = config.scoring.clone();
    if let Some(score) = args.match_score {
        section.match_score = score;
    }
    if let Some(score) = args.mismatch {
        section.mismatch = score;
    }
    if let Some(score) = args.gap_open {
        section.gap_open = score;
    }
    if let Some(score) = args.gap_extend {
        section.gap_extend = score;
    }
    if let Some(matrix) = args.matrix {
        section.matrix = Some(matrix.name().to_string());
    }

    let scoring = section.to_scoring()?;
    log::debug!(
        "scoring: match {} mismatch {} gap open {} gap extend {} matrix {}",
        scoring.match_score,
        scoring.mismatch,
        scoring.gap_open,
        scoring.gap_extend,
        scoring.substitution.as_ref().map(|m| m.name()).unwrap_or("none")
    );
    Ok(scoring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatrixType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_overrides_replace_config_values() {
        let config = Config::default();
        let args = ScoringArgs {
            mismatch: Some(-4),
            gap_open: Some(-10),
            ..Default::default()
        };
        let scoring = resolve_scoring(&config, &args).unwrap();
        assert_eq!(scoring.match_score, 1);
        assert_eq!(scoring.mismatch, -4);
        assert_eq!(scoring.gap_open, -10);
        assert_eq!(scoring.gap_extend, -1);
    }

    #[test]
    fn test_matrix_override() {
        let args = ScoringArgs {
            matrix: Some(MatrixType::Pam250),
            ..Default::default()
        };
        let scoring = resolve_scoring(&Config::default(), &args).unwrap();
        assert!(scoring.substitution.is_some());
    }

    #[test]
    fn test_load_records() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">a\nACGT\n>b\nGGCC").unwrap();
        file.flush().unwrap();

        let records = load_records(file.path(), Alphabet::Dna).unwrap();
        assert_eq!(records.len(), 2);

        let err = load_records(Path::new("/nonexistent/x.fa"), Alphabet::Dna).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }
}
