//! Star multiple alignment command

use anyhow::{Context, Result};
use clap::Args;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use seqalign_core::io::write_record;
use seqalign_core::{MultipleAligner, MultipleAlignmentResult};

use super::{load_records, resolve_scoring};
use crate::config::Config;
use crate::error::CliError;
use crate::{AlphabetType, ScoringArgs};

#[derive(Args, Debug)]
pub struct MsaArgs {
    /// Sequence file (FASTA/FASTQ); the first record is the center
    pub input: PathBuf,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Sequence alphabet
    #[arg(long, value_enum, default_value_t = AlphabetType::Dna)]
    pub alphabet: AlphabetType,

    /// Residues per FASTA line (0 = no wrapping)
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Emit JSON instead of aligned FASTA
    #[arg(long)]
    pub json: bool,
}

pub fn execute(config: &Config, args: MsaArgs) -> Result<()> {
    let records = load_records(&args.input, args.alphabet.into())?;
    let scoring = resolve_scoring(config, &args.scoring)?;
    let width = args.width.unwrap_or(config.alignment.line_width);

    let result = MultipleAligner::new(scoring)
        .align_sequences(&records)
        .map_err(|err| CliError::alignment("star".to_string(), err.to_string()))?;
    log::info!(
        "Aligned {} sequences into {} columns (total score {})",
        result.len(),
        result.width(),
        result.total_score
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &result).context("Failed to write JSON output")?;
        writeln!(out)?;
    } else {
        write_fasta(&mut out, &result, width)?;
    }
    out.flush()?;
    Ok(())
}

/// Aligned rows followed by a consensus record carrying the total score.
fn write_fasta<W: Write>(out: &mut W, result: &MultipleAlignmentResult, width: usize) -> std::io::Result<()> {
    for (id, row) in result.ids.iter().zip(&result.aligned_sequences) {
        write_record(out, id, row.as_bytes(), width)?;
    }
    let header = format!("consensus total_score={}", result.total_score);
    write_record(out, &header, result.consensus.as_bytes(), width)
}
