//! Pairwise alignment command

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use seqalign_core::{
    AlignerConfig, AlignmentFormatter, AlignmentResult, AlignmentStatistics, KmerPrefilter, PairwiseAligner,
    Sequence,
};

use super::{load_records, resolve_scoring};
use crate::config::Config;
use crate::error::CliError;
use crate::{AlphabetType, FreeEndsType, ModeType, ScoringArgs};

/// Pairs handed to the engine per progress update
const BATCH_SIZE: usize = 64;

#[derive(Args, Debug)]
pub struct AlignArgs {
    /// First sequence file (FASTA/FASTQ)
    pub seq1: PathBuf,

    /// Second sequence file (FASTA/FASTQ)
    pub seq2: PathBuf,

    /// Alignment mode
    #[arg(long)]
    pub mode: Option<ModeType>,

    /// Sequence whose end gaps are free in semi-global mode
    #[arg(long)]
    pub free_ends: Option<FreeEndsType>,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Sequence alphabet
    #[arg(long, value_enum, default_value_t = AlphabetType::Dna)]
    pub alphabet: AlphabetType,

    /// Residues per output line (0 = no wrapping)
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Emit JSON instead of formatted text
    #[arg(long)]
    pub json: bool,

    /// Align every record of the first file against every record of the second
    #[arg(long)]
    pub all_pairs: bool,

    /// Skip pairs sharing too few k-mers (see [prefilter])
    #[arg(long)]
    pub prefilter: bool,
}

#[derive(Serialize)]
struct PairReport<'a> {
    seq1: &'a str,
    seq2: &'a str,
    #[serde(flatten)]
    result: &'a AlignmentResult,
    cigar: String,
    statistics: AlignmentStatistics,
}

pub fn execute(config: &Config, args: AlignArgs, quiet: bool) -> Result<()> {
    let alphabet = args.alphabet.into();
    let records1 = load_records(&args.seq1, alphabet)?;
    let records2 = load_records(&args.seq2, alphabet)?;

    let scoring = resolve_scoring(config, &args.scoring)?;
    let mode = args.mode.map(Into::into).unwrap_or(config.alignment.mode);
    let free_ends = args
        .free_ends
        .map(Into::into)
        .unwrap_or_else(|| config.alignment.free_ends.into());
    let width = args.width.unwrap_or(config.alignment.line_width);
    let aligner = PairwiseAligner::with_config(scoring, AlignerConfig { free_ends });

    let prefilter = if args.prefilter {
        Some(KmerPrefilter::new(config.prefilter.k, config.prefilter.min_shared_fraction)?)
    } else {
        config.prefilter.to_prefilter()?
    };

    let per_file = if args.all_pairs { usize::MAX } else { 1 };
    let candidates: Vec<(&Sequence, &Sequence)> = records1
        .iter()
        .take(per_file)
        .flat_map(|a| records2.iter().take(per_file).map(move |b| (a, b)))
        .collect();
    let pairs = screen(candidates, prefilter.as_ref());
    log::info!("Aligning {} pair(s) in {} mode", pairs.len(), mode);

    let progress = if args.all_pairs && !quiet && pairs.len() > 1 {
        let bar = ProgressBar::new(pairs.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .context("Invalid progress bar template")?,
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut results = Vec::with_capacity(pairs.len());
    for chunk in pairs.chunks(BATCH_SIZE) {
        for ((a, b), result) in chunk.iter().zip(aligner.align_batch(chunk, mode)) {
            let result = result.map_err(|err| CliError::alignment(mode.to_string(), err.to_string()))?;
            results.push((*a, *b, result));
        }
        progress.inc(chunk.len() as u64);
    }
    progress.finish_and_clear();

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.json {
        let reports: Vec<PairReport> = results
            .iter()
            .map(|(a, b, result)| PairReport {
                seq1: a.id(),
                seq2: b.id(),
                result,
                cigar: result.cigar(),
                statistics: result.statistics_with(aligner.scoring()),
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &reports).context("Failed to write JSON output")?;
        writeln!(out)?;
    } else {
        for (index, (a, b, result)) in results.iter().enumerate() {
            if index > 0 {
                writeln!(out)?;
            }
            write_text(&mut out, a, b, result, &aligner, width)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Drop pairs the prefilter rejects, logging each one.
fn screen<'a>(
    candidates: Vec<(&'a Sequence, &'a Sequence)>,
    prefilter: Option<&KmerPrefilter>,
) -> Vec<(&'a Sequence, &'a Sequence)> {
    let Some(prefilter) = prefilter else {
        return candidates;
    };
    candidates
        .into_iter()
        .filter(|(a, b)| {
            let keep = prefilter.passes(*a, *b);
            if !keep {
                log::warn!("Prefilter rejected {} vs {}", a.id(), b.id());
            }
            keep
        })
        .collect()
}

fn write_text<W: Write>(
    out: &mut W,
    a: &Sequence,
    b: &Sequence,
    result: &AlignmentResult,
    aligner: &PairwiseAligner,
    width: usize,
) -> Result<()> {
    let scoring = aligner.scoring();
    writeln!(out, "# {} vs {} ({})", a.id(), b.id(), result.alignment_type)?;
    writeln!(out, "Score:      {}", result.score)?;
    writeln!(out, "CIGAR:      {}", result.cigar())?;
    writeln!(out, "{}", result.statistics_with(scoring))?;
    if !result.is_empty() {
        writeln!(out)?;
        let formatter = AlignmentFormatter::new(width).with_names(a.id(), b.id());
        write!(out, "{}", formatter.format(result, Some(scoring)))?;
    }
    Ok(())
}
