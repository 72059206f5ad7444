//! Pattern search and sequence distance commands

use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use seqalign_core::{edit_distance, find_approximate, hamming_distance, Metric, Sequence, SuffixTree};

use super::load_records;
use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::{AlphabetType, MetricType};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text file (FASTA/FASTQ); every record is searched
    pub text: PathBuf,

    /// Pattern to look for
    pub pattern: String,

    /// Maximum number of differences per hit (0 = exact search)
    #[arg(short = 'k', long)]
    pub max_distance: Option<usize>,

    /// Distance used for approximate hits
    #[arg(long)]
    pub metric: Option<MetricType>,

    /// Sequence alphabet
    #[arg(long, value_enum, default_value_t = AlphabetType::Dna)]
    pub alphabet: AlphabetType,

    /// Emit JSON instead of tab-separated hits
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DistanceArgs {
    /// First sequence file (FASTA/FASTQ)
    pub a: PathBuf,

    /// Second sequence file (FASTA/FASTQ)
    pub b: PathBuf,

    /// Distance to compute
    #[arg(long)]
    pub metric: Option<MetricType>,

    /// Sequence alphabet
    #[arg(long, value_enum, default_value_t = AlphabetType::Dna)]
    pub alphabet: AlphabetType,
}

/// One reported occurrence, 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub record: String,
    pub position: usize,
    pub distance: usize,
}

pub fn execute(config: &Config, args: SearchArgs) -> Result<()> {
    if args.pattern.is_empty() {
        return Err(CliError::search("pattern must not be empty").into());
    }
    let records = load_records(&args.text, args.alphabet.into())?;
    let max_distance = args.max_distance.unwrap_or(config.search.max_distance);
    let metric = args.metric.map(Into::into).unwrap_or(config.search.metric);
    let pattern = args.pattern.to_ascii_uppercase();

    let per_record = records
        .par_iter()
        .map(|record| search_record(record, &pattern, max_distance, metric))
        .collect::<CliResult<Vec<_>>>()?;
    let hits: Vec<Hit> = per_record.into_iter().flatten().collect();
    log::info!("{} hit(s) for pattern of length {}", hits.len(), pattern.len());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &hits).context("Failed to write JSON output")?;
        writeln!(out)?;
    } else {
        writeln!(out, "#record\tposition\tdistance")?;
        for hit in &hits {
            writeln!(out, "{}\t{}\t{}", hit.record, hit.position, hit.distance)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Exact hits come from a suffix tree; anything looser scans the record.
fn search_record(record: &Sequence, pattern: &str, max_distance: usize, metric: Metric) -> CliResult<Vec<Hit>> {
    let hit = |position, distance| Hit {
        record: record.id().to_string(),
        position,
        distance,
    };

    if max_distance == 0 {
        let tree = SuffixTree::new(record);
        log::debug!("suffix tree for {}: {} nodes", record.id(), tree.node_count());
        let positions = tree.find_all(pattern)?;
        Ok(positions.into_iter().map(|position| hit(position, 0)).collect())
    } else {
        let matches = find_approximate(record, pattern, max_distance, metric)?;
        Ok(matches.into_iter().map(|m| hit(m.position, m.distance)).collect())
    }
}

pub fn distance(config: &Config, args: DistanceArgs) -> Result<()> {
    let alphabet = args.alphabet.into();
    let a = load_records(&args.a, alphabet)?;
    let b = load_records(&args.b, alphabet)?;
    let metric = args.metric.map(Into::into).unwrap_or(config.search.metric);

    // load_records never returns an empty list
    let (Some(a), Some(b)) = (a.first(), b.first()) else {
        return Err(CliError::validation("no records to compare").into());
    };
    let d = compute_distance(a, b, metric)?;
    println!("{}\t{}\t{}\t{}", a.id(), b.id(), metric, d);
    Ok(())
}

fn compute_distance(a: &Sequence, b: &Sequence, metric: Metric) -> CliResult<usize> {
    match metric {
        Metric::Hamming => Ok(hamming_distance(a, b)?),
        Metric::Edit => Ok(edit_distance(a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genome() -> Sequence {
        Sequence::dna("g", "GATTACAGATTACATTAGACCAGATTA").unwrap()
    }

    #[test]
    fn test_exact_search_uses_suffix_tree() {
        let hits = search_record(&genome(), "GATTA", 0, Metric::Hamming).unwrap();
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 7, 22]);
        assert!(hits.iter().all(|h| h.distance == 0 && h.record == "g"));
    }

    #[test]
    fn test_approximate_search() {
        let record = Sequence::dna("r", "ACGTACGTTCGT").unwrap();
        let hits = search_record(&record, "ACGT", 1, Metric::Hamming).unwrap();
        let found: Vec<(usize, usize)> = hits.iter().map(|h| (h.position, h.distance)).collect();
        assert_eq!(found, vec![(0, 0), (4, 0), (8, 1)]);
    }

    #[test]
    fn test_distances() {
        let a = Sequence::dna("a", "AAAA").unwrap();
        let b = Sequence::dna("b", "AAAT").unwrap();
        let c = Sequence::dna("c", "AAA").unwrap();
        assert_eq!(compute_distance(&a, &b, Metric::Hamming).unwrap(), 1);
        assert_eq!(compute_distance(&a, &c, Metric::Edit).unwrap(), 1);

        let err = compute_distance(&a, &c, Metric::Hamming).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
