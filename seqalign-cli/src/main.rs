use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};
use seqalign_core::{Alphabet, AlignmentType, FreeEnds, Metric};

#[derive(Parser)]
#[command(name = "seqalign")]
#[command(about = "seqalign - pairwise and multiple sequence alignment")]
#[command(version)]
#[command(long_about = "
seqalign aligns DNA, RNA and protein sequences under an affine gap model.
Global, local and semi-global pairwise modes are supported, along with star
multiple alignment and suffix-tree backed exact/approximate search.

Examples:
  seqalign align query.fa ref.fa --mode semi-global
  seqalign align a.fa b.fa --mode local --matrix blosum62 --alphabet protein
  seqalign msa family.fa --width 80
  seqalign search genome.fa GATTACA --max-distance 1 --metric edit
  seqalign distance a.fa b.fa --metric hamming
  seqalign config --example > seqalign.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align the first record of two FASTA files (or every record pair)
    #[cfg(feature = "align")]
    Align(commands::align::AlignArgs),

    /// Star-align every record of a FASTA file
    #[cfg(feature = "msa")]
    Msa(commands::msa::MsaArgs),

    /// Find exact or approximate occurrences of a pattern
    #[cfg(feature = "search")]
    Search(commands::search::SearchArgs),

    /// Hamming or edit distance between the first records of two files
    #[cfg(feature = "search")]
    Distance(commands::search::DistanceArgs),

    /// Print or write configuration
    Config {
        /// Print the default configuration instead of the effective one
        #[arg(long)]
        example: bool,

        /// Write the configuration to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Scoring flags shared by the aligning subcommands. Unset flags fall back
/// to the `[scoring]` section of the configuration.
#[derive(Args, Clone, Debug, Default)]
pub struct ScoringArgs {
    /// Score for identical symbols
    #[arg(long = "match", allow_negative_numbers = true)]
    pub match_score: Option<i32>,

    /// Score for differing symbols
    #[arg(long, allow_negative_numbers = true)]
    pub mismatch: Option<i32>,

    /// Score of the first symbol of a gap
    #[arg(long, allow_negative_numbers = true)]
    pub gap_open: Option<i32>,

    /// Score of each further gap symbol
    #[arg(long, allow_negative_numbers = true)]
    pub gap_extend: Option<i32>,

    /// Built-in substitution matrix
    #[arg(long)]
    pub matrix: Option<MatrixType>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeType {
    Global,
    Local,
    SemiGlobal,
}

impl From<ModeType> for AlignmentType {
    fn from(mode: ModeType) -> Self {
        match mode {
            ModeType::Global => AlignmentType::Global,
            ModeType::Local => AlignmentType::Local,
            ModeType::SemiGlobal => AlignmentType::SemiGlobal,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FreeEndsType {
    Seq1,
    Seq2,
}

impl From<FreeEndsType> for FreeEnds {
    fn from(free_ends: FreeEndsType) -> Self {
        match free_ends {
            FreeEndsType::Seq1 => FreeEnds::Sequence1,
            FreeEndsType::Seq2 => FreeEnds::Sequence2,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MetricType {
    Hamming,
    Edit,
}

impl From<MetricType> for Metric {
    fn from(metric: MetricType) -> Self {
        match metric {
            MetricType::Hamming => Metric::Hamming,
            MetricType::Edit => Metric::Edit,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum AlphabetType {
    #[default]
    Dna,
    Rna,
    Protein,
}

impl From<AlphabetType> for Alphabet {
    fn from(alphabet: AlphabetType) -> Self {
        match alphabet {
            AlphabetType::Dna => Alphabet::Dna,
            AlphabetType::Rna => Alphabet::Rna,
            AlphabetType::Protein => Alphabet::Protein,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MatrixType {
    Blosum62,
    Pam250,
    Nuc44,
}

impl MatrixType {
    pub fn name(self) -> &'static str {
        match self {
            MatrixType::Blosum62 => "blosum62",
            MatrixType::Pam250 => "pam250",
            MatrixType::Nuc44 => "nuc44",
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else if std::env::var_os("RUST_LOG").is_none() || verbose > 0 {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(command: Commands, config: &Config, quiet: bool) -> Result<()> {
    match command {
        #[cfg(feature = "align")]
        Commands::Align(args) => commands::align::execute(config, args, quiet),

        #[cfg(feature = "msa")]
        Commands::Msa(args) => commands::msa::execute(config, args),

        #[cfg(feature = "search")]
        Commands::Search(args) => commands::search::execute(config, args),

        #[cfg(feature = "search")]
        Commands::Distance(args) => commands::search::distance(config, args),

        Commands::Config { example, output } => {
            let content = if example { Config::example_toml()? } else { config.to_toml()? };
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;
                    log::info!("Configuration written to: {}", path.display());
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Size the global pool used by batch and multiple alignment
    let threads = cli.threads.unwrap_or(config.general.threads);
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    if let Err(err) = run(cli.command, &config, cli.quiet) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            print_error_and_exit(cli_err);
        }
        return Err(err);
    }

    Ok(())
}
