//! Error handling for the seqalign CLI

use seqalign_core::io::FastaError;
use seqalign_core::AlignError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for seqalign CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Parsing error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Alignment error ({mode}): {message}")]
    Alignment { mode: String, message: String },

    #[error("Search error: {message}")]
    Search { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn parse<S: Into<String>>(file: S, message: S) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn alignment<S: Into<String>>(mode: S, message: S) -> Self {
        Self::Alignment {
            mode: mode.into(),
            message: message.into(),
        }
    }

    pub fn search<S: Into<String>>(message: S) -> Self {
        Self::Search { message: message.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Wrap a FASTA reader failure, naming the file it came from.
    pub fn from_fasta(path: &std::path::Path, err: FastaError) -> Self {
        match err {
            FastaError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                Self::file_not_found(path.to_path_buf())
            }
            other => Self::parse(path.display().to_string(), other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<AlignError> for CliError {
    fn from(err: AlignError) -> Self {
        match err {
            AlignError::LengthMismatch { .. } | AlignError::InvalidArgument { .. } => {
                Self::validation(err.to_string())
            }
            other => Self::alignment("engine".to_string(), other.to_string()),
        }
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::Parse { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Inputs must be FASTA or FASTQ (optionally gzipped)\n\
                 • Use --alphabet protein for amino-acid sequences\n\
                 • Aligned inputs must not contain '-' gap symbols",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your seqalign.toml configuration file\n\
                 • Use 'seqalign config --example' to generate a sample configuration",
            );
        }

        CliError::Validation { message: detail } if detail.contains("Length mismatch") => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Hamming distance needs sequences of equal length\n\
                 • Use --metric edit for sequences of different lengths",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
