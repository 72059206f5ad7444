//! Configuration handling for the seqalign CLI
//!
//! Supports loading configuration from seqalign.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use seqalign_core::{AlignmentType, FreeEnds, KmerPrefilter, Metric, ScoringMatrix, SubstitutionMatrix};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub prefilter: PrefilterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default number of threads to use
    #[serde(default = "default_threads")]
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_match_score")]
    pub match_score: i32,

    #[serde(default = "default_mismatch")]
    pub mismatch: i32,

    /// Score of the first symbol in a gap run
    #[serde(default = "default_gap_open")]
    pub gap_open: i32,

    /// Score of each further symbol in a gap run
    #[serde(default = "default_gap_extend")]
    pub gap_extend: i32,

    /// Built-in substitution matrix (blosum62, pam250, nuc44)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Default alignment mode
    #[serde(default)]
    pub mode: AlignmentType,

    /// Which sequence's end gaps are free in semi-global mode
    #[serde(default)]
    pub free_ends: FreeEndsSetting,

    /// Residues per line in formatted output
    #[serde(default = "default_line_width")]
    pub line_width: usize,
}

/// TOML spelling of [`FreeEnds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreeEndsSetting {
    Seq1,
    #[default]
    Seq2,
}

impl From<FreeEndsSetting> for FreeEnds {
    fn from(setting: FreeEndsSetting) -> Self {
        match setting {
            FreeEndsSetting::Seq1 => FreeEnds::Sequence1,
            FreeEndsSetting::Seq2 => FreeEnds::Sequence2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub metric: Metric,

    /// Maximum number of differences per reported hit
    #[serde(default)]
    pub max_distance: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefilterConfig {
    /// Screen pairs by shared k-mers before aligning
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_prefilter_k")]
    pub k: usize,

    #[serde(default = "default_min_shared_fraction")]
    pub min_shared_fraction: f64,
}

// Default value functions
fn default_threads() -> usize { num_cpus::get() }
fn default_match_score() -> i32 { 1 }
fn default_mismatch() -> i32 { -1 }
fn default_gap_open() -> i32 { -2 }
fn default_gap_extend() -> i32 { -1 }
fn default_line_width() -> usize { 60 }
fn default_prefilter_k() -> usize { 11 }
fn default_min_shared_fraction() -> f64 { 0.1 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { threads: default_threads() }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: default_match_score(),
            mismatch: default_mismatch(),
            gap_open: default_gap_open(),
            gap_extend: default_gap_extend(),
            matrix: None,
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            mode: AlignmentType::default(),
            free_ends: FreeEndsSetting::default(),
            line_width: default_line_width(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            max_distance: 0,
        }
    }
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            k: default_prefilter_k(),
            min_shared_fraction: default_min_shared_fraction(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            scoring: ScoringConfig::default(),
            alignment: AlignmentConfig::default(),
            search: SearchConfig::default(),
            prefilter: PrefilterConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Build the scoring scheme, resolving the named matrix if one is set.
    pub fn to_scoring(&self) -> Result<ScoringMatrix> {
        let scoring = ScoringMatrix::new(self.match_score, self.mismatch, self.gap_open, self.gap_extend);
        match self.matrix.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => {
                let matrix = SubstitutionMatrix::by_name(name)
                    .with_context(|| format!("Invalid [scoring] matrix: {}", name))?;
                Ok(scoring.with_substitution(matrix))
            }
            None => Ok(scoring),
        }
    }
}

impl PrefilterConfig {
    /// The configured prefilter, or `None` when disabled.
    pub fn to_prefilter(&self) -> Result<Option<KmerPrefilter>> {
        if !self.enabled {
            return Ok(None);
        }
        let prefilter = KmerPrefilter::new(self.k, self.min_shared_fraction)
            .context("Invalid [prefilter] settings")?;
        Ok(Some(prefilter))
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from("seqalign.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: seqalign.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        Self::default().to_toml()
    }

    /// Render this configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scoring.match_score, 1);
        assert_eq!(config.scoring.gap_open, -2);
        assert_eq!(config.alignment.mode, AlignmentType::Global);
        assert_eq!(config.alignment.line_width, 60);
        assert_eq!(config.search.metric, Metric::Hamming);
        assert!(!config.prefilter.enabled);
        assert!(config.general.threads >= 1);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.alignment.mode = AlignmentType::SemiGlobal;
        config.alignment.free_ends = FreeEndsSetting::Seq1;
        config.scoring.matrix = Some("blosum62".to_string());
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded_config.alignment.mode, AlignmentType::SemiGlobal);
        assert_eq!(loaded_config.alignment.free_ends, FreeEndsSetting::Seq1);
        assert_eq!(loaded_config.scoring.matrix.as_deref(), Some("blosum62"));
        assert_eq!(config.prefilter.k, loaded_config.prefilter.k);

        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[alignment]\nmode = \"local\"\n").unwrap();
        assert_eq!(config.alignment.mode, AlignmentType::Local);
        assert_eq!(config.alignment.line_width, 60);
        assert_eq!(config.scoring.mismatch, -1);
    }

    #[test]
    fn test_scoring_with_named_matrix() {
        let mut scoring = ScoringConfig::default();
        assert!(scoring.to_scoring().unwrap().substitution.is_none());

        scoring.matrix = Some("BLOSUM62".to_string());
        let matrix = scoring.to_scoring().unwrap();
        assert_eq!(matrix.score_pair(b'W', b'W'), 11);

        scoring.matrix = Some("nonsense".to_string());
        assert!(scoring.to_scoring().is_err());
    }

    #[test]
    fn test_prefilter_disabled_by_default() {
        assert!(PrefilterConfig::default().to_prefilter().unwrap().is_none());

        let enabled = PrefilterConfig { enabled: true, k: 0, min_shared_fraction: 0.5 };
        assert!(enabled.to_prefilter().is_err());
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml().unwrap();
        assert!(example.contains("[general]"));
        assert!(example.contains("[scoring]"));
        assert!(example.contains("[alignment]"));
        assert!(example.contains("[prefilter]"));
        assert!(example.contains("mode = \"global\""));
    }
}
