//! Pipeline configuration.
//!
//! Loaded from a JSON file; every section falls back to its defaults when
//! omitted:
//! ```json
//! {
//!   "input_file": "data/words.csv",
//!   "output_dir": "output",
//!   "clustering": { "min_score": 0.5 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clustering::config::ClusteringConfig;
use crate::error::{Result, WordTierError};
use crate::features::builder::FeatureConfig;
use crate::lexicon::filter::FilterConfig;
use crate::lexicon::normalize::NormalizationConfig;

/// Configuration for a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw `(word, frequency)` CSV table.
    pub input_file: PathBuf,

    /// Directory receiving the final outputs.
    pub output_dir: PathBuf,

    /// Directory for intermediate tables.
    /// If None, uses `<output_dir>/temp`.
    pub temp_dir: Option<PathBuf>,

    /// Real-world frequency list. Without one every word gets the log floor.
    pub frequency_file: Option<PathBuf>,

    /// English word list used by the lemmatizer and the content filter.
    pub lexicon_file: Option<PathBuf>,

    /// Inappropriate words kept out of the export.
    pub blocklist_file: Option<PathBuf>,

    /// Word normalization settings.
    pub normalization: NormalizationConfig,

    /// Feature computation settings.
    pub features: FeatureConfig,

    /// Grid search and clustering settings.
    pub clustering: ClusteringConfig,

    /// Export-side content filter settings.
    pub filter: FilterConfig,

    /// Whether to write the preprocessed and feature tables.
    pub write_intermediate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("data/words.csv"),
            output_dir: PathBuf::from("output"),
            temp_dir: None,
            frequency_file: None,
            lexicon_file: None,
            blocklist_file: None,
            normalization: NormalizationConfig::default(),
            features: FeatureConfig::default(),
            clustering: ClusteringConfig::default(),
            filter: FilterConfig::default(),
            write_intermediate: true,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration for the given input and output locations.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input_file: P, output_dir: Q) -> Self {
        Self {
            input_file: input_file.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| WordTierError::input_unavailable(path, e.to_string()))?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Directory for intermediate tables.
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("temp"))
    }

    /// Set the input table.
    pub fn with_input_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.input_file = path.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set the temp directory.
    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.temp_dir = Some(path.into());
        self
    }

    /// Set the real-world frequency list.
    pub fn with_frequency_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.frequency_file = Some(path.into());
        self
    }

    /// Set the lexicon file.
    pub fn with_lexicon_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.lexicon_file = Some(path.into());
        self
    }

    /// Set the blocklist file.
    pub fn with_blocklist_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.blocklist_file = Some(path.into());
        self
    }

    /// Set the clustering configuration.
    pub fn with_clustering(mut self, clustering: ClusteringConfig) -> Self {
        self.clustering = clustering;
        self
    }

    /// Set the normalization configuration.
    pub fn with_normalization(mut self, normalization: NormalizationConfig) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set the content filter configuration.
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Set whether intermediate tables are written.
    pub fn with_write_intermediate(mut self, write: bool) -> Self {
        self.write_intermediate = write;
        self
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.input_file.as_os_str().is_empty() {
            return Err(WordTierError::invalid_config("input_file must be set"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(WordTierError::invalid_config("output_dir must be set"));
        }
        if self.normalization.min_word_length == 0 {
            return Err(WordTierError::invalid_config(
                "normalization.min_word_length must be at least 1",
            ));
        }
        if !self.features.log_floor.is_finite() {
            return Err(WordTierError::invalid_config(format!(
                "features.log_floor must be finite, got {}",
                self.features.log_floor
            )));
        }
        if self.filter.min_length == 0 || self.filter.min_length > self.filter.max_length {
            return Err(WordTierError::invalid_config(format!(
                "filter length bounds must satisfy 1 <= min_length <= max_length, got {}..{}",
                self.filter.min_length, self.filter.max_length
            )));
        }
        self.clustering.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::DEFAULT_LOG_FLOOR;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.write_intermediate);
        assert_eq!(config.temp_dir(), PathBuf::from("output/temp"));
        assert_eq!(config.features.log_floor, DEFAULT_LOG_FLOOR);
        assert_eq!(config.filter.min_length, 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "input_file": "words.csv",
            "output_dir": "out",
            "clustering": { "min_score": 0.4, "seed": 7 }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.input_file, PathBuf::from("words.csv"));
        assert_eq!(config.clustering.min_score, 0.4);
        assert_eq!(config.clustering.seed, 7);
        assert_eq!(config.clustering.n_init, 10);
        assert_eq!(config.normalization.excluded_words, vec!["SPELL", "WAND"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let config = PipelineConfig::new("in.csv", "out")
            .with_temp_dir("scratch")
            .with_write_intermediate(false);
        config.save_to_file(&path).unwrap();

        let loaded = PipelineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.temp_dir(), PathBuf::from("scratch"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.filter = FilterConfig {
            min_length: 8,
            max_length: 4,
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig::default()
            .with_clustering(ClusteringConfig::default().with_min_score(2.0));
        assert!(matches!(config.validate(), Err(WordTierError::InvalidConfig(_))));

        let mut config = PipelineConfig::default();
        config.features.log_floor = f64::NEG_INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = PipelineConfig::load_from_file("/nonexistent/config.json");
        assert!(matches!(result, Err(WordTierError::InputUnavailable { .. })));
    }
}
