//! End-to-end pipeline: read, normalize, build features, cluster, filter,
//! export.
//!
//! Shared resources (frequency source, lexicon, blocklist) are loaded once
//! into [`Resources`] and handed to the stages that need them.

use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

use crate::clustering::engine::{ClusteringEngine, ClusteringSummary};
use crate::clustering::grid_search::{CancellationToken, CandidateScore, GridSearchResult};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::builder::FeatureBuilder;
use crate::frequency::{FrequencySource, FrequencyTable, NoFrequencySource};
use crate::io::export::{ExportReport, Exporter, write_features, write_preprocessed};
use crate::io::reader::read_word_table;
use crate::lexicon::dictionary::{Blocklist, Lexicon};
use crate::lexicon::filter::ContentFilter;
use crate::lexicon::lemmatizer::{Lemmatizer, SuffixLemmatizer};
use crate::lexicon::normalize::{NormalizedWord, WordNormalizer};
use crate::record::WordRecord;

/// Immutable lookup data shared by the pipeline stages.
#[derive(Clone)]
pub struct Resources {
    pub frequency: Arc<dyn FrequencySource>,
    pub lexicon: Option<Arc<Lexicon>>,
    pub blocklist: Arc<Blocklist>,
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("frequency", &self.frequency.name())
            .field("lexicon", &self.lexicon.as_ref().map(|l| l.len()))
            .field("blocklist", &self.blocklist.len())
            .finish()
    }
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            frequency: Arc::new(NoFrequencySource),
            lexicon: None,
            blocklist: Arc::new(Blocklist::empty()),
        }
    }
}

impl Resources {
    /// Load every resource file named by the configuration.
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        let frequency: Arc<dyn FrequencySource> = match &config.frequency_file {
            Some(path) => Arc::new(FrequencyTable::load_from_file(path)?),
            None => {
                warn!("No frequency file configured; every word gets the log floor");
                Arc::new(NoFrequencySource)
            }
        };

        let lexicon = match &config.lexicon_file {
            Some(path) => Some(Arc::new(Lexicon::load_from_file(path)?)),
            None => None,
        };

        let blocklist = match &config.blocklist_file {
            Some(path) => Arc::new(Blocklist::load_from_file(path)?),
            None => Arc::new(Blocklist::empty()),
        };

        Ok(Resources {
            frequency,
            lexicon,
            blocklist,
        })
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub rows_read: usize,
    pub words_clustered: usize,
    pub words_exported: usize,
    pub search: GridSearchResult,
    pub summary: ClusteringSummary,
    pub export: ExportReport,
    pub duration_ms: u64,
}

/// Word tiering pipeline.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    resources: Resources,
    cancellation: CancellationToken,
}

impl Pipeline {
    /// Create a pipeline, loading resources from the configured files.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let resources = Resources::load(&config)?;
        Ok(Self::with_resources(config, resources))
    }

    /// Create a pipeline with resources built by the caller.
    pub fn with_resources(config: PipelineConfig, resources: Resources) -> Self {
        Pipeline {
            config,
            resources,
            cancellation: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get the shared resources.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    fn lemmatizer(&self) -> Arc<dyn Lemmatizer> {
        match &self.resources.lexicon {
            Some(lexicon) => Arc::new(SuffixLemmatizer::with_lexicon(Arc::clone(lexicon))),
            None => Arc::new(SuffixLemmatizer::new()),
        }
    }

    /// Read and normalize the input table. Returns the row count read too.
    pub fn normalize(&self) -> Result<(usize, Vec<NormalizedWord>)> {
        let rows = read_word_table(&self.config.input_file)?;
        let normalizer = WordNormalizer::new(&self.config.normalization, self.lemmatizer())?;
        let words = normalizer.normalize(&rows);
        Ok((rows.len(), words))
    }

    /// Normalize the input and compute standardized features.
    pub fn build_features(&self) -> Result<Vec<WordRecord>> {
        let (_, words) = self.normalize()?;
        Ok(self.features_for(&words))
    }

    fn features_for(&self, words: &[NormalizedWord]) -> Vec<WordRecord> {
        FeatureBuilder::new(self.config.features.clone(), Arc::clone(&self.resources.frequency))
            .build(words)
    }

    fn engine(&self) -> Result<ClusteringEngine> {
        Ok(ClusteringEngine::new(self.config.clustering.clone())?
            .with_cancellation(self.cancellation.clone()))
    }

    /// Run everything up to and including the grid search.
    pub fn search(&self) -> Result<GridSearchResult> {
        let records = self.build_features()?;
        self.engine()?.search(&records)
    }

    /// Like [`Pipeline::search`], also returning every candidate's score.
    pub fn search_with_scores(&self) -> Result<(GridSearchResult, Vec<CandidateScore>)> {
        let records = self.build_features()?;
        self.engine()?.search_with_scores(&records)
    }

    /// Run the full pipeline and write every output.
    pub fn run(&self) -> Result<PipelineReport> {
        let start = Instant::now();

        info!("Reading {}", self.config.input_file.display());
        let (rows_read, words) = self.normalize()?;

        let mut records = self.features_for(&words);

        if self.config.write_intermediate {
            let temp_dir = self.config.temp_dir();
            write_preprocessed(&temp_dir, &words)?;
            write_features(&temp_dir, &records)?;
            info!("Wrote intermediate tables to {}", temp_dir.display());
        }

        let outcome = self.engine()?.cluster(&mut records)?;

        let filter = ContentFilter::new(
            self.config.filter.clone(),
            self.resources.lexicon.clone(),
            Arc::clone(&self.resources.blocklist),
        );
        let filtered = filter.filter(&records);

        let export = Exporter::new(&self.config.output_dir).export(&filtered, &outcome.summary)?;

        let report = PipelineReport {
            rows_read,
            words_clustered: records.len(),
            words_exported: filtered.len(),
            search: outcome.search,
            summary: outcome.summary,
            export,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Pipeline finished in {} ms: {} rows, {} clustered, {} exported",
            report.duration_ms, report.rows_read, report.words_clustered, report.words_exported
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WordTierError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::new(dir.path().join("missing.csv"), dir.path().join("out"));
        let pipeline = Pipeline::with_resources(config, Resources::default());

        assert!(matches!(
            pipeline.run(),
            Err(WordTierError::InputUnavailable { .. })
        ));
    }

    #[test]
    fn test_missing_resource_file_fails_early() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::new(dir.path().join("words.csv"), dir.path().join("out"))
            .with_lexicon_file(dir.path().join("lexicon.txt"));

        assert!(matches!(
            Pipeline::new(config),
            Err(WordTierError::InputUnavailable { .. })
        ));
    }

    #[test]
    fn test_two_words_is_empty_population() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("words.csv");
        fs::write(&input, "word,frequency\nCAT,10\nDOG,5\n").unwrap();

        let config = PipelineConfig::new(&input, dir.path().join("out"))
            .with_write_intermediate(false);
        let pipeline = Pipeline::with_resources(config, Resources::default());

        assert!(matches!(
            pipeline.run(),
            Err(WordTierError::EmptyPopulation { population: 2, .. })
        ));
    }
}
