//! Writers for per-rank word lists, the record table and the run summary.
//!
//! Layout under the output directory:
//! ```text
//! clusters_by_label/cluster0_words.csv
//! clusters_by_label/cluster1_words.csv
//! clusters_by_label/cluster2_words.csv
//! final_cleaned_clusters.csv
//! summary.json
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::{Writer, WriterBuilder};
use log::info;
use serde::{Deserialize, Serialize};

use crate::clustering::engine::ClusteringSummary;
use crate::clustering::weights::WeightTriple;
use crate::error::Result;
use crate::lexicon::normalize::NormalizedWord;
use crate::record::{RankLabel, WordRecord, count_by_rank, partition_by_rank};

/// Directory holding one word list per rank label.
pub const CLUSTERS_DIR: &str = "clusters_by_label";
/// Filtered record table.
pub const FINAL_TABLE_FILE: &str = "final_cleaned_clusters.csv";
/// Run summary.
pub const SUMMARY_FILE: &str = "summary.json";
/// Normalized word table, written to the temp directory.
pub const PREPROCESSED_FILE: &str = "preprocessed.csv";
/// Feature table, written to the temp directory.
pub const FEATURES_FILE: &str = "features.csv";

/// File name of the word list for a rank label.
pub fn cluster_file_name(label: RankLabel) -> String {
    format!("cluster{label}_words.csv")
}

/// One exported table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordRow<'a> {
    pub word: &'a str,
    pub lemma: &'a str,
    pub corpus_frequency: f64,
    pub real_world_frequency: f64,
    pub real_world_log: f64,
    pub frequency_z: f64,
    pub real_world_z: f64,
    pub spelling_z: f64,
    pub composite_submission: f64,
    pub composite_real_world: f64,
    pub composite_spelling: f64,
    pub rank: Option<RankLabel>,
    pub difficulty: Option<&'static str>,
}

impl<'a> From<&'a WordRecord> for RecordRow<'a> {
    fn from(record: &'a WordRecord) -> Self {
        RecordRow {
            word: &record.word,
            lemma: &record.lemma,
            corpus_frequency: record.corpus_frequency,
            real_world_frequency: record.real_world_frequency,
            real_world_log: record.real_world_log,
            frequency_z: record.standardized.frequency,
            real_world_z: record.standardized.real_world,
            spelling_z: record.standardized.spelling,
            composite_submission: record.composite[0],
            composite_real_world: record.composite[1],
            composite_spelling: record.composite[2],
            rank: record.rank,
            difficulty: record.difficulty().map(|d| d.name()),
        }
    }
}

/// Contents of `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub num_clusters: usize,
    /// Words per label in the clustered population.
    pub cluster_counts: BTreeMap<RankLabel, usize>,
    /// Words per label after content filtering.
    pub exported_counts: BTreeMap<RankLabel, usize>,
    pub weights: WeightTriple,
    pub quality_score: f64,
    pub population: usize,
    pub generated_at: DateTime<Utc>,
}

impl ExportSummary {
    /// Combine a clustering summary with the filtered records.
    pub fn new(clustering: &ClusteringSummary, exported: &[WordRecord]) -> Self {
        ExportSummary {
            num_clusters: clustering.num_clusters,
            cluster_counts: clustering.cluster_counts.clone(),
            exported_counts: count_by_rank(exported),
            weights: clustering.weights,
            quality_score: clustering.quality_score,
            population: clustering.population,
            generated_at: Utc::now(),
        }
    }
}

/// Paths written by a full export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub cluster_files: Vec<PathBuf>,
    pub table_file: PathBuf,
    pub summary_file: PathBuf,
    pub summary: ExportSummary,
}

/// Writes the final results of a run into an output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    /// Create a new exporter.
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Exporter {
            output_dir: output_dir.into(),
        }
    }

    /// Get the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write one word list per rank label, labels ascending.
    pub fn write_cluster_lists(&self, records: &[WordRecord]) -> Result<Vec<PathBuf>> {
        let dir = self.output_dir.join(CLUSTERS_DIR);
        fs::create_dir_all(&dir)?;

        let mut paths = Vec::new();
        for (label, words) in partition_by_rank(records) {
            let path = dir.join(cluster_file_name(label));
            let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
            for word in &words {
                writer.write_record([word])?;
            }
            writer.flush()?;

            info!("Wrote {} words to {}", words.len(), path.display());
            paths.push(path);
        }

        Ok(paths)
    }

    /// Write the record table.
    pub fn write_table(&self, records: &[WordRecord]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(FINAL_TABLE_FILE);
        write_records(&path, records)?;
        Ok(path)
    }

    /// Write the summary as pretty JSON.
    pub fn write_summary(&self, summary: &ExportSummary) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Write every final output for the filtered records.
    pub fn export(&self, filtered: &[WordRecord], clustering: &ClusteringSummary) -> Result<ExportReport> {
        let cluster_files = self.write_cluster_lists(filtered)?;
        let table_file = self.write_table(filtered)?;
        let summary = ExportSummary::new(clustering, filtered);
        let summary_file = self.write_summary(&summary)?;

        info!(
            "Exported {} of {} words to {}",
            filtered.len(),
            clustering.population,
            self.output_dir.display()
        );

        Ok(ExportReport {
            cluster_files,
            table_file,
            summary_file,
            summary,
        })
    }
}

/// Write a record table with header to `path`.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[WordRecord]) -> Result<()> {
    let mut writer = Writer::from_path(path.as_ref())?;
    for record in records {
        writer.serialize(RecordRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the normalized word table to `dir/preprocessed.csv`.
pub fn write_preprocessed<P: AsRef<Path>>(dir: P, words: &[NormalizedWord]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(PREPROCESSED_FILE);

    let mut writer = Writer::from_path(&path)?;
    for word in words {
        writer.serialize(word)?;
    }
    writer.flush()?;
    Ok(path)
}

/// Write the feature table to `dir/features.csv`.
pub fn write_features<P: AsRef<Path>>(dir: P, records: &[WordRecord]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(FEATURES_FILE);
    write_records(&path, records)?;
    Ok(path)
}
