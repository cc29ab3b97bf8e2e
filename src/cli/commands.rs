//! Command implementations for the wordtier CLI.

use std::path::Path;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PipelineConfig;
use crate::error::{Result, WordTierError};
use crate::io::export::write_records;
use crate::pipeline::Pipeline;

/// Execute a CLI command.
pub fn execute_command(args: WordTierArgs) -> Result<()> {
    match &args.command {
        Command::Run(run_args) => run_pipeline(run_args.clone(), &args),
        Command::Search(search_args) => run_search(search_args.clone(), &args),
        Command::Features(features_args) => write_feature_table(features_args.clone(), &args),
        Command::InitConfig(init_args) => init_config(init_args.clone(), &args),
    }
}

/// Load the configuration file (or defaults) and apply command line overrides.
pub fn resolve_config(args: &ConfigArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            PipelineConfig::load_from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input_file = input.clone();
    }
    if let Some(frequency_file) = &args.frequency_file {
        config.frequency_file = Some(frequency_file.clone());
    }
    if let Some(min_score) = args.min_score {
        config.clustering.min_score = min_score;
    }
    if let Some(threads) = args.threads {
        config.clustering.thread_pool_size = Some(threads);
    }
    if let Some(seed) = args.seed {
        config.clustering.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

/// Run the full pipeline.
fn run_pipeline(args: RunArgs, cli_args: &WordTierArgs) -> Result<()> {
    let mut config = resolve_config(&args.config)?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if args.no_intermediate {
        config.write_intermediate = false;
    }

    info!("Tiering words from {}", config.input_file.display());
    let report = Pipeline::new(config)?.run()?;

    output_result(
        "Pipeline completed successfully",
        &RunResult {
            rows_read: report.rows_read,
            words_clustered: report.words_clustered,
            words_exported: report.words_exported,
            weights: report.summary.weights,
            quality_score: report.summary.quality_score,
            cluster_counts: report.summary.cluster_counts,
            exported_counts: report.export.summary.exported_counts,
            output_dir: report
                .export
                .table_file
                .parent()
                .map(|dir| dir.to_string_lossy().to_string())
                .unwrap_or_default(),
            duration_ms: report.duration_ms,
        },
        cli_args,
    )
}

/// Run the grid search only.
fn run_search(args: SearchArgs, cli_args: &WordTierArgs) -> Result<()> {
    let config = resolve_config(&args.config)?;
    let pipeline = Pipeline::new(config)?;

    let (result, scores) = pipeline.search_with_scores()?;

    output_result(
        "Grid search completed",
        &SearchResult {
            weights: result.weights,
            quality_score: result.score,
            population: result.population,
            candidates_evaluated: result.candidates_evaluated,
            candidates_scored: result.candidates_scored,
            duration_ms: result.duration_ms,
            candidates: args.all_candidates.then_some(scores),
        },
        cli_args,
    )
}

/// Write the standardized feature table.
fn write_feature_table(args: FeaturesArgs, cli_args: &WordTierArgs) -> Result<()> {
    let config = resolve_config(&args.config)?;
    let records = Pipeline::new(config)?.build_features()?;

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    write_records(&args.output, &records)?;

    output_result(
        "Feature table written",
        &FeaturesResult {
            words: records.len(),
            output: args.output.to_string_lossy().to_string(),
        },
        cli_args,
    )
}

/// Write a default configuration file.
fn init_config(args: InitConfigArgs, cli_args: &WordTierArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(WordTierError::invalid_config(format!(
            "{} already exists. Use --force to overwrite.",
            args.path.display()
        )));
    }

    write_default_config(&args.path)?;

    output_result(
        "Configuration created successfully",
        &InitConfigResult {
            path: args.path.to_string_lossy().to_string(),
        },
        cli_args,
    )
}

/// Write the default pipeline configuration as pretty JSON.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    PipelineConfig::default().save_to_file(path)
}
