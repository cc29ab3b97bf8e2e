//! Command line argument parsing for the wordtier CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// wordtier - Tier words into easy, medium and hard by familiarity
#[derive(Parser, Debug, Clone)]
#[command(name = "wordtier")]
#[command(about = "Tier words into easy, medium and hard by real-world familiarity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct WordTierArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl WordTierArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full pipeline and write tiered word lists
    Run(RunArgs),

    /// Run the weight grid search and report the best weighting
    Search(SearchArgs),

    /// Write the standardized feature table
    Features(FeaturesArgs),

    /// Write a default configuration file
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),
}

/// Overrides shared by every command that loads a configuration
#[derive(Parser, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Raw word table (CSV), overrides the configuration
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: Option<PathBuf>,

    /// Real-world frequency list, overrides the configuration
    #[arg(long, value_name = "FREQUENCY_FILE")]
    pub frequency_file: Option<PathBuf>,

    /// Minimum silhouette a weighting must exceed
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Number of threads for the grid search
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// k-means seed
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for a full run
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output directory, overrides the configuration
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Don't write intermediate tables
    #[arg(long)]
    pub no_intermediate: bool,
}

/// Arguments for the grid search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Also list the score of every candidate
    #[arg(long)]
    pub all_candidates: bool,
}

/// Arguments for writing the feature table
#[derive(Parser, Debug, Clone)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output CSV file
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: PathBuf,
}

/// Arguments for writing a default configuration
#[derive(Parser, Debug, Clone)]
pub struct InitConfigArgs {
    /// Path of the configuration file to create
    #[arg(value_name = "CONFIG_FILE")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
