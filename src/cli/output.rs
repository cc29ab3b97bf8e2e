//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, WordTierArgs};
use crate::clustering::grid_search::CandidateScore;
use crate::clustering::weights::WeightTriple;
use crate::error::Result;
use crate::record::RankLabel;

/// Result structure for a full run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub rows_read: usize,
    pub words_clustered: usize,
    pub words_exported: usize,
    pub weights: WeightTriple,
    pub quality_score: f64,
    pub cluster_counts: BTreeMap<RankLabel, usize>,
    pub exported_counts: BTreeMap<RankLabel, usize>,
    pub output_dir: String,
    pub duration_ms: u64,
}

/// Result structure for the grid search.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub weights: WeightTriple,
    pub quality_score: f64,
    pub population: usize,
    pub candidates_evaluated: usize,
    pub candidates_scored: usize,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<CandidateScore>>,
}

/// Result structure for the feature table.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeaturesResult {
    pub words: usize,
    pub output: String,
}

/// Result structure for config creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct InitConfigResult {
    pub path: String,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &WordTierArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &WordTierArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("RunResult") => output_run_human(&value),
        _ if std::any::type_name::<T>().contains("SearchResult") => output_search_human(&value),
        _ => output_generic_human(&value),
    }
}

/// Output a run result in human format.
fn output_run_human(value: &serde_json::Value) -> Result<()> {
    let Some(obj) = value.as_object() else {
        return output_generic_human(value);
    };

    println!("Tiering Results:");
    println!("════════════════");

    if let Some(weights) = obj.get("weights") {
        println!("Weights: {}", format_weights(weights));
    }
    if let Some(score) = obj.get("quality_score").and_then(|s| s.as_f64()) {
        println!("Silhouette: {score:.4}");
    }

    println!();
    println!("{:<10} {:>10} {:>10}", "Tier", "Clustered", "Exported");
    println!("─────────────────────────────────");

    let clustered = obj.get("cluster_counts").and_then(|c| c.as_object());
    let exported = obj.get("exported_counts").and_then(|c| c.as_object());
    for label in RankLabel::all() {
        let key = label.to_string();
        let count = |counts: Option<&serde_json::Map<String, serde_json::Value>>| {
            counts
                .and_then(|c| c.get(&key))
                .and_then(|v| v.as_u64())
                .unwrap_or(0)
        };
        println!(
            "{:<10} {:>10} {:>10}",
            format!("{} ({})", label, label.difficulty().name()),
            count(clustered),
            count(exported)
        );
    }

    println!();
    if let Some(rows) = obj.get("rows_read").and_then(|r| r.as_u64()) {
        println!("Rows read: {rows}");
    }
    if let Some(dir) = obj.get("output_dir").and_then(|d| d.as_str()) {
        println!("Output: {dir}");
    }
    if let Some(duration) = obj.get("duration_ms").and_then(|d| d.as_u64()) {
        println!("Total time: {duration}ms");
    }

    Ok(())
}

/// Output a grid search result in human format.
fn output_search_human(value: &serde_json::Value) -> Result<()> {
    let Some(obj) = value.as_object() else {
        return output_generic_human(value);
    };

    println!("Grid Search:");
    println!("════════════");

    if let Some(weights) = obj.get("weights") {
        println!("Best weights: {}", format_weights(weights));
    }
    if let Some(score) = obj.get("quality_score").and_then(|s| s.as_f64()) {
        println!("Silhouette: {score:.4}");
    }
    if let Some(population) = obj.get("population").and_then(|p| p.as_u64()) {
        println!("Population: {population}");
    }
    if let (Some(evaluated), Some(scored)) = (
        obj.get("candidates_evaluated").and_then(|c| c.as_u64()),
        obj.get("candidates_scored").and_then(|c| c.as_u64()),
    ) {
        println!("Candidates: {scored} scored of {evaluated}");
    }
    if let Some(duration) = obj.get("duration_ms").and_then(|d| d.as_u64()) {
        println!("Search time: {duration}ms");
    }

    if let Some(candidates) = obj.get("candidates").and_then(|c| c.as_array()) {
        println!();
        println!("Candidates:");
        println!("───────────");
        for candidate in candidates {
            let weights = candidate
                .get("weights")
                .map(format_weights)
                .unwrap_or_default();
            let score = candidate
                .get("score")
                .and_then(|s| s.as_f64())
                .map_or_else(|| "-".to_string(), |s| format!("{s:.4}"));
            println!("  {weights}  {score}");
        }
    }

    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &WordTierArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a serialized weight triple.
fn format_weights(value: &serde_json::Value) -> String {
    let weight = |name: &str| value.get(name).and_then(|w| w.as_f64()).unwrap_or(0.0);
    format!(
        "submission={:.1}, real_world={:.1}, spelling={:.1}",
        weight("submission"),
        weight("real_world"),
        weight("spelling")
    )
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        serde_json::Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
