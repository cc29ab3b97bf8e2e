use std::fs;
use std::path::Path;

use tempfile::TempDir;

use wordtier::clustering::CancellationToken;
use wordtier::config::PipelineConfig;
use wordtier::error::{Result, WordTierError};
use wordtier::io::export::{CLUSTERS_DIR, FINAL_TABLE_FILE, SUMMARY_FILE};
use wordtier::pipeline::Pipeline;
use wordtier::record::RankLabel;

const WORDS_CSV: &str = "\
word,frequency
cat,100
Dog,90
sun,80
hat,70
otter,60
maple,50
cider,40
pearl,30
quokka,20
zygote,10
fjord,5
sphinx,1
spell,500
r2d2,40
cat,3
";

const FREQUENCIES: &str = "\
# word count
cat 1000000
dog 900000
sun 800000
hat 700000
otter 1000
maple 900
cider 800
pearl 700
quokka 1
zygote 0.9
fjord 0.8
sphinx 0.7
";

const LEXICON: &str = "\
CAT
DOG
SUN
HAT
OTTER
MAPLE
CIDER
PEARL
QUOKKA
FJORD
SPHINX
";

fn write_fixtures(dir: &Path) -> PipelineConfig {
    fs::write(dir.join("words.csv"), WORDS_CSV).unwrap();
    fs::write(dir.join("frequencies.txt"), FREQUENCIES).unwrap();
    fs::write(dir.join("lexicon.txt"), LEXICON).unwrap();
    fs::write(dir.join("blocklist.txt"), "# inappropriate\ncider\n").unwrap();

    let mut config = PipelineConfig::new(dir.join("words.csv"), dir.join("out"))
        .with_frequency_file(dir.join("frequencies.txt"))
        .with_lexicon_file(dir.join("lexicon.txt"))
        .with_blocklist_file(dir.join("blocklist.txt"));
    config.clustering.thread_pool_size = Some(2);
    config
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn full_pipeline_writes_tiered_outputs() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let config = write_fixtures(dir.path());
    let out = dir.path().join("out");

    let report = Pipeline::new(config)?.run()?;

    assert_eq!(report.rows_read, 15);
    assert_eq!(report.words_clustered, 12);
    assert_eq!(report.words_exported, 10);
    assert!(report.summary.quality_score > 0.5);
    assert!(report.summary.weights.is_dominant());

    let clusters = out.join(CLUSTERS_DIR);
    assert_eq!(
        read_lines(&clusters.join("cluster0_words.csv")),
        vec!["CAT", "DOG", "SUN", "HAT"]
    );
    assert_eq!(
        read_lines(&clusters.join("cluster1_words.csv")),
        vec!["OTTER", "MAPLE", "PEARL"]
    );
    assert_eq!(
        read_lines(&clusters.join("cluster2_words.csv")),
        vec!["QUOKKA", "FJORD", "SPHINX"]
    );

    let table = read_lines(&out.join(FINAL_TABLE_FILE));
    assert_eq!(table.len(), 11);
    assert!(table[0].ends_with("rank,difficulty"));
    assert!(table[1].starts_with("CAT,CAT,103.0,"));
    assert!(table[1].ends_with(",0,easy"));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(SUMMARY_FILE)).unwrap()).unwrap();
    assert_eq!(summary["num_clusters"], 3);
    assert_eq!(summary["population"], 12);
    assert_eq!(summary["cluster_counts"]["1"], 4);
    assert_eq!(summary["exported_counts"]["1"], 3);
    assert_eq!(summary["exported_counts"]["2"], 3);

    assert!(out.join("temp").join("preprocessed.csv").exists());
    assert!(out.join("temp").join("features.csv").exists());
    Ok(())
}

#[test]
fn report_counts_match_rank_labels() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let config = write_fixtures(dir.path()).with_write_intermediate(false);

    let report = Pipeline::new(config)?.run()?;

    let total: usize = report.summary.cluster_counts.values().sum();
    assert_eq!(total, report.words_clustered);
    assert_eq!(report.summary.cluster_counts[&RankLabel::EASY], 4);
    assert!(!dir.path().join("out").join("temp").exists());
    Ok(())
}

#[test]
fn search_only_reports_best_weighting() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(write_fixtures(dir.path()))?;

    let (result, scores) = pipeline.search_with_scores()?;
    assert_eq!(result.population, 12);
    assert_eq!(scores.len(), 285);
    assert_eq!(pipeline.search()?.weights, result.weights);
    assert!(!dir.path().join("out").exists());
    Ok(())
}

#[test]
fn cancelled_pipeline_stops_before_export() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let pipeline = Pipeline::new(write_fixtures(dir.path()))?.with_cancellation(token);
    assert!(matches!(pipeline.run(), Err(WordTierError::Cancelled(_))));
    assert!(!dir.path().join("out").join(SUMMARY_FILE).exists());
    Ok(())
}

#[test]
fn config_file_drives_the_run() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    write_fixtures(dir.path()).save_to_file(&config_path)?;

    let config = PipelineConfig::load_from_file(&config_path)?;
    let report = Pipeline::new(config)?.run()?;
    assert_eq!(report.words_clustered, 12);
    Ok(())
}
