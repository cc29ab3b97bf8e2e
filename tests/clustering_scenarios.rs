use std::collections::HashMap;
use std::sync::Arc;

use wordtier::clustering::{
    ClusteringConfig, ClusteringEngine, GridSearch, WeightGrid, run_final_kmeans,
};
use wordtier::error::{Result, WordTierError};
use wordtier::features::{FeatureBuilder, FeatureConfig, StandardizedSignals};
use wordtier::frequency::{DEFAULT_LOG_FLOOR, FrequencySource};
use wordtier::lexicon::NormalizedWord;
use wordtier::record::{NUM_CLUSTERS, RankLabel, WordRecord, count_by_rank};

/// Frequency source backed by an exact map, for reproducible fixtures.
struct FixedFrequencies(HashMap<String, f64>);

impl FrequencySource for FixedFrequencies {
    fn frequency(&self, lemma: &str) -> Option<f64> {
        self.0.get(lemma).copied()
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

const WORDS: [&str; 12] = [
    "CAT", "DOG", "SUN", "HAT", "OTTER", "MAPLE", "CIDER", "PEARL", "QUOKKA", "ZYGOTE", "FJORD",
    "SPHINX",
];

const CORPUS: [f64; 12] = [
    100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0, 10.0, 5.0, 1.0,
];

/// Real-world frequency falling with corpus frequency, in three bands.
fn real_world(index: usize) -> f64 {
    let band = [1e-2, 1e-5, 1e-8][index / 4];
    band * (1.0 - (index % 4) as f64 * 0.1)
}

fn normalized_words() -> Vec<NormalizedWord> {
    WORDS
        .iter()
        .zip(CORPUS)
        .map(|(word, corpus_frequency)| NormalizedWord {
            word: word.to_string(),
            lemma: word.to_string(),
            corpus_frequency,
        })
        .collect()
}

fn twelve_word_population() -> Vec<WordRecord> {
    let frequencies = WORDS
        .iter()
        .enumerate()
        .map(|(i, word)| (word.to_string(), real_world(i)))
        .collect();
    let builder = FeatureBuilder::new(
        FeatureConfig::default(),
        Arc::new(FixedFrequencies(frequencies)),
    );
    builder.build(&normalized_words())
}

fn config() -> ClusteringConfig {
    ClusteringConfig::default().with_thread_pool_size(2)
}

#[test]
fn twelve_word_scenario_finds_acceptable_weighting() -> Result<()> {
    let mut records = twelve_word_population();
    let outcome = ClusteringEngine::new(config())?.cluster(&mut records)?;

    assert!(outcome.summary.quality_score > 0.5);
    assert!(outcome.summary.weights.is_dominant());

    let counts = count_by_rank(&records);
    assert_eq!(counts.len(), NUM_CLUSTERS);
    assert!(counts.values().all(|&count| count > 0));
    assert_eq!(counts.values().sum::<usize>(), 12);

    // The most frequent band is the easiest tier.
    assert!(records[..4].iter().all(|r| r.rank == Some(RankLabel::EASY)));
    assert!(records[8..].iter().all(|r| r.rank == Some(RankLabel::HARD)));
    Ok(())
}

#[test]
fn rank_means_are_monotone() -> Result<()> {
    let mut records = twelve_word_population();
    ClusteringEngine::new(config())?.cluster(&mut records)?;

    let mean = |label: RankLabel| {
        let values: Vec<f64> = records
            .iter()
            .filter(|r| r.rank == Some(label))
            .map(|r| r.real_world_log)
            .collect();
        values.iter().sum::<f64>() / values.len() as f64
    };

    assert!(mean(RankLabel::EASY) >= mean(RankLabel::MEDIUM));
    assert!(mean(RankLabel::MEDIUM) >= mean(RankLabel::HARD));
    Ok(())
}

#[test]
fn final_clustering_is_deterministic() -> Result<()> {
    let mut first = twelve_word_population();
    let mut second = twelve_word_population();

    let a = ClusteringEngine::new(ClusteringConfig::default().with_thread_pool_size(1))?
        .cluster(&mut first)?;
    let b = ClusteringEngine::new(ClusteringConfig::default().with_thread_pool_size(4))?
        .cluster(&mut second)?;

    assert_eq!(a.summary, b.summary);
    let ranks_a: Vec<_> = first.iter().map(|r| r.rank).collect();
    let ranks_b: Vec<_> = second.iter().map(|r| r.rank).collect();
    assert_eq!(ranks_a, ranks_b);
    Ok(())
}

#[test]
fn reapplying_chosen_weights_reproduces_labels() -> Result<()> {
    let mut records = twelve_word_population();
    let outcome = ClusteringEngine::new(config())?.cluster(&mut records)?;
    let ranks: Vec<_> = records.iter().map(|r| r.rank).collect();

    let mut again = twelve_word_population();
    run_final_kmeans(&mut again, &outcome.summary.weights, &config())?;
    let ranks_again: Vec<_> = again.iter().map(|r| r.rank).collect();

    assert_eq!(ranks, ranks_again);
    Ok(())
}

#[test]
fn every_candidate_satisfies_dominance() -> Result<()> {
    let signals: Vec<StandardizedSignals> =
        twelve_word_population().iter().map(|r| r.standardized).collect();
    let (result, scores) = GridSearch::new(config())?.run_with_scores(&signals)?;

    assert_eq!(scores.len(), WeightGrid.candidates().len());
    assert!(scores.iter().all(|c| c.weights.is_dominant()));
    assert!(scores.iter().all(|c| c.weights.real_world > c.weights.submission));
    assert!(result.weights.real_world > result.weights.spelling);
    Ok(())
}

#[test]
fn two_words_is_empty_population() -> Result<()> {
    let mut records = twelve_word_population();
    records.truncate(2);

    let result = ClusteringEngine::new(config())?.cluster(&mut records);
    match result {
        Err(WordTierError::EmptyPopulation { population, .. }) => assert_eq!(population, 2),
        other => panic!("Expected EmptyPopulation, got {other:?}"),
    }
    assert!(records.iter().all(|r| r.rank.is_none()));
    Ok(())
}

#[test]
fn unreachable_threshold_reports_failure_context() -> Result<()> {
    let mut records = twelve_word_population();
    let engine = ClusteringEngine::new(config().with_min_score(0.999_999))?;

    match engine.cluster(&mut records) {
        Err(WordTierError::NoAcceptableWeighting {
            population,
            threshold,
            best_score,
            candidates_evaluated,
        }) => {
            assert_eq!(population, 12);
            assert_eq!(threshold, 0.999_999);
            assert!(best_score.is_some());
            assert_eq!(candidates_evaluated, 285);
        }
        other => panic!("Expected NoAcceptableWeighting, got {other:?}"),
    }
    Ok(())
}

#[test]
fn zero_real_world_frequency_uses_log_floor() {
    let mut frequencies: HashMap<String, f64> = WORDS
        .iter()
        .enumerate()
        .map(|(i, word)| (word.to_string(), real_world(i)))
        .collect();
    frequencies.insert("QUOKKA".to_string(), 0.0);
    frequencies.remove("SPHINX");

    let builder = FeatureBuilder::new(
        FeatureConfig::default(),
        Arc::new(FixedFrequencies(frequencies)),
    );
    let records = builder.build(&normalized_words());

    assert_eq!(records[8].real_world_log, DEFAULT_LOG_FLOOR);
    assert_eq!(records[11].real_world_log, DEFAULT_LOG_FLOOR);
    assert!(records.iter().all(|r| r.standardized.real_world.is_finite()));
}

#[test]
fn unknown_word_never_ranks_above_known_rare_words() -> Result<()> {
    let frequencies = WORDS
        .iter()
        .enumerate()
        .map(|(i, word)| (word.to_string(), real_world(i)))
        .collect();
    let builder = FeatureBuilder::new(
        FeatureConfig::default(),
        Arc::new(FixedFrequencies(frequencies)),
    );

    let mut words = normalized_words();
    words.insert(
        4,
        NormalizedWord {
            word: "XYZZYQ".to_string(),
            lemma: "XYZZYQ".to_string(),
            corpus_frequency: 1.0,
        },
    );
    let mut records = builder.build(&words);
    ClusteringEngine::new(config())?.cluster(&mut records)?;

    let unknown = &records[4];
    assert_eq!(unknown.word, "XYZZYQ");
    assert!(
        records
            .iter()
            .all(|r| r.real_world_log >= unknown.real_world_log)
    );

    let rarest_known = records
        .iter()
        .filter(|r| r.word != "XYZZYQ")
        .filter_map(|r| r.rank)
        .max()
        .unwrap();
    assert!(unknown.rank.unwrap() >= rarest_known);
    assert_eq!(unknown.rank, Some(RankLabel::HARD));
    Ok(())
}

#[test]
fn identical_signals_standardize_to_zero() {
    let builder = FeatureBuilder::new(
        FeatureConfig::default(),
        Arc::new(FixedFrequencies(HashMap::new())),
    );
    let words: Vec<NormalizedWord> = ["CAT", "DOG", "COW"]
        .iter()
        .map(|word| NormalizedWord {
            word: word.to_string(),
            lemma: word.to_string(),
            corpus_frequency: 5.0,
        })
        .collect();

    let records = builder.build(&words);
    assert!(records.iter().all(|r| r.standardized.frequency == 0.0));
    assert!(records.iter().all(|r| r.standardized.real_world == 0.0));
}
