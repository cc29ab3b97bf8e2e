//! Population z-score standardization of the three signal groups.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::features::spelling::SPELLING_SIGNAL_COUNT;
use crate::record::WordRecord;

/// Standardized scores of one word.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardizedSignals {
    /// Standardized corpus frequency.
    pub frequency: f64,
    /// Standardized log real-world frequency.
    pub real_world: f64,
    /// Mean of the standardized spelling sub-signals.
    pub spelling: f64,
}

/// Mean and population standard deviation of one signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl SignalStats {
    /// Fit the statistics over a whole population (ddof = 0).
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return SignalStats {
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        SignalStats {
            mean,
            std_dev: variance.sqrt(),
        }
    }

    /// True when the signal carries no variance worth dividing by.
    ///
    /// Identical values can leave a rounding-sized deviation behind, so the
    /// cut-off scales with the magnitude of the mean.
    pub fn is_degenerate(&self) -> bool {
        !self.std_dev.is_finite() || self.std_dev <= 10.0 * f64::EPSILON * self.mean.abs().max(1.0)
    }

    /// Standardize a single value. Degenerate signals map to 0.
    pub fn transform(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// Standardize a column of values against its own population.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    let stats = SignalStats::fit(values);
    if stats.is_degenerate() {
        debug!(
            "Degenerate signal over {} values (mean {:.4}); standardized to 0",
            values.len(),
            stats.mean
        );
    }
    values.iter().map(|&v| stats.transform(v)).collect()
}

/// Standardize every column of a row-major table independently.
pub fn standardize_columns<const N: usize>(rows: &[[f64; N]]) -> Vec<[f64; N]> {
    let mut output = vec![[0.0; N]; rows.len()];

    for column in 0..N {
        let values: Vec<f64> = rows.iter().map(|row| row[column]).collect();
        for (row, value) in output.iter_mut().zip(standardize(&values)) {
            row[column] = value;
        }
    }

    output
}

/// Fill in the standardized scores of every record in the population.
pub fn standardize_population(records: &mut [WordRecord]) {
    let frequency: Vec<f64> = records.iter().map(|r| r.corpus_frequency).collect();
    let real_world: Vec<f64> = records.iter().map(|r| r.real_world_log).collect();
    let spelling_rows: Vec<[f64; SPELLING_SIGNAL_COUNT]> =
        records.iter().map(|r| r.spelling.as_array()).collect();

    let frequency = standardize(&frequency);
    let real_world = standardize(&real_world);
    let spelling = standardize_columns(&spelling_rows);

    for (i, record) in records.iter_mut().enumerate() {
        record.standardized = StandardizedSignals {
            frequency: frequency[i],
            real_world: real_world[i],
            spelling: spelling[i].iter().sum::<f64>() / SPELLING_SIGNAL_COUNT as f64,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::spelling::SpellingSignals;

    #[test]
    fn test_standardize_zero_mean_unit_variance() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let standardized = standardize(&values);

        let mean: f64 = standardized.iter().sum::<f64>() / 5.0;
        let variance: f64 = standardized.iter().map(|v| v * v).sum::<f64>() / 5.0;
        assert!(mean.abs() < 1e-12);
        assert!((variance - 1.0).abs() < 1e-12);
        assert!((standardized[0] + std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_identical_values_standardize_to_zero() {
        for value in [0.0, 7.0, 0.1, -12.0] {
            let standardized = standardize(&vec![value; 9]);
            assert!(standardized.iter().all(|v| *v == 0.0));
        }
        assert!(standardize(&[]).is_empty());
    }

    #[test]
    fn test_standardize_columns_independent() {
        let rows = vec![[1.0, 5.0], [3.0, 5.0]];
        let standardized = standardize_columns(&rows);
        assert_eq!(standardized, vec![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_standardize_population() {
        let mut records = vec![
            WordRecord::new("CAT", "CAT", 10.0, 0.1, -2.3, SpellingSignals::from_lemma("CAT")),
            WordRecord::new("DOG", "DOG", 20.0, 0.1, -2.3, SpellingSignals::from_lemma("DOG")),
            WordRecord::new("OTTER", "OTTER", 30.0, 0.1, -2.3, SpellingSignals::from_lemma("OTTER")),
        ];
        standardize_population(&mut records);

        assert!(records[0].standardized.frequency < 0.0);
        assert_eq!(records[1].standardized.frequency, 0.0);
        assert!(records[2].standardized.frequency > 0.0);
        assert!(records.iter().all(|r| r.standardized.real_world == 0.0));

        let spelling_mean: f64 = records.iter().map(|r| r.standardized.spelling).sum::<f64>() / 3.0;
        assert!(spelling_mean.abs() < 1e-12);
        assert!(records.iter().all(|r| r.standardized.spelling.is_finite()));
    }
}
