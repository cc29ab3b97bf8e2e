//! Reader for the raw word table.
//!
//! The table is a CSV file with a header row; the first column is the word
//! and the second its usage count:
//! ```csv
//! word,frequency
//! CAT,120
//! ZEBRA,4
//! ```
//! Header names are ignored, columns are read by position.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WordTierError};

/// One row of the raw word table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWordRow {
    pub word: String,
    pub frequency: f64,
}

/// Reads `(word, frequency)` rows from CSV.
#[derive(Debug, Clone)]
pub struct WordTableReader {
    /// CSV delimiter character (default: ',')
    delimiter: u8,
}

impl Default for WordTableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl WordTableReader {
    /// Create a new reader with comma delimiter.
    pub fn new() -> Self {
        WordTableReader { delimiter: b',' }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter as u8;
        self
    }

    /// Read the table from a file.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<RawWordRow>> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| WordTierError::input_unavailable(path, e.to_string()))?;

        let rows = self.read(file).map_err(|e| match e {
            WordTierError::Csv(e) => WordTierError::input_unavailable(path, e.to_string()),
            other => other,
        })?;

        info!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Read the table from any reader.
    pub fn read<R: Read>(&self, input: R) -> Result<Vec<RawWordRow>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .has_headers(true)
            .from_reader(input);

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            // Line 1 is the header.
            if let Some(row) = parse_row(&record, index + 2) {
                rows.push(row);
            }
        }

        Ok(rows)
    }
}

/// Convert one CSV record, degrading a bad count to 0.
fn parse_row(record: &StringRecord, line: usize) -> Option<RawWordRow> {
    let (Some(word), Some(raw_frequency)) = (record.get(0), record.get(1)) else {
        warn!("Skipping line {line}: expected a word and a frequency");
        return None;
    };

    let frequency = match raw_frequency.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            warn!("Line {line}: invalid frequency {raw_frequency:?} for {word:?}, using 0");
            0.0
        }
    };

    Some(RawWordRow {
        word: word.to_string(),
        frequency,
    })
}

/// Read a comma-separated word table from a file.
pub fn read_word_table<P: AsRef<Path>>(path: P) -> Result<Vec<RawWordRow>> {
    WordTableReader::new().read_path(path)
}
