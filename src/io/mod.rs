//! Reading the raw word table and writing results.

pub mod export;
pub mod reader;

pub use export::{ExportReport, ExportSummary, Exporter, write_features, write_preprocessed, write_records};
pub use reader::{RawWordRow, WordTableReader, read_word_table};
