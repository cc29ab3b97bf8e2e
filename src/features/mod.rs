//! Feature computation: spelling signals, standardization and record building.

pub mod builder;
pub mod spelling;
pub mod standardize;

pub use builder::{FeatureBuilder, FeatureConfig};
pub use spelling::SpellingSignals;
pub use standardize::{SignalStats, StandardizedSignals, standardize, standardize_population};
