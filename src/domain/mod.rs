//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`ModelChoice`, `Granularity`, `Preset`)
//! - the anomaly series (`TemperatureSeries`, `YearRecord`)
//! - warp outputs (`WarpResult`, `WarpPoint`, `SeriesFile`)

pub mod types;

pub use types::*;
