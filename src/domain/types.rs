//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - queried in-memory by the warp engine
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Monthly slots per year record (January through December).
pub const MONTHS_PER_YEAR: usize = 12;

/// Three-letter month labels in record order (index 0 = January).
pub const MONTH_ABBREV: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Which model converts an anomaly into a date shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelChoice {
    /// Deviation from the per-year warming pace implied by the target.
    LocalLinear,
    /// Progress along the baseline → target warming trajectory.
    Proportional,
}

impl ModelChoice {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelChoice::LocalLinear => "local-linear",
            ModelChoice::Proportional => "proportional",
        }
    }
}

/// Which anomaly feeds the warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// The January–December mean anomaly of the input year.
    Annual,
    /// The anomaly of the input date's month, gap-filled when possible.
    Monthly,
}

impl Granularity {
    pub fn display_name(self) -> &'static str {
        match self {
            Granularity::Annual => "annual",
            Granularity::Monthly => "monthly",
        }
    }
}

/// Named warp-target presets.
///
/// These are the target tuples the tool grew up with; explicit
/// `--baseline-year` / `--target-year` / `--target-anomaly` flags override
/// individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// +1.5 °C by 2050, progress measured from 1880.
    Midcentury,
    /// +1.5 °C by 2050, progress measured from the Paris Agreement (2016).
    Paris,
    /// +1.5 °C by 2100, progress measured from 1880.
    Century,
}

impl Preset {
    pub fn config(self) -> WarpConfig {
        match self {
            Preset::Midcentury => WarpConfig {
                baseline_year: 1880,
                target_year: 2050,
                target_anomaly: 1.5,
            },
            Preset::Paris => WarpConfig {
                baseline_year: 2016,
                target_year: 2050,
                target_anomaly: 1.5,
            },
            Preset::Century => WarpConfig {
                baseline_year: 1880,
                target_year: 2100,
                target_anomaly: 1.5,
            },
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Preset::Midcentury => "midcentury",
            Preset::Paris => "paris",
            Preset::Century => "century",
        }
    }
}

/// Warp-target parameters shared by both models.
///
/// `baseline_year` only matters to the proportional model; the local-linear
/// model projects from the current year alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarpConfig {
    pub baseline_year: i32,
    pub target_year: i32,
    /// Anomaly (°C vs the 1951–1980 mean) the trajectory reaches in
    /// `target_year`.
    pub target_anomaly: f64,
}

/// One calendar year of temperature anomalies (°C vs the 1951–1980 mean).
///
/// Absent values stay `None`. Nothing in this crate substitutes a default
/// for a missing anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,
    /// January–December mean (the dataset's `J-D` column).
    pub annual: Option<f64>,
    /// Monthly anomalies, index 0 = January.
    pub months: [Option<f64>; MONTHS_PER_YEAR],
}

impl YearRecord {
    /// A record with every slot absent.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            annual: None,
            months: [None; MONTHS_PER_YEAR],
        }
    }
}

/// Immutable anomaly series keyed by year.
///
/// Lookups are by exact year only; the series never interpolates between
/// years or substitutes values for missing ones.
#[derive(Debug, Clone, Default)]
pub struct TemperatureSeries {
    years: HashMap<i32, YearRecord>,
}

impl TemperatureSeries {
    /// Build a series from parsed rows.
    ///
    /// If the input carries the same year more than once, the later record
    /// wins. Well-formed datasets emit each year once, so this only decides
    /// the outcome for malformed input.
    pub fn from_records(records: Vec<YearRecord>) -> Self {
        let mut years = HashMap::with_capacity(records.len());
        for record in records {
            years.insert(record.year, record);
        }
        Self { years }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Annual-mean anomaly for `year`.
    ///
    /// A year whose annual mean has not been published yet behaves exactly
    /// like a missing year: both are [`AppError::YearNotFound`].
    pub fn annual_anomaly(&self, year: i32) -> Result<f64, AppError> {
        self.years
            .get(&year)
            .and_then(|record| record.annual)
            .ok_or(AppError::YearNotFound { year })
    }

    /// The twelve monthly anomalies for `year`, absences preserved.
    pub fn monthly_anomalies(&self, year: i32) -> Result<[Option<f64>; MONTHS_PER_YEAR], AppError> {
        self.years
            .get(&year)
            .map(|record| record.months)
            .ok_or(AppError::YearNotFound { year })
    }

    /// Most recent year with a published annual mean.
    pub fn latest_annual(&self) -> Option<(i32, f64)> {
        self.years
            .values()
            .filter_map(|record| record.annual.map(|anomaly| (record.year, anomaly)))
            .max_by_key(|(year, _)| *year)
    }

    /// Summary counts for report and TUI headers.
    pub fn stats(&self) -> SeriesStats {
        let mut span: Option<(i32, i32)> = None;
        for &year in self.years.keys() {
            span = Some(match span {
                None => (year, year),
                Some((first, last)) => (first.min(year), last.max(year)),
            });
        }
        SeriesStats {
            n_years: self.years.len(),
            year_span: span,
        }
    }
}

/// Dataset summary for report and TUI headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub n_years: usize,
    /// `(first, last)` captured years, `None` for an empty series.
    pub year_span: Option<(i32, i32)>,
}

/// Outcome of a single warp computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarpResult {
    /// Anomaly that fed the model (°C).
    pub anomaly_used: f64,
    /// Input date shifted by the whole-day floor of `days_shift`.
    pub warped_date: NaiveDate,
    /// Model diagnostic: the anomaly difference for local-linear, the
    /// anomaly itself for proportional.
    pub diagnostic: f64,
    /// Raw fractional day shift, before flooring to whole days.
    pub days_shift: f64,
}

/// One entry of a rolling warp-rate series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpPoint {
    /// Year the anomaly came from, stringified for display.
    pub label: String,
    /// Day shift the local-linear model produced for that year.
    pub warp_rate: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub model: ModelChoice,
    pub granularity: Granularity,
    pub warp: WarpConfig,
    /// Trailing window (years) for the rolling warp-rate series.
    pub window: usize,
    /// Use the deterministic synthetic series instead of fetching.
    pub offline: bool,
    /// Seed for the synthetic series.
    pub sample_seed: u64,
}

/// A saved warp-series snapshot (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    /// When the snapshot was written.
    pub saved_at: DateTime<Utc>,
    /// Reference date the rolling window was computed against.
    pub asof_date: NaiveDate,
    pub config: WarpConfig,
    pub window: usize,
    pub points: Vec<WarpPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, annual: Option<f64>) -> YearRecord {
        YearRecord {
            year,
            annual,
            months: [None; MONTHS_PER_YEAR],
        }
    }

    #[test]
    fn annual_lookup_hits_exact_year_only() {
        let series = TemperatureSeries::from_records(vec![
            record(2023, Some(1.17)),
            record(2024, Some(1.28)),
        ]);

        let got = series.annual_anomaly(2024).unwrap();
        assert!(
            (got - 1.28).abs() < 1e-12,
            "expected 1.28 for 2024, got {got}"
        );
        assert_eq!(
            series.annual_anomaly(2025),
            Err(AppError::YearNotFound { year: 2025 })
        );
    }

    #[test]
    fn unpublished_annual_mean_reads_as_missing_year() {
        let mut rec = record(2025, None);
        rec.months[0] = Some(1.33);
        let series = TemperatureSeries::from_records(vec![rec]);

        assert_eq!(
            series.annual_anomaly(2025),
            Err(AppError::YearNotFound { year: 2025 })
        );
        // The monthly side still answers for the same year.
        let months = series.monthly_anomalies(2025).unwrap();
        assert_eq!(months[0], Some(1.33));
        assert_eq!(months[1], None);
    }

    #[test]
    fn duplicate_years_keep_the_later_record() {
        let series = TemperatureSeries::from_records(vec![
            record(2020, Some(0.9)),
            record(2020, Some(1.01)),
        ]);

        assert_eq!(series.len(), 1);
        let got = series.annual_anomaly(2020).unwrap();
        assert!(
            (got - 1.01).abs() < 1e-12,
            "later duplicate should win, got {got}"
        );
    }

    #[test]
    fn stats_cover_the_year_span() {
        let series = TemperatureSeries::from_records(vec![
            record(1880, Some(-0.17)),
            record(1999, None),
            record(2024, Some(1.28)),
        ]);

        let stats = series.stats();
        assert_eq!(stats.n_years, 3);
        assert_eq!(stats.year_span, Some((1880, 2024)));
        assert_eq!(TemperatureSeries::default().stats().year_span, None);
    }

    #[test]
    fn latest_annual_skips_years_without_a_mean() {
        let series = TemperatureSeries::from_records(vec![
            record(2023, Some(1.17)),
            record(2024, Some(1.28)),
            record(2025, None),
        ]);

        assert_eq!(series.latest_annual(), Some((2024, 1.28)));
    }

    #[test]
    fn presets_map_to_their_target_tuples() {
        let cfg = Preset::Paris.config();
        assert_eq!(cfg.baseline_year, 2016);
        assert_eq!(cfg.target_year, 2050);
        assert!((cfg.target_anomaly - 1.5).abs() < 1e-12);

        assert_eq!(Preset::Century.config().target_year, 2100);
        assert_eq!(Preset::Midcentury.config().baseline_year, 1880);
    }
}
