//! Shared warp-pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! series acquisition -> anomaly resolution -> warp -> rolling series
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;

use crate::data::{GissClient, SOURCE_LABEL, SampleConfig, generate_sample, sample_label};
use crate::domain::{RunConfig, TemperatureSeries, WarpPoint, WarpResult};
use crate::error::AppError;
use crate::warp::{WarpModel, anomaly_for_date, rolling_warp_series};

/// A temperature series plus the label of where it came from.
#[derive(Debug, Clone)]
pub struct SeriesSource {
    pub series: TemperatureSeries,
    pub label: String,
}

/// Acquire the anomaly series for a run.
///
/// `asof_date` anchors the synthetic series' coverage in offline mode; the
/// remote table always covers everything it has published.
pub fn fetch_series(config: &RunConfig, asof_date: NaiveDate) -> Result<SeriesSource, AppError> {
    if config.offline {
        let sample = SampleConfig::through(asof_date, config.sample_seed);
        return Ok(SeriesSource {
            series: generate_sample(&sample)?,
            label: sample_label(config.sample_seed),
        });
    }

    let client = GissClient::from_env()?;
    Ok(SeriesSource {
        series: client.fetch_series()?,
        label: SOURCE_LABEL.to_string(),
    })
}

/// Warp one date against a fetched series.
pub fn run_warp(
    config: &RunConfig,
    source: &SeriesSource,
    input_date: NaiveDate,
) -> Result<WarpResult, AppError> {
    let (year, anomaly) = anomaly_for_date(&source.series, input_date, config.granularity)?;
    let model = WarpModel::from_choice(config.model, &config.warp);
    model.warp(year, anomaly, input_date)
}

/// Rolling warp-rate series over the trailing window ending at `asof_date`.
pub fn run_series(
    config: &RunConfig,
    source: &SeriesSource,
    asof_date: NaiveDate,
) -> Result<Vec<WarpPoint>, AppError> {
    rolling_warp_series(&source.series, &config.warp, config.window, asof_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Granularity, ModelChoice, Preset};

    fn offline_config() -> RunConfig {
        RunConfig {
            model: ModelChoice::LocalLinear,
            granularity: Granularity::Annual,
            warp: Preset::Midcentury.config(),
            window: 5,
            offline: true,
            sample_seed: 42,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn offline_source_is_deterministic_for_a_seed() {
        let config = offline_config();
        let asof = date(2025, 8, 25);

        let a = fetch_series(&config, asof).unwrap();
        let b = fetch_series(&config, asof).unwrap();

        assert_eq!(a.label, "synthetic sample (seed 42)");
        assert_eq!(a.series.stats(), b.series.stats());
        assert_eq!(
            a.series.annual_anomaly(2024).unwrap(),
            b.series.annual_anomaly(2024).unwrap()
        );
    }

    #[test]
    fn annual_warp_errs_until_the_year_completes() {
        let config = offline_config();
        let source = fetch_series(&config, date(2025, 3, 10)).unwrap();

        // The as-of year has no published annual mean yet, like the real
        // table before January of the following year.
        assert_eq!(
            run_warp(&config, &source, date(2025, 3, 10)),
            Err(AppError::YearNotFound { year: 2025 })
        );

        let result = run_warp(&config, &source, date(2024, 6, 15)).unwrap();
        let anomaly = source.series.annual_anomaly(2024).unwrap();
        assert_eq!(result.anomaly_used, anomaly);
    }

    #[test]
    fn monthly_warp_reads_the_input_months_slot() {
        let mut config = offline_config();
        config.granularity = Granularity::Monthly;
        let source = fetch_series(&config, date(2025, 8, 25)).unwrap();

        let result = run_warp(&config, &source, date(2025, 5, 10)).unwrap();
        let months = source.series.monthly_anomalies(2025).unwrap();
        assert_eq!(Some(result.anomaly_used), months[4]);

        // August itself is not published yet and has no right-hand neighbor
        // for the gap filler, so the slot stays a hard miss.
        assert_eq!(
            run_warp(&config, &source, date(2025, 8, 10)),
            Err(AppError::MonthUnavailable {
                year: 2025,
                month: 8
            })
        );
    }

    #[test]
    fn rolling_series_is_chronological_and_skips_the_pending_year() {
        let config = offline_config();
        let asof = date(2025, 8, 25);
        let source = fetch_series(&config, asof).unwrap();

        let points = run_series(&config, &source, asof).unwrap();
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();

        assert_eq!(labels, ["2021", "2022", "2023", "2024"]);
    }
}
