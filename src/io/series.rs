//! Read/write warp-series JSON snapshots.
//!
//! Series JSON is the "portable" representation of one rolling run:
//! - the warp configuration it was computed under
//! - run metadata (as-of date, trailing window)
//! - the per-year warp rates, oldest first
//!
//! The schema is defined by `domain::SeriesFile`.

use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, Utc};

use crate::domain::{SeriesFile, WarpConfig, WarpPoint};
use crate::error::AppError;

/// Write a warp-series JSON file.
pub fn write_series_json(
    path: &Path,
    asof_date: NaiveDate,
    config: &WarpConfig,
    window: usize,
    points: &[WarpPoint],
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create series JSON '{}': {e}",
            path.display()
        ))
    })?;

    let series = SeriesFile {
        tool: "cclock".to_string(),
        saved_at: Utc::now(),
        asof_date,
        config: *config,
        window,
        points: points.to_vec(),
    };

    serde_json::to_writer_pretty(file, &series)
        .map_err(|e| AppError::config(format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a warp-series JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!(
            "Failed to open series JSON '{}': {e}",
            path.display()
        ))
    })?;
    let series: SeriesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid series JSON: {e}")))?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_schema_survives_a_json_round_trip() {
        let series = SeriesFile {
            tool: "cclock".to_string(),
            saved_at: "2025-08-25T12:00:00Z".parse().unwrap(),
            asof_date: NaiveDate::from_ymd_opt(2025, 8, 25).unwrap(),
            config: WarpConfig {
                baseline_year: 1880,
                target_year: 2050,
                target_anomaly: 1.5,
            },
            window: 12,
            points: vec![
                WarpPoint {
                    label: "2023".to_string(),
                    warp_rate: -4.71,
                },
                WarpPoint {
                    label: "2024".to_string(),
                    warp_rate: 6.25,
                },
            ],
        };

        let json = serde_json::to_string(&series).unwrap();
        let back: SeriesFile = serde_json::from_str(&json).unwrap();

        assert_eq!(back.tool, series.tool);
        assert_eq!(back.saved_at, series.saved_at);
        assert_eq!(back.asof_date, series.asof_date);
        assert_eq!(back.config, series.config);
        assert_eq!(back.window, series.window);
        assert_eq!(back.points, series.points);
    }

    #[test]
    fn missing_file_reads_as_a_config_error() {
        let err = read_series_json(Path::new("/nonexistent/cclock-series.json")).unwrap_err();

        assert!(matches!(err, AppError::Config(_)), "{err:?}");
        assert_eq!(err.exit_code(), 2);
    }
}
