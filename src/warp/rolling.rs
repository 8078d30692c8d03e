//! Rolling warp-rate series over a trailing window of years.

use chrono::{Datelike, NaiveDate};

use crate::domain::{TemperatureSeries, WarpConfig, WarpPoint};
use crate::error::AppError;
use crate::warp::WarpModel;

/// Default trailing window, in years.
pub const DEFAULT_WINDOW: usize = 12;

/// Local-linear day shifts for the last `window` years, oldest first.
///
/// Years without a published annual mean are skipped rather than
/// zero-filled, so the output can be shorter than the window. A window that
/// yields nothing at all is an error the caller is expected to recover from
/// (placeholder chart or table), never a fatal condition for the process.
pub fn rolling_warp_series(
    series: &TemperatureSeries,
    config: &WarpConfig,
    window: usize,
    current_date: NaiveDate,
) -> Result<Vec<WarpPoint>, AppError> {
    let model = WarpModel::LocalLinear {
        target_year: config.target_year,
        target_anomaly: config.target_anomaly,
    };
    let current_year = current_date.year();

    let mut points = Vec::with_capacity(window);
    for offset in 0..window {
        let year = current_year - offset as i32;
        let anomaly = match series.annual_anomaly(year) {
            Ok(anomaly) => anomaly,
            Err(AppError::YearNotFound { .. }) => continue,
            Err(err) => return Err(err),
        };
        let result = model.warp(year, anomaly, current_date)?;
        points.push(WarpPoint {
            label: year.to_string(),
            warp_rate: result.days_shift,
        });
    }

    if points.is_empty() {
        return Err(AppError::InsufficientData { window });
    }

    // Collected newest → oldest; present chronologically.
    points.reverse();
    Ok(points)
}

#[cfg(test)]
mod tests {
    use crate::domain::YearRecord;

    use super::*;

    fn config() -> WarpConfig {
        WarpConfig {
            baseline_year: 1880,
            target_year: 2050,
            target_anomaly: 1.5,
        }
    }

    fn series_with_years(entries: &[(i32, f64)]) -> TemperatureSeries {
        let records = entries
            .iter()
            .map(|&(year, anomaly)| YearRecord {
                annual: Some(anomaly),
                ..YearRecord::empty(year)
            })
            .collect();
        TemperatureSeries::from_records(records)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_years_are_skipped_not_zero_filled() {
        // 2019 absent from an otherwise full 2013..2024 span.
        let mut entries = Vec::new();
        for year in 2013..=2024 {
            if year != 2019 {
                entries.push((year, 0.8 + 0.03 * (year - 2013) as f64));
            }
        }
        let series = series_with_years(&entries);

        let points = rolling_warp_series(&series, &config(), 12, date(2024, 6, 1)).unwrap();
        assert_eq!(points.len(), 11);
        assert!(points.iter().all(|p| p.label != "2019"));
    }

    #[test]
    fn output_is_chronological() {
        let series = series_with_years(&[(2022, 0.89), (2023, 1.17), (2024, 1.28)]);

        let points = rolling_warp_series(&series, &config(), 12, date(2024, 6, 1)).unwrap();
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2022", "2023", "2024"]);
    }

    #[test]
    fn window_bounds_the_lookback() {
        let entries: Vec<(i32, f64)> = (2010..=2024).map(|y| (y, 1.0)).collect();
        let series = series_with_years(&entries);

        let points = rolling_warp_series(&series, &config(), 5, date(2024, 6, 1)).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points.first().unwrap().label, "2020");
        assert_eq!(points.last().unwrap().label, "2024");
    }

    #[test]
    fn rates_match_the_local_linear_model() {
        let series = series_with_years(&[(2023, 1.17)]);

        let points = rolling_warp_series(&series, &config(), 12, date(2023, 12, 31)).unwrap();
        assert_eq!(points.len(), 1);
        // pace for 2023 = (1.5 - 1.17) / 27; rate = -pace * 365
        let expected = -(0.33 / 27.0) * 365.0;
        let got = points[0].warp_rate;
        assert!(
            (got - expected).abs() < 1e-9,
            "warp rate: got {got}, want {expected}"
        );
    }

    #[test]
    fn empty_window_is_insufficient_data() {
        let series = series_with_years(&[(1990, 0.4)]);

        let err = rolling_warp_series(&series, &config(), 12, date(2024, 6, 1)).unwrap_err();
        assert_eq!(err, AppError::InsufficientData { window: 12 });

        let err = rolling_warp_series(&series, &config(), 0, date(2024, 6, 1)).unwrap_err();
        assert_eq!(err, AppError::InsufficientData { window: 0 });
    }
}
