//! Debug bundle writer for inspecting the anomaly series and warp math.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};

use crate::app::pipeline::{self, SeriesSource};
use crate::domain::{ModelChoice, RunConfig, MONTH_ABBREV};
use crate::error::AppError;
use crate::math::{fill_monthly_gaps, monthly_derivatives};
use crate::warp::WarpModel;

/// How many trailing years the annual table covers.
const ANNUAL_TABLE_YEARS: i32 = 15;

pub fn write_debug_bundle(
    source: &SeriesSource,
    config: &RunConfig,
    asof_date: NaiveDate,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::config(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let date = asof_date.format("%Y%m%d");
    let path = dir.join(format!("cclock_debug_{date}_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::config(format!("Failed to create debug file: {e}")))?;

    writeln!(file, "# cclock debug bundle")
        .map_err(|e| AppError::config(format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339())
        .map_err(|e| AppError::config(format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- source: {}", source.label)
        .map_err(|e| AppError::config(format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- asof_date: {asof_date}")
        .map_err(|e| AppError::config(format!("Failed to write debug header: {e}")))?;
    writeln!(file, "- model: {}", config.model.display_name())
        .map_err(|e| AppError::config(format!("Failed to write debug header: {e}")))?;
    writeln!(
        file,
        "- target: {}",
        crate::report::describe_target(&config.warp)
    )
    .map_err(|e| AppError::config(format!("Failed to write debug header: {e}")))?;
    writeln!(
        file,
        "- granularity: {} | window: {}",
        config.granularity.display_name(),
        config.window
    )
    .map_err(|e| AppError::config(format!("Failed to write debug header: {e}")))?;

    let stats = source.series.stats();
    writeln!(file, "\n## Series")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    match stats.year_span {
        Some((first, last)) => {
            writeln!(file, "- years: {} ({first}..{last})", stats.n_years)
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
        }
        None => {
            writeln!(file, "- years: 0 (empty series)")
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
        }
    }
    match source.series.latest_annual() {
        Some((year, anomaly)) => {
            writeln!(file, "- latest annual: {year} at {anomaly:+.2}°C")
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
        }
        None => {
            writeln!(file, "- latest annual: none")
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
        }
    }

    write_annual_table(&mut file, source, asof_date)?;
    write_monthly_table(&mut file, source, asof_date)?;
    write_warp_results(&mut file, source, config, asof_date)?;
    write_rolling_table(&mut file, source, config, asof_date)?;

    Ok(path)
}

fn write_annual_table(
    file: &mut File,
    source: &SeriesSource,
    asof_date: NaiveDate,
) -> Result<(), AppError> {
    writeln!(file, "\n## Recent annual anomalies")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| year | anomaly |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;

    let last = asof_date.year();
    for year in (last - ANNUAL_TABLE_YEARS + 1)..=last {
        let cell = match source.series.annual_anomaly(year) {
            Ok(anomaly) => format!("{anomaly:+.2}"),
            Err(_) => "-".to_string(),
        };
        writeln!(file, "| {year} | {cell} |")
            .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    }
    Ok(())
}

fn write_monthly_table(
    file: &mut File,
    source: &SeriesSource,
    asof_date: NaiveDate,
) -> Result<(), AppError> {
    let year = asof_date.year();
    writeln!(file, "\n## Monthly detail: {year}")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;

    let months = match source.series.monthly_anomalies(year) {
        Ok(months) => months,
        Err(err) => {
            writeln!(file, "- {err}")
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
            return Ok(());
        }
    };
    let derivatives = monthly_derivatives(&months);
    let filled = fill_monthly_gaps(&months);

    writeln!(file, "| month | anomaly | derivative | filled |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - | - | - |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    for (idx, label) in MONTH_ABBREV.iter().enumerate() {
        let derivative = if idx < derivatives.len() {
            derivatives[idx]
        } else {
            None
        };
        writeln!(
            file,
            "| {label} | {} | {} | {} |",
            fmt_opt(months[idx]),
            fmt_opt(derivative),
            fmt_opt(filled[idx])
        )
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    }
    Ok(())
}

fn write_warp_results(
    file: &mut File,
    source: &SeriesSource,
    config: &RunConfig,
    asof_date: NaiveDate,
) -> Result<(), AppError> {
    writeln!(file, "\n## Warp results: {asof_date}")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;

    let resolved = crate::warp::anomaly_for_date(&source.series, asof_date, config.granularity);
    let (year, anomaly) = match resolved {
        Ok(pair) => pair,
        Err(err) => {
            writeln!(file, "- anomaly resolution failed: {err}")
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
            return Ok(());
        }
    };
    writeln!(file, "- resolved anomaly: {anomaly:+.2}°C (year {year})")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;

    writeln!(file, "| model | anomaly_used | days_shift | warped_date | diagnostic |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - | - | - | - |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;

    for choice in [ModelChoice::LocalLinear, ModelChoice::Proportional] {
        let model = WarpModel::from_choice(choice, &config.warp);
        match model.warp(year, anomaly, asof_date) {
            Ok(result) => {
                writeln!(
                    file,
                    "| {} | {:+.3} | {:+.3} | {} | {:+.6} |",
                    model.display_name(),
                    result.anomaly_used,
                    result.days_shift,
                    result.warped_date,
                    result.diagnostic
                )
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
            }
            Err(err) => {
                writeln!(file, "| {} | - | - | - | - |", model.display_name())
                    .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
                writeln!(file, "- {} failed: {err}", model.display_name())
                    .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
            }
        }
    }
    Ok(())
}

fn write_rolling_table(
    file: &mut File,
    source: &SeriesSource,
    config: &RunConfig,
    asof_date: NaiveDate,
) -> Result<(), AppError> {
    writeln!(file, "\n## Rolling warp rates (window {})", config.window)
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;

    let points = match pipeline::run_series(config, source, asof_date) {
        Ok(points) => points,
        Err(err) => {
            writeln!(file, "- {err}")
                .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
            return Ok(());
        }
    };

    writeln!(file, "| year | days |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    writeln!(file, "| - | - |")
        .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    for p in &points {
        writeln!(file, "| {} | {:+.3} |", p.label, p.warp_rate)
            .map_err(|e| AppError::config(format!("Failed to write debug: {e}")))?;
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:+.2}"),
        _ => "-".to_string(),
    }
}
