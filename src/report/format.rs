//! Formatted terminal output for warps and rolling series.
//!
//! We keep formatting code in one place so:
//! - the warp engine stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use chrono::{Datelike, NaiveDate};

use crate::domain::{
    Granularity, ModelChoice, RunConfig, SeriesStats, WarpConfig, WarpPoint, WarpResult,
};
use crate::warp::MEAN_DAYS_PER_YEAR;

/// Format the single-date warp summary (source + series stats + result).
pub fn format_warp_summary(
    source_label: &str,
    stats: &SeriesStats,
    config: &RunConfig,
    input_date: NaiveDate,
    result: &WarpResult,
) -> String {
    let mut out = String::new();

    out.push_str("=== cclock - Carbon Clock ===\n");
    out.push_str(&format!("Source: {source_label}\n"));
    match stats.year_span {
        Some((first, last)) => {
            out.push_str(&format!("Series: {} years ({first}..{last})\n", stats.n_years));
        }
        None => out.push_str("Series: empty\n"),
    }
    out.push_str(&format!(
        "Model: {} | target {}\n",
        config.model.display_name(),
        describe_target(&config.warp),
    ));
    out.push_str(&format!("Date: {input_date}\n"));
    out.push_str(&format!(
        "Anomaly: {:+.2}°C ({})\n",
        result.anomaly_used,
        describe_anomaly_source(config.granularity, input_date),
    ));
    out.push_str(&format!(
        "Shift: {:+.1} days ({})\n",
        result.days_shift,
        describe_diagnostic(config.model, input_date, result),
    ));
    out.push_str(&format!("Warped: {}\n", result.warped_date));

    out
}

/// Format the rolling warp-rate table (newest years last).
pub fn format_series_table(points: &[WarpPoint], window: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Rolling warp rate, trailing {window} years (local-linear):\n"
    ));
    out.push_str(&format!("{:<6} {:>12}\n", "year", "days"));
    out.push_str(&format!("{:-<6} {:-<12}\n", "", ""));
    for p in points {
        out.push_str(&format!("{:<6} {:>12.2}\n", p.label, p.warp_rate));
    }

    out
}

/// Placeholder shown when the trailing window has no usable years.
pub fn format_series_placeholder(window: usize) -> String {
    format!("No warp-rate data in the trailing {window} years.\n")
}

/// One-line target description, e.g. `+1.50°C by 2050 (baseline 1880)`.
pub fn describe_target(config: &WarpConfig) -> String {
    format!(
        "{:+.2}°C by {} (baseline {})",
        config.target_anomaly, config.target_year, config.baseline_year,
    )
}

fn describe_anomaly_source(granularity: Granularity, input_date: NaiveDate) -> String {
    match granularity {
        Granularity::Annual => format!("annual mean for {}", input_date.year()),
        Granularity::Monthly => {
            let month = crate::domain::MONTH_ABBREV[input_date.month0() as usize];
            format!("{month} {}", input_date.year())
        }
    }
}

fn describe_diagnostic(model: ModelChoice, input_date: NaiveDate, result: &WarpResult) -> String {
    match model {
        ModelChoice::LocalLinear => {
            format!("anomaly vs pace {:+.3}°C", result.diagnostic)
        }
        ModelChoice::Proportional => {
            let trajectory_year =
                f64::from(input_date.year()) + result.days_shift / MEAN_DAYS_PER_YEAR;
            format!("trajectory year {trajectory_year:.1}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Preset, SeriesStats};
    use crate::warp::WarpModel;

    fn run_config(model: ModelChoice, granularity: Granularity) -> RunConfig {
        RunConfig {
            model,
            granularity,
            warp: Preset::Midcentury.config(),
            window: 12,
            offline: true,
            sample_seed: 42,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn warp_summary_contains_the_key_lines() {
        let config = run_config(ModelChoice::LocalLinear, Granularity::Annual);
        let model = WarpModel::from_choice(config.model, &config.warp);
        let input = date(2024, 1, 1);
        let result = model.warp(2024, 1.1, input).unwrap();
        let stats = SeriesStats {
            n_years: 145,
            year_span: Some((1880, 2024)),
        };

        let text =
            format_warp_summary("synthetic sample (seed 42)", &stats, &config, input, &result);

        assert!(text.starts_with("=== cclock - Carbon Clock ===\n"), "{text}");
        assert!(text.contains("Source: synthetic sample (seed 42)\n"), "{text}");
        assert!(text.contains("Series: 145 years (1880..2024)\n"), "{text}");
        assert!(
            text.contains("Model: local-linear | target +1.50°C by 2050 (baseline 1880)\n"),
            "{text}"
        );
        assert!(text.contains("Anomaly: +1.10°C (annual mean for 2024)\n"), "{text}");
        assert!(text.contains("Shift: -5.6 days"), "{text}");
        assert!(text.contains("Warped: 2023-12-26\n"), "{text}");
    }

    #[test]
    fn warp_summary_shows_the_trajectory_year_for_proportional() {
        let mut config = run_config(ModelChoice::Proportional, Granularity::Annual);
        config.warp = Preset::Century.config();
        let model = WarpModel::from_choice(config.model, &config.warp);
        let input = date(2024, 1, 1);
        let result = model.warp(2024, 1.1, input).unwrap();
        let stats = SeriesStats {
            n_years: 145,
            year_span: Some((1880, 2024)),
        };

        let text = format_warp_summary("NASA GISTEMP v4", &stats, &config, input, &result);

        assert!(text.contains("trajectory year 2041.3"), "{text}");
        assert!(text.contains("Shift: +6331.0 days"), "{text}");
    }

    #[test]
    fn warp_summary_names_the_month_for_monthly_granularity() {
        let config = run_config(ModelChoice::LocalLinear, Granularity::Monthly);
        let model = WarpModel::from_choice(config.model, &config.warp);
        let input = date(2024, 8, 25);
        let result = model.warp(2024, 1.2, input).unwrap();
        let stats = SeriesStats {
            n_years: 1,
            year_span: Some((2024, 2024)),
        };

        let text = format_warp_summary("NASA GISTEMP v4", &stats, &config, input, &result);

        assert!(text.contains("(Aug 2024)"), "{text}");
    }

    #[test]
    fn series_table_lines_up_and_lists_every_point() {
        let points = vec![
            WarpPoint {
                label: "2023".to_string(),
                warp_rate: -4.7141,
            },
            WarpPoint {
                label: "2024".to_string(),
                warp_rate: 6.25,
            },
        ];

        let text = format_series_table(&points, 12);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5, "{text}");
        assert_eq!(lines[0], "Rolling warp rate, trailing 12 years (local-linear):");
        assert_eq!(lines[1], "year           days");
        assert_eq!(lines[2], "------ ------------");
        assert_eq!(lines[3], "2023          -4.71");
        assert_eq!(lines[4], "2024           6.25");
    }

    #[test]
    fn empty_window_gets_a_placeholder() {
        assert_eq!(
            format_series_placeholder(12),
            "No warp-rate data in the trailing 12 years.\n"
        );
    }
}
