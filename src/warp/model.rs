//! The two anomaly → date-warp mappings.
//!
//! Both models answer the same question: "given this year's temperature
//! anomaly, what date does the planet think it is?"
//!
//! - **Local-linear**: the remaining warming budget `target_anomaly -
//!   current_anomaly` spread over the years to `target_year` gives a
//!   per-year pace; the warp is the deviation from that pace, at 365 days
//!   per anomaly-year.
//! - **Proportional**: the anomaly's progress toward `target_anomaly` is
//!   mapped onto the `baseline_year → target_year` span, and the warp is the
//!   distance from today to that trajectory year, at 365.25 days per year.
//!
//! Conventions shared by both:
//! - anomalies are °C relative to the 1951–1980 mean, absences never reach
//!   this layer
//! - the fractional day shift is floored onto the calendar, so a -5.62-day
//!   warp lands six calendar days earlier (midnight plus a negative fraction
//!   falls on the previous date)

use chrono::{Duration, NaiveDate};

use crate::domain::{ModelChoice, WarpConfig, WarpResult};
use crate::error::AppError;

/// Day count for the local-linear shift (calendar days, no leap correction).
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// Day count for the proportional shift (leap-corrected mean year).
pub const MEAN_DAYS_PER_YEAR: f64 = 365.25;

/// A configured warp model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WarpModel {
    /// Shift by the deviation from the per-year pace needed to hit the target.
    LocalLinear { target_year: i32, target_anomaly: f64 },
    /// Shift onto the year whose trajectory progress matches the anomaly.
    Proportional {
        baseline_year: i32,
        target_year: i32,
        target_anomaly: f64,
    },
}

impl WarpModel {
    pub fn from_choice(choice: ModelChoice, config: &WarpConfig) -> Self {
        match choice {
            ModelChoice::LocalLinear => WarpModel::LocalLinear {
                target_year: config.target_year,
                target_anomaly: config.target_anomaly,
            },
            ModelChoice::Proportional => WarpModel::Proportional {
                baseline_year: config.baseline_year,
                target_year: config.target_year,
                target_anomaly: config.target_anomaly,
            },
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(&self) -> &'static str {
        match self {
            WarpModel::LocalLinear { .. } => "local-linear",
            WarpModel::Proportional { .. } => "proportional",
        }
    }

    /// Warp `input_date` using the anomaly observed for `current_year`.
    pub fn warp(
        &self,
        current_year: i32,
        current_anomaly: f64,
        input_date: NaiveDate,
    ) -> Result<WarpResult, AppError> {
        match *self {
            WarpModel::LocalLinear {
                target_year,
                target_anomaly,
            } => local_linear_warp(
                current_year,
                current_anomaly,
                input_date,
                target_year,
                target_anomaly,
            ),
            WarpModel::Proportional {
                baseline_year,
                target_year,
                target_anomaly,
            } => proportional_warp(
                current_year,
                current_anomaly,
                input_date,
                baseline_year,
                target_year,
                target_anomaly,
            ),
        }
    }
}

fn local_linear_warp(
    current_year: i32,
    current_anomaly: f64,
    input_date: NaiveDate,
    target_year: i32,
    target_anomaly: f64,
) -> Result<WarpResult, AppError> {
    let years_to_target = target_year - current_year;

    // Zero horizon: the per-year shift is defined as 0 (no divide), which
    // degenerates the warp to the identity.
    let shift_per_year = if years_to_target == 0 {
        0.0
    } else {
        (target_anomaly - current_anomaly) / f64::from(years_to_target)
    };

    let expected_anomaly = current_anomaly + shift_per_year;
    // Kept as the two-step difference; folding it to `-shift_per_year`
    // changes the floating-point rounding.
    let anomaly_difference = current_anomaly - expected_anomaly;
    let days_shift = anomaly_difference * CALENDAR_DAYS_PER_YEAR;

    Ok(WarpResult {
        anomaly_used: current_anomaly,
        warped_date: shift_date(input_date, days_shift)?,
        diagnostic: anomaly_difference,
        days_shift,
    })
}

fn proportional_warp(
    current_year: i32,
    current_anomaly: f64,
    input_date: NaiveDate,
    baseline_year: i32,
    target_year: i32,
    target_anomaly: f64,
) -> Result<WarpResult, AppError> {
    if !target_anomaly.is_finite() || target_anomaly <= 0.0 {
        return Err(AppError::InvalidTarget { target_anomaly });
    }

    // The warped year clamps at the target; anomalies below zero land before
    // `baseline_year`, which is intentional and not clamped.
    let warped_year = if current_anomaly >= target_anomaly {
        f64::from(target_year)
    } else {
        let proportion = current_anomaly / target_anomaly;
        f64::from(baseline_year) + proportion * f64::from(target_year - baseline_year)
    };

    let year_offset = warped_year - f64::from(current_year);
    let days_shift = year_offset * MEAN_DAYS_PER_YEAR;

    Ok(WarpResult {
        anomaly_used: current_anomaly,
        warped_date: shift_date(input_date, days_shift)?,
        diagnostic: current_anomaly,
        days_shift,
    })
}

/// Apply a fractional day shift to a date as whole calendar days (floored).
fn shift_date(input_date: NaiveDate, days_shift: f64) -> Result<NaiveDate, AppError> {
    let whole_days = days_shift.floor() as i64;
    input_date
        .checked_add_signed(Duration::days(whole_days))
        .ok_or_else(|| {
            AppError::config(format!(
                "Warped date out of calendar range ({whole_days} days from {input_date})."
            ))
        })
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn local_linear_matches_hand_computed_example() {
        let model = WarpModel::LocalLinear {
            target_year: 2050,
            target_anomaly: 1.5,
        };
        let result = model.warp(2024, 1.1, date(2024, 1, 1)).unwrap();

        // pace = 0.4 / 26 per year; running exactly at the current anomaly
        // means we're behind pace, so the clock warps backwards.
        let expected_diff = -(0.4 / 26.0);
        assert!(
            (result.diagnostic - expected_diff).abs() < 1e-12,
            "anomaly difference: got {}, want {expected_diff}",
            result.diagnostic
        );
        assert!(
            (result.days_shift + 5.6153846).abs() < 1e-6,
            "days shift: got {}",
            result.days_shift
        );
        assert_eq!(result.warped_date, date(2023, 12, 26));
        assert!((result.anomaly_used - 1.1).abs() < 1e-12);
    }

    #[test]
    fn local_linear_sign_tracks_pace() {
        let model = WarpModel::LocalLinear {
            target_year: 2050,
            target_anomaly: 1.5,
        };
        let behind = model.warp(2024, 1.1, date(2024, 1, 1)).unwrap();
        let ahead = model.warp(2024, 1.7, date(2024, 1, 1)).unwrap();

        assert!(behind.days_shift < 0.0, "below target pace warps backwards");
        assert!(ahead.days_shift > 0.0, "above target warps forwards");
    }

    #[test]
    fn local_linear_on_target_anomaly_is_identity() {
        let model = WarpModel::LocalLinear {
            target_year: 2050,
            target_anomaly: 1.5,
        };
        let result = model.warp(2024, 1.5, date(2024, 6, 15)).unwrap();

        assert_eq!(result.days_shift, 0.0);
        assert_eq!(result.warped_date, date(2024, 6, 15));
    }

    #[test]
    fn local_linear_zero_horizon_is_identity() {
        let model = WarpModel::LocalLinear {
            target_year: 2024,
            target_anomaly: 1.5,
        };
        let result = model.warp(2024, 1.1, date(2024, 6, 15)).unwrap();

        assert_eq!(result.days_shift, 0.0);
        assert_eq!(result.warped_date, date(2024, 6, 15));
    }

    #[test]
    fn proportional_matches_hand_computed_example() {
        let model = WarpModel::Proportional {
            baseline_year: 1880,
            target_year: 2100,
            target_anomaly: 1.5,
        };
        let result = model.warp(2024, 1.1, date(2024, 1, 1)).unwrap();

        // warped year = 1880 + (1.1 / 1.5) * 220 ≈ 2041.33, about 17.3 years
        // ahead of 2024.
        let warped_year = 2024.0 + result.days_shift / MEAN_DAYS_PER_YEAR;
        assert!(
            (warped_year - 2041.3333333).abs() < 1e-6,
            "warped year: got {warped_year}"
        );
        assert!(
            (result.days_shift - 6331.0).abs() < 1e-6,
            "days shift: got {}",
            result.days_shift
        );
        assert_eq!(result.warped_date.year(), 2041);
        assert!((result.diagnostic - 1.1).abs() < 1e-12);
    }

    #[test]
    fn proportional_clamps_at_the_target() {
        let model = WarpModel::Proportional {
            baseline_year: 1880,
            target_year: 2100,
            target_anomaly: 1.5,
        };
        let at_target = model.warp(2024, 1.5, date(2024, 1, 1)).unwrap();
        let past_target = model.warp(2024, 2.3, date(2024, 1, 1)).unwrap();

        assert_eq!(at_target.days_shift, past_target.days_shift);
        // 76 years at 365.25 days is exactly 27759 days, which is also the
        // exact calendar span 2024-01-01 → 2100-01-01.
        assert_eq!(at_target.warped_date, date(2100, 1, 1));
    }

    #[test]
    fn proportional_extrapolates_below_the_baseline() {
        let model = WarpModel::Proportional {
            baseline_year: 1880,
            target_year: 2100,
            target_anomaly: 1.5,
        };
        let result = model.warp(2024, -0.3, date(2024, 1, 1)).unwrap();

        let warped_year = 2024.0 + result.days_shift / MEAN_DAYS_PER_YEAR;
        assert!(
            (warped_year - 1836.0).abs() < 1e-9,
            "cooling should land before the baseline, got {warped_year}"
        );
        assert!(result.warped_date < date(1880, 1, 1));
    }

    #[test]
    fn proportional_rejects_non_positive_targets() {
        for bad in [0.0, -1.5, f64::NAN] {
            let model = WarpModel::Proportional {
                baseline_year: 1880,
                target_year: 2100,
                target_anomaly: bad,
            };
            let err = model.warp(2024, 1.1, date(2024, 1, 1)).unwrap_err();
            assert!(
                matches!(err, AppError::InvalidTarget { .. }),
                "target {bad}: got {err:?}"
            );
        }
    }

    #[test]
    fn proportional_is_monotone_in_the_anomaly() {
        let model = WarpModel::Proportional {
            baseline_year: 1880,
            target_year: 2100,
            target_anomaly: 1.5,
        };
        let anomalies = [-0.5, -0.1, 0.0, 0.4, 0.9, 1.2, 1.5, 1.9];
        let mut last = f64::NEG_INFINITY;
        for anomaly in anomalies {
            let result = model.warp(2024, anomaly, date(2024, 1, 1)).unwrap();
            assert!(
                result.days_shift >= last,
                "warp went backwards at anomaly {anomaly}"
            );
            last = result.days_shift;
        }
    }

    #[test]
    fn from_choice_copies_the_config() {
        let config = WarpConfig {
            baseline_year: 2016,
            target_year: 2050,
            target_anomaly: 1.5,
        };
        assert_eq!(
            WarpModel::from_choice(ModelChoice::LocalLinear, &config),
            WarpModel::LocalLinear {
                target_year: 2050,
                target_anomaly: 1.5
            }
        );
        assert_eq!(
            WarpModel::from_choice(ModelChoice::Proportional, &config),
            WarpModel::Proportional {
                baseline_year: 2016,
                target_year: 2050,
                target_anomaly: 1.5
            }
        );
    }
}
