//! Deterministic synthetic anomaly series for offline runs.
//!
//! The generator follows the gross shape of the observed global-means
//! series: a slightly cool, level baseline until the ramp start, then a
//! steady warming trend. It exists so the clock and reports work without
//! network access, with the same publication shape as the real table (the
//! latest year only partially filled, annual mean pending).

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{MONTHS_PER_YEAR, TemperatureSeries, YearRecord};
use crate::error::AppError;

/// First generated year (the observed record also starts here).
const START_YEAR: i32 = 1880;

/// Year the synthetic warming ramp starts.
const RAMP_START: i32 = 1970;

/// Ramp slope, °C per year.
const RAMP_SLOPE: f64 = 0.019;

/// Pre-ramp level, °C.
const BASE_LEVEL: f64 = -0.18;

/// Noise scale for annual levels, °C.
const ANNUAL_SIGMA: f64 = 0.08;

/// Extra month-to-month scatter around the annual level, °C.
const MONTHLY_SIGMA: f64 = 0.12;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub end_year: i32,
    /// Complete months already "published" for `end_year` (0..=12).
    pub published_months: usize,
    pub seed: u64,
}

impl SampleConfig {
    /// Cover `1880..=date.year()`, with the final year published up to the
    /// month before `date`'s (the real table runs one month behind).
    pub fn through(date: NaiveDate, seed: u64) -> Self {
        Self {
            end_year: date.year(),
            published_months: date.month0() as usize,
            seed,
        }
    }
}

/// Label reports use in place of the remote source name.
pub fn sample_label(seed: u64) -> String {
    format!("synthetic sample (seed {seed})")
}

pub fn generate_sample(config: &SampleConfig) -> Result<TemperatureSeries, AppError> {
    if config.end_year < START_YEAR {
        return Err(AppError::config(format!(
            "Sample end year {} precedes the series start {START_YEAR}.",
            config.end_year
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let level_noise = Normal::new(0.0, ANNUAL_SIGMA)
        .map_err(|e| AppError::config(format!("Noise distribution error: {e}")))?;
    let month_noise = Normal::new(0.0, MONTHLY_SIGMA)
        .map_err(|e| AppError::config(format!("Noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity((config.end_year - START_YEAR + 1) as usize);
    for year in START_YEAR..=config.end_year {
        let level = base_level(year) + level_noise.sample(&mut rng);
        let published = if year == config.end_year {
            config.published_months.min(MONTHS_PER_YEAR)
        } else {
            MONTHS_PER_YEAR
        };

        let mut record = YearRecord::empty(year);
        let mut sum = 0.0;
        for month in 0..published {
            let value = round2(level + month_noise.sample(&mut rng));
            record.months[month] = Some(value);
            sum += value;
        }
        // The annual mean is published only once the year is complete,
        // like the source table's J-D column.
        if published == MONTHS_PER_YEAR {
            record.annual = Some(round2(sum / MONTHS_PER_YEAR as f64));
        }
        records.push(record);
    }

    Ok(TemperatureSeries::from_records(records))
}

fn base_level(year: i32) -> f64 {
    if year < RAMP_START {
        BASE_LEVEL
    } else {
        BASE_LEVEL + RAMP_SLOPE * f64::from(year - RAMP_START)
    }
}

/// The source table publishes at two decimals; match it.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
