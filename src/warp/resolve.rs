//! Resolve the anomaly that drives a warp for a given date.
//!
//! Annual granularity reads the year's January–December mean. Monthly
//! granularity reads the input month's slot after a gap-fill pass over the
//! year's vector; a slot that is still absent is a hard miss, never a
//! default.

use chrono::{Datelike, NaiveDate};

use crate::domain::{Granularity, TemperatureSeries};
use crate::error::AppError;
use crate::math::fill_monthly_gaps;

/// Resolve `(year, anomaly)` for `date` at the requested granularity.
pub fn anomaly_for_date(
    series: &TemperatureSeries,
    date: NaiveDate,
    granularity: Granularity,
) -> Result<(i32, f64), AppError> {
    let year = date.year();
    match granularity {
        Granularity::Annual => Ok((year, series.annual_anomaly(year)?)),
        Granularity::Monthly => {
            let months = series.monthly_anomalies(year)?;
            let filled = fill_monthly_gaps(&months);
            let anomaly = filled[date.month0() as usize].ok_or(AppError::MonthUnavailable {
                year,
                month: date.month(),
            })?;
            Ok((year, anomaly))
        }
    }
}
