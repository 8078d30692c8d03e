//! Export the rolling warp-rate series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::WarpPoint;
use crate::error::AppError;

/// Write per-year warp rates to a CSV file.
pub fn write_series_csv(path: &Path, points: &[WarpPoint]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::config(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writer
        .write_record(["year", "warp_rate_days"])
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;
    for p in points {
        let rate = format!("{:.6}", p.warp_rate);
        writer
            .write_record([p.label.as_str(), rate.as_str()])
            .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::config(format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}
