//! NASA GISTEMP integration: global-means anomaly table fetch and parse.

use csv::ReaderBuilder;
use reqwest::blocking::Client;

use crate::domain::{MONTHS_PER_YEAR, TemperatureSeries, YearRecord};
use crate::error::AppError;

/// GISTEMP v4 combined land/ocean global means, monthly plus seasonal
/// columns, °C relative to the 1951–1980 mean.
const DEFAULT_URL: &str = "https://data.giss.nasa.gov/gistemp/tabledata_v4/GLB.Ts+dSST.csv";

/// Environment override for the dataset location (mirrors, test servers).
const URL_ENV: &str = "GISTEMP_URL";

/// Marker GISTEMP prints for a value that has not been published yet.
const MISSING_MARKER: &str = "***";

/// Column of the January anomaly; columns 1..=12 are Jan..Dec.
const FIRST_MONTH_COL: usize = 1;

/// Column of the January–December annual mean (`J-D`).
const ANNUAL_COL: usize = 13;

/// Short label for reports and TUI headers.
pub const SOURCE_LABEL: &str = "NASA GISTEMP v4 (global means)";

pub struct GissClient {
    client: Client,
    url: String,
}

impl GissClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let url = std::env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_URL.to_string());
        // The upstream host rejects clients that present no user agent.
        let client = Client::builder()
            .user_agent(concat!("cclock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::data_source(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, url })
    }

    pub fn fetch_series(&self) -> Result<TemperatureSeries, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::data_source(format!("GISTEMP request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data_source(format!(
                "GISTEMP request failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::data_source(format!("Failed to read GISTEMP response: {e}")))?;

        parse_gistemp_csv(&body)
    }
}

/// Parse the GISTEMP global-means table.
///
/// The file opens with a title line and a header line, and some variants
/// repeat the header mid-file; a record is a data row iff its first field is
/// all ASCII digits. Unpublished values are `***` and stay absent.
pub fn parse_gistemp_csv(text: &str) -> Result<TemperatureSeries, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| AppError::data_source(format!("Malformed GISTEMP CSV: {e}")))?;
        let first = row.get(0).map(str::trim).unwrap_or("");
        if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let year: i32 = first
            .parse()
            .map_err(|e| AppError::data_source(format!("Invalid GISTEMP year '{first}': {e}")))?;

        let mut record = YearRecord::empty(year);
        for month in 0..MONTHS_PER_YEAR {
            record.months[month] = row.get(FIRST_MONTH_COL + month).and_then(parse_anomaly);
        }
        record.annual = row.get(ANNUAL_COL).and_then(parse_anomaly);
        records.push(record);
    }

    if records.is_empty() {
        return Err(AppError::data_source(
            "No usable temperature rows in the GISTEMP response.",
        ));
    }
    Ok(TemperatureSeries::from_records(records))
}

fn parse_anomaly(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == MISSING_MARKER || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
