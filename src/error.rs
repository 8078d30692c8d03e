/// Crate-wide error type.
///
/// Exit codes follow the binary's convention: 2 for configuration and usage
/// problems, 3 when the dataset cannot answer the question that was asked,
/// 4 for data-source and runtime failures.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Bad flags, unreadable or unwritable files, out-of-range calendar math.
    Config(String),
    /// A proportional warp needs a target anomaly above zero.
    InvalidTarget { target_anomaly: f64 },
    /// The series has no usable record for the requested year.
    YearNotFound { year: i32 },
    /// The year exists but the requested month has no anomaly, even after
    /// gap filling.
    MonthUnavailable { year: i32, month: u32 },
    /// A rolling window produced no entries at all.
    InsufficientData { window: usize },
    /// Fetch or parse failure in the data acquisition layer, and other
    /// runtime I/O failures (terminal setup, event polling).
    DataSource(String),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::InvalidTarget { .. } => 2,
            Self::YearNotFound { .. }
            | Self::MonthUnavailable { .. }
            | Self::InsufficientData { .. } => 3,
            Self::DataSource(_) => 4,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "{message}"),
            Self::InvalidTarget { target_anomaly } => write!(
                f,
                "invalid warp target: target anomaly must be positive, got {target_anomaly}"
            ),
            Self::YearNotFound { year } => write!(
                f,
                "no temperature anomaly data available for the year {year}"
            ),
            Self::MonthUnavailable { year, month } => write!(
                f,
                "no temperature anomaly available for {year}-{month:02}"
            ),
            Self::InsufficientData { window } => write!(
                f,
                "insufficient data: no usable years in the last {window}"
            ),
            Self::DataSource(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AppError {}
