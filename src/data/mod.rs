//! Data acquisition: the remote GISTEMP table and the offline synthetic
//! series.

pub mod giss;
pub mod sample;

pub use giss::{GissClient, SOURCE_LABEL, parse_gistemp_csv};
pub use sample::{SampleConfig, generate_sample, sample_label};
