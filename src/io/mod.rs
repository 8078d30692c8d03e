//! Input/output helpers.
//!
//! - warp-series JSON read/write (`series`)
//! - warp-rate CSV exports (`export`)

pub mod export;
pub mod series;

pub use export::*;
pub use series::*;
