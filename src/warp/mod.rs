//! The warp engine: anomaly resolution, the two models, rolling series.

pub mod model;
pub mod resolve;
pub mod rolling;

pub use model::*;
pub use resolve::*;
pub use rolling::*;
