//! Numeric helpers: monthly finite differences and gap filling.

pub mod gapfill;

pub use gapfill::*;
