//! Data types for the pictogram grid viewer.

mod config;
mod dataset;
mod record;

pub use config::*;
pub use dataset::*;
pub use record::*;
