pub mod config;
pub mod error;
pub mod filters;
pub mod local;
pub mod processing;
pub mod utils;
pub mod visualization;

pub use config::{Band, BandTable, Config};
pub use error::{Error, FilterError, Result};
pub use filters::bandpass::{BandpassDesign, DesignedBandpass};
pub use filters::LinearFilter;
