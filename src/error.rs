use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error(
        "cutoff {cutoff} Hz normalizes to {normalized} for sample rate {sample_rate} Hz, expected a value in (0, 1)"
    )]
    InvalidCutoff {
        cutoff: f64,
        normalized: f64,
        sample_rate: f64,
    },

    #[error("band edges must satisfy low < high, got low = {low} Hz, high = {high} Hz")]
    InvalidBand { low: f64, high: f64 },

    #[error("filter order must be at least 1, got {0}")]
    InvalidOrder(usize),

    #[error("FIR filter needs at least 3 taps, got {0}")]
    InvalidTapCount(usize),

    #[error("unknown frequency band: {0}")]
    UnknownBand(String),

    #[error("signal of length {len} is too short for zero-phase filtering, needs more than {padlen} samples")]
    SignalTooShort { len: usize, padlen: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("FFT failed: {0}")]
    Fft(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid sample on line {line}: {value:?}")]
    InvalidSample { line: usize, value: String },

    #[error("Failed to draw figure: {0}")]
    Plot(String),

    #[error("Visualization window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, Error>;
