pub mod convolve;
pub mod filtfilt;
pub mod signal;

pub use filtfilt::filtfilt;
