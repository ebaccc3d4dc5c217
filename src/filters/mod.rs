pub mod bandpass;
pub mod butterworth;
pub mod fir;
pub mod second_order;

pub use bandpass::{
    butter_bandpass, butter_bandpass_two_stage, fir_bandpass, BandpassDesign, DesignedBandpass,
};
pub use butterworth::ZeroPoleGain;
pub use fir::FirFilter;
pub use second_order::{IirFilter, SecondOrderFilter};

use crate::error::FilterError;

use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Polynomial form of a filter, highest power first, with `a[0] == 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

/// A linear time-invariant digital filter that can be designed once and
/// then evaluated or run over whole signals.
pub trait LinearFilter: Send + Sync {
    /// Number of poles (IIR) or taps minus one (FIR).
    fn order(&self) -> usize;

    fn transfer_function(&self) -> TransferFunction;

    /// Complex gain at `w` radians per sample.
    fn frequency_response(&self, w: f64) -> Complex64;

    /// Runs the filter causally over `signal`. The internal state starts at
    /// the steady state reached for a constant input equal to
    /// `initial_level`; `0.0` starts the filter at rest.
    fn lfilter(&self, signal: &[f64], initial_level: f64) -> Result<Vec<f64>, FilterError>;

    /// Samples of odd extension added at each end by zero-phase filtering.
    fn padlen(&self) -> usize {
        3 * (self.order() + 1)
    }

    /// Response on `points` frequencies `w = pi * i / points`, endpoint excluded.
    fn response_grid(&self, points: usize) -> Result<Vec<Complex64>, FilterError> {
        Ok((0..points)
            .into_par_iter()
            .map(|i| self.frequency_response(PI * i as f64 / points as f64))
            .collect())
    }
}

/// Converts a cutoff in Hz to a fraction of the Nyquist frequency.
pub fn normalize_cutoff(cutoff: f64, fs: f64) -> Result<f64, FilterError> {
    let nyquist = 0.5 * fs;
    let normalized = cutoff / nyquist;
    if normalized.is_finite() && normalized > 0.0 && normalized < 1.0 {
        Ok(normalized)
    } else {
        Err(FilterError::InvalidCutoff {
            cutoff,
            normalized,
            sample_rate: fs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalizes_against_nyquist() {
        let wn = normalize_cutoff(30.0, 3051.76).unwrap();
        assert_abs_diff_eq!(wn, 30.0 / 1525.88, epsilon = 1e-12);
    }

    #[test]
    fn rejects_cutoff_at_or_above_nyquist() {
        assert!(matches!(
            normalize_cutoff(1525.88, 3051.76),
            Err(FilterError::InvalidCutoff { .. })
        ));
        assert!(normalize_cutoff(2000.0, 3051.76).is_err());
        assert!(normalize_cutoff(0.0, 3051.76).is_err());
        assert!(normalize_cutoff(-1.0, 3051.76).is_err());
        assert!(normalize_cutoff(f64::NAN, 3051.76).is_err());
    }
}
