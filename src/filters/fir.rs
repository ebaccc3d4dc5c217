//! Windowed-sinc FIR design.
//!
//! Taps are the difference of two ideal low-pass impulse responses,
//! tapered with a symmetric Hamming window and scaled to unit gain at the
//! centre of the passband.

use super::{LinearFilter, TransferFunction};
use crate::error::FilterError;
use crate::processing::convolve::{fft_convolve, real_spectrum};

use num_complex::Complex64;
use std::f64::consts::PI;

pub const MIN_TAPS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct FirFilter {
    taps: Vec<f64>,
}

impl FirFilter {
    pub fn new(taps: Vec<f64>) -> Result<Self, FilterError> {
        if taps.len() < MIN_TAPS {
            return Err(FilterError::InvalidTapCount(taps.len()));
        }
        if taps.iter().any(|t| !t.is_finite()) {
            return Err(FilterError::NonFinite("filter coefficients"));
        }
        Ok(FirFilter { taps })
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }
}

impl LinearFilter for FirFilter {
    fn order(&self) -> usize {
        self.taps.len() - 1
    }

    fn transfer_function(&self) -> TransferFunction {
        TransferFunction {
            b: self.taps.clone(),
            a: vec![1.0],
        }
    }

    fn frequency_response(&self, w: f64) -> Complex64 {
        self.taps
            .iter()
            .enumerate()
            .map(|(n, &h)| Complex64::from_polar(h, -w * n as f64))
            .sum()
    }

    fn lfilter(&self, signal: &[f64], initial_level: f64) -> Result<Vec<f64>, FilterError> {
        let mut output = fft_convolve(signal, &self.taps)?;
        output.truncate(signal.len());

        if initial_level != 0.0 {
            // With a constant input the k-th delay register holds the sum of
            // every tap after k, and it drains into output k.
            let mut tail: f64 = self.taps.iter().skip(1).sum();
            for (k, y) in output.iter_mut().take(self.taps.len() - 1).enumerate() {
                *y += initial_level * tail;
                tail -= self.taps[k + 1];
            }
        }
        Ok(output)
    }

    fn response_grid(&self, points: usize) -> Result<Vec<Complex64>, FilterError> {
        let n_fft = 2 * points;
        if points == 0 || n_fft < self.taps.len() {
            return Ok((0..points)
                .map(|i| self.frequency_response(PI * i as f64 / points as f64))
                .collect());
        }
        let mut spectrum = real_spectrum(&self.taps, n_fft)?;
        spectrum.truncate(points);
        Ok(spectrum)
    }
}

/// Hamming-windowed sinc band-pass between normalized cutoffs
/// `low` and `high` (fractions of Nyquist), scaled to unit gain at the
/// band centre.
pub fn firwin_bandpass(num_taps: usize, low: f64, high: f64) -> Result<Vec<f64>, FilterError> {
    if num_taps < MIN_TAPS {
        return Err(FilterError::InvalidTapCount(num_taps));
    }
    let alpha = 0.5 * (num_taps - 1) as f64;
    let window = hamming(num_taps);

    let mut taps: Vec<f64> = (0..num_taps)
        .map(|i| {
            let m = i as f64 - alpha;
            (high * sinc(high * m) - low * sinc(low * m)) * window[i]
        })
        .collect();

    let scale_frequency = 0.5 * (low + high);
    let gain: f64 = taps
        .iter()
        .enumerate()
        .map(|(i, &h)| h * (PI * (i as f64 - alpha) * scale_frequency).cos())
        .sum();
    taps.iter_mut().for_each(|h| *h /= gain);

    Ok(taps)
}

/// Symmetric Hamming window of length `n`.
pub fn hamming(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

// Normalized sinc, sin(pi x) / (pi x).
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn taps_are_symmetric() {
        for n in [101, 1000] {
            let h = firwin_bandpass(n, 0.1, 0.3).unwrap();
            assert_eq!(h.len(), n);
            for i in 0..n / 2 {
                assert_abs_diff_eq!(h[i], h[n - 1 - i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn unit_gain_at_band_centre_and_no_dc() {
        let filter = FirFilter::new(firwin_bandpass(501, 0.1, 0.3).unwrap()).unwrap();
        assert_abs_diff_eq!(filter.frequency_response(PI * 0.2).norm(), 1.0, epsilon = 1e-9);
        assert!(filter.frequency_response(0.0).norm() < 5e-3);
        assert!(filter.frequency_response(PI * 0.6).norm() < 5e-3);
    }

    #[test]
    fn too_few_taps_are_rejected() {
        assert_eq!(firwin_bandpass(2, 0.1, 0.3), Err(FilterError::InvalidTapCount(2)));
        assert!(FirFilter::new(vec![1.0]).is_err());
    }

    #[test]
    fn hamming_window_endpoints() {
        let w = hamming(11);
        assert_abs_diff_eq!(w[0], 0.08, epsilon = 1e-12);
        assert_abs_diff_eq!(w[5], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[10], 0.08, epsilon = 1e-12);
    }

    #[test]
    fn steady_state_start_matches_dc_gain() {
        let taps = vec![0.25, 0.5, 0.25];
        let filter = FirFilter::new(taps).unwrap();
        let output = filter.lfilter(&[1.0; 8], 1.0).unwrap();
        for y in output {
            assert_abs_diff_eq!(y, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn fft_response_grid_matches_direct_evaluation() {
        let filter = FirFilter::new(firwin_bandpass(63, 0.2, 0.4).unwrap()).unwrap();
        let grid = filter.response_grid(64).unwrap();
        assert_eq!(grid.len(), 64);
        for (i, h) in grid.iter().enumerate() {
            let direct = filter.frequency_response(PI * i as f64 / 64.0);
            assert_abs_diff_eq!(h.re, direct.re, epsilon = 1e-9);
            assert_abs_diff_eq!(h.im, direct.im, epsilon = 1e-9);
        }
    }
}
