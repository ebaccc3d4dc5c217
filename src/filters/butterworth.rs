//! Butterworth design in zero-pole-gain form.
//!
//! The analog prototype is frequency-transformed in the s-plane and mapped
//! to the z-plane with the bilinear transform at a design rate of 2, which
//! makes normalized cutoffs (fractions of Nyquist) usable directly.

use super::TransferFunction;
use crate::error::FilterError;

use num_complex::Complex64;
use std::f64::consts::PI;

const DESIGN_FS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ZeroPoleGain {
    pub zeros: Vec<Complex64>,
    pub poles: Vec<Complex64>,
    pub gain: f64,
}

impl ZeroPoleGain {
    pub fn order(&self) -> usize {
        self.poles.len()
    }

    pub fn transfer_function(&self) -> TransferFunction {
        let b = poly(&self.zeros)
            .into_iter()
            .map(|c| c * self.gain)
            .collect::<Vec<f64>>();
        let a = poly(&self.poles);
        // Pad the numerator so both polynomials have the same degree.
        let mut padded = vec![0.0; a.len().saturating_sub(b.len())];
        padded.extend(b);
        TransferFunction { b: padded, a }
    }

    /// Complex gain at `w` radians per sample.
    pub fn frequency_response(&self, w: f64) -> Complex64 {
        let z = Complex64::from_polar(1.0, w);
        let num: Complex64 = self.zeros.iter().map(|&zero| z - zero).product();
        let den: Complex64 = self.poles.iter().map(|&pole| z - pole).product();
        num / den * self.gain
    }

    pub fn is_stable(&self) -> bool {
        self.poles.iter().all(|p| p.norm() < 1.0)
    }
}

/// Digital Butterworth low-pass at normalized cutoff `wn`.
pub fn lowpass(order: usize, wn: f64) -> Result<ZeroPoleGain, FilterError> {
    let warped = prewarp(wn);
    Ok(bilinear(lp_to_lp(prototype(order)?, warped)))
}

/// Digital Butterworth high-pass at normalized cutoff `wn`.
pub fn highpass(order: usize, wn: f64) -> Result<ZeroPoleGain, FilterError> {
    let warped = prewarp(wn);
    Ok(bilinear(lp_to_hp(prototype(order)?, warped)))
}

/// Digital Butterworth band-pass between normalized cutoffs `low` and `high`.
/// The resulting digital order is `2 * order`.
pub fn bandpass(order: usize, low: f64, high: f64) -> Result<ZeroPoleGain, FilterError> {
    let warped_low = prewarp(low);
    let warped_high = prewarp(high);
    let bandwidth = warped_high - warped_low;
    let center = (warped_low * warped_high).sqrt();
    Ok(bilinear(lp_to_bp(prototype(order)?, center, bandwidth)))
}

// Analog low-pass prototype with unit cutoff: poles evenly spaced on the
// left half of the unit circle, no zeros.
fn prototype(order: usize) -> Result<ZeroPoleGain, FilterError> {
    if order == 0 {
        return Err(FilterError::InvalidOrder(order));
    }
    let n = order as f64;
    let poles = (0..order)
        .map(|i| {
            let m = 2.0 * i as f64 - (n - 1.0);
            -Complex64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect();
    Ok(ZeroPoleGain {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    })
}

fn prewarp(wn: f64) -> f64 {
    2.0 * DESIGN_FS * (PI * wn / DESIGN_FS).tan()
}

fn lp_to_lp(zpk: ZeroPoleGain, wo: f64) -> ZeroPoleGain {
    let degree = zpk.poles.len() - zpk.zeros.len();
    ZeroPoleGain {
        zeros: zpk.zeros.iter().map(|&z| z * wo).collect(),
        poles: zpk.poles.iter().map(|&p| p * wo).collect(),
        gain: zpk.gain * wo.powi(degree as i32),
    }
}

fn lp_to_hp(zpk: ZeroPoleGain, wo: f64) -> ZeroPoleGain {
    let degree = zpk.poles.len() - zpk.zeros.len();
    let num: Complex64 = zpk.zeros.iter().map(|&z| -z).product();
    let den: Complex64 = zpk.poles.iter().map(|&p| -p).product();

    let mut zeros: Vec<Complex64> = zpk.zeros.iter().map(|&z| wo / z).collect();
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    ZeroPoleGain {
        zeros,
        poles: zpk.poles.iter().map(|&p| wo / p).collect(),
        gain: zpk.gain * (num / den).re,
    }
}

fn lp_to_bp(zpk: ZeroPoleGain, wo: f64, bw: f64) -> ZeroPoleGain {
    let degree = zpk.poles.len() - zpk.zeros.len();
    let wo2 = Complex64::new(wo * wo, 0.0);

    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let scaled: Vec<Complex64> = roots.iter().map(|&r| r * (bw / 2.0)).collect();
        let upper = scaled.iter().map(|&r| r + (r * r - wo2).sqrt());
        let lower = scaled.iter().map(|&r| r - (r * r - wo2).sqrt());
        upper.chain(lower).collect()
    };

    let mut zeros = split(&zpk.zeros);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    ZeroPoleGain {
        zeros,
        poles: split(&zpk.poles),
        gain: zpk.gain * bw.powi(degree as i32),
    }
}

fn bilinear(zpk: ZeroPoleGain) -> ZeroPoleGain {
    let fs2 = Complex64::new(2.0 * DESIGN_FS, 0.0);
    let degree = zpk.poles.len() - zpk.zeros.len();

    let num: Complex64 = zpk.zeros.iter().map(|&z| fs2 - z).product();
    let den: Complex64 = zpk.poles.iter().map(|&p| fs2 - p).product();

    // Zeros at infinity land on Nyquist.
    let mut zeros: Vec<Complex64> = zpk.zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

    ZeroPoleGain {
        zeros,
        poles: zpk.poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect(),
        gain: zpk.gain * (num / den).re,
    }
}

/// Real coefficients of the monic polynomial with the given roots.
pub(crate) fn poly(roots: &[Complex64]) -> Vec<f64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let previous = coeffs[i - 1];
            coeffs[i] -= root * previous;
        }
    }
    coeffs.into_iter().map(|c| c.re).collect()
}
