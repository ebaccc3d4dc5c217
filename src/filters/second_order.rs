use super::butterworth::{poly, ZeroPoleGain};
use super::{LinearFilter, TransferFunction};
use crate::error::FilterError;

use num_complex::Complex64;

// Roots whose imaginary part is below this (relative to magnitude) are real.
const REAL_ROOT_TOLERANCE: f64 = 1e-10;

// Biquad section, a[0] normalised to 1. First-order sections keep b[2] = a[2] = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondOrderFilter {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

impl SecondOrderFilter {
    fn from_roots(zeros: &[Complex64], poles: &[Complex64], gain: f64) -> Self {
        let mut b = [0.0; 3];
        for (slot, c) in b.iter_mut().zip(poly(zeros)) {
            *slot = c * gain;
        }
        let mut a = [0.0; 3];
        for (slot, c) in a.iter_mut().zip(poly(poles)) {
            *slot = c;
        }
        SecondOrderFilter { b, a }
    }

    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    // Direct Form II transposed state after a long run of constant input `level`.
    fn steady_state(&self, level: f64) -> [f64; 2] {
        let output = self.dc_gain() * level;
        [
            output - self.b[0] * level,
            self.b[2] * level - self.a[2] * output,
        ]
    }

    // Filter one sample and update the two delay registers
    fn calculate_output(&self, state: &mut [f64; 2], input: f64) -> f64 {
        let output = self.b[0] * input + state[0];
        state[0] = self.b[1] * input - self.a[1] * output + state[1];
        state[1] = self.b[2] * input - self.a[2] * output;
        output
    }

    pub fn frequency_response(&self, w: f64) -> Complex64 {
        let z1 = Complex64::from_polar(1.0, -w);
        let z2 = z1 * z1;
        (z2 * self.b[2] + z1 * self.b[1] + self.b[0]) / (z2 * self.a[2] + z1 * self.a[1] + self.a[0])
    }
}

/// IIR filter kept in zero-pole-gain form and run as cascaded
/// second-order sections, which stays well conditioned for the high
/// orders and low normalized cutoffs used on EEG bands.
#[derive(Debug, Clone)]
pub struct IirFilter {
    zpk: ZeroPoleGain,
    sections: Vec<SecondOrderFilter>,
}

impl IirFilter {
    pub fn new(zpk: ZeroPoleGain) -> Result<Self, FilterError> {
        let finite = |roots: &[Complex64]| roots.iter().all(|r| r.re.is_finite() && r.im.is_finite());
        if !finite(&zpk.zeros) || !finite(&zpk.poles) || !zpk.gain.is_finite() {
            return Err(FilterError::NonFinite("filter coefficients"));
        }

        let pole_groups = conjugate_groups(&zpk.poles);
        let mut zero_queue = conjugate_groups(&zpk.zeros).into_iter().flatten();

        let sections = pole_groups
            .iter()
            .enumerate()
            .map(|(i, poles)| {
                let zeros: Vec<Complex64> = zero_queue.by_ref().take(poles.len()).collect();
                // The overall gain rides on the first section.
                let gain = if i == 0 { zpk.gain } else { 1.0 };
                SecondOrderFilter::from_roots(&zeros, poles, gain)
            })
            .collect();

        Ok(IirFilter { zpk, sections })
    }

    pub fn zpk(&self) -> &ZeroPoleGain {
        &self.zpk
    }

    pub fn sections(&self) -> &[SecondOrderFilter] {
        &self.sections
    }
}

impl LinearFilter for IirFilter {
    fn order(&self) -> usize {
        self.zpk.order()
    }

    fn transfer_function(&self) -> TransferFunction {
        self.zpk.transfer_function()
    }

    fn frequency_response(&self, w: f64) -> Complex64 {
        self.zpk.frequency_response(w)
    }

    fn lfilter(&self, signal: &[f64], initial_level: f64) -> Result<Vec<f64>, FilterError> {
        let mut level = initial_level;
        let mut states: Vec<[f64; 2]> = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            states.push(section.steady_state(level));
            level *= section.dc_gain();
        }

        Ok(signal
            .iter()
            .map(|&sample| {
                self.sections
                    .iter()
                    .zip(states.iter_mut())
                    .fold(sample, |x, (section, state)| section.calculate_output(state, x))
            })
            .collect())
    }
}

// Groups roots into conjugate pairs, then real pairs, then at most one
// leftover real root.
fn conjugate_groups(roots: &[Complex64]) -> Vec<Vec<Complex64>> {
    let is_real = |r: &Complex64| r.im.abs() <= REAL_ROOT_TOLERANCE * r.norm().max(1.0);

    let mut groups: Vec<Vec<Complex64>> = roots
        .iter()
        .filter(|r| !is_real(r) && r.im > 0.0)
        .map(|&r| vec![r, r.conj()])
        .collect();

    let mut reals: Vec<f64> = roots.iter().filter(|r| is_real(r)).map(|r| r.re).collect();
    reals.sort_by(|x, y| x.total_cmp(y));
    groups.extend(
        reals
            .chunks(2)
            .map(|chunk| chunk.iter().map(|&re| Complex64::new(re, 0.0)).collect()),
    );
    groups
}
