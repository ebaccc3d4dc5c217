use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Number of samples covering `duration_s` at `fs`.
pub fn sample_count(fs: f64, duration_s: f64) -> usize {
    (fs * duration_s).round().max(0.0) as usize
}

/// Sample times `i / fs` in seconds.
pub fn time_axis(fs: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64 / fs).collect()
}

/// Unit-amplitude sine at `freq_hz`.
pub fn sine(freq_hz: f64, fs: f64, len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| (2.0 * PI * freq_hz * i as f64 / fs).sin())
        .collect()
}

/// Sum of unit-amplitude sines, one per frequency.
pub fn composite_sine(freqs_hz: &[f64], fs: f64, len: usize) -> Vec<f64> {
    let mut signal = vec![0.0; len];
    for &freq in freqs_hz {
        for (acc, s) in signal.iter_mut().zip(sine(freq, fs, len)) {
            *acc += s;
        }
    }
    signal
}

/// Adds seeded uniform noise in `[-amplitude, amplitude]`.
pub fn add_uniform_noise(signal: &mut [f64], amplitude: f64, seed: u64) {
    if amplitude <= 0.0 {
        return;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for sample in signal.iter_mut() {
        *sample += rng.gen_range(-amplitude..=amplitude);
    }
}

pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

/// RMS of `estimate - reference` divided by RMS of `reference`.
pub fn normalized_rms_error(estimate: &[f64], reference: &[f64]) -> f64 {
    let diff: Vec<f64> = estimate
        .iter()
        .zip(reference.iter())
        .map(|(e, r)| e - r)
        .collect();
    let denom = rms(&reference[..diff.len()]);
    if denom == 0.0 {
        return f64::INFINITY;
    }
    rms(&diff) / denom
}

/// Amplitude of the `freq_hz` component, estimated by projecting the
/// Hann-tapered signal onto a complex exponential.
pub fn tone_amplitude(signal: &[f64], fs: f64, freq_hz: f64) -> f64 {
    let n = signal.len();
    if n < 2 {
        return 0.0;
    }
    let mut re = 0.0;
    let mut im = 0.0;
    let mut weight = 0.0;
    for (i, &x) in signal.iter().enumerate() {
        let w = 0.5 - 0.5 * (2.0 * PI * i as f64 / (n - 1) as f64).cos();
        let phase = 2.0 * PI * freq_hz * i as f64 / fs;
        re += w * x * phase.cos();
        im -= w * x * phase.sin();
        weight += w;
    }
    2.0 * (re * re + im * im).sqrt() / weight
}

/// Index range left after dropping `edge_s` seconds from both ends.
pub fn steady_state_range(len: usize, fs: f64, edge_s: f64) -> std::ops::Range<usize> {
    let edge = sample_count(fs, edge_s).min(len / 2);
    edge..len - edge
}

pub fn to_decibels(ratio: f64) -> f64 {
    20.0 * ratio.log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sample_count_rounds() {
        assert_eq!(sample_count(3051.76, 1.0), 3052);
        assert_eq!(sample_count(3051.76, 10.0), 30518);
    }

    #[test]
    fn tone_amplitude_recovers_each_component() {
        let fs = 1000.0;
        let x = composite_sine(&[10.0, 40.0], fs, 4000);
        assert_abs_diff_eq!(tone_amplitude(&x, fs, 10.0), 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(tone_amplitude(&x, fs, 40.0), 1.0, epsilon = 1e-2);
        assert!(tone_amplitude(&x, fs, 25.0) < 1e-2);
    }

    #[test]
    fn noise_is_bounded_and_reproducible() {
        let mut a = vec![0.0; 256];
        let mut b = vec![0.0; 256];
        add_uniform_noise(&mut a, 0.1, 7);
        add_uniform_noise(&mut b, 0.1, 7);
        assert_eq!(a, b);
        assert!(a.iter().all(|x| x.abs() <= 0.1));
        assert!(rms(&a) > 0.0);
    }

    #[test]
    fn identical_signals_have_zero_error() {
        let x = sine(5.0, 100.0, 100);
        assert_eq!(normalized_rms_error(&x, &x), 0.0);
    }

    #[test]
    fn steady_state_range_trims_both_edges() {
        assert_eq!(steady_state_range(1000, 100.0, 1.0), 100..900);
        assert_eq!(steady_state_range(10, 100.0, 1.0), 5..5);
    }
}
