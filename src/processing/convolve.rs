use crate::error::FilterError;

use num_complex::Complex64;
use realfft::RealFftPlanner;

// Below this many multiply-adds a direct loop beats planning two FFTs.
const DIRECT_CONVOLUTION_LIMIT: usize = 1 << 16;

/// Full linear convolution, `signal.len() + kernel.len() - 1` samples.
pub fn fft_convolve(signal: &[f64], kernel: &[f64]) -> Result<Vec<f64>, FilterError> {
    if signal.is_empty() || kernel.is_empty() {
        return Ok(Vec::new());
    }
    let full_len = signal.len() + kernel.len() - 1;
    if signal.len().saturating_mul(kernel.len()) <= DIRECT_CONVOLUTION_LIMIT {
        return Ok(direct_convolve(signal, kernel));
    }

    let n_fft = full_len.next_power_of_two();
    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n_fft);
    let inverse = planner.plan_fft_inverse(n_fft);

    let spectrum_of = |data: &[f64]| -> Result<Vec<Complex64>, FilterError> {
        let mut input = forward.make_input_vec();
        input[..data.len()].copy_from_slice(data);
        let mut spectrum = forward.make_output_vec();
        forward
            .process(&mut input, &mut spectrum)
            .map_err(|e| FilterError::Fft(e.to_string()))?;
        Ok(spectrum)
    };

    let signal_spectrum = spectrum_of(signal)?;
    let kernel_spectrum = spectrum_of(kernel)?;
    let mut product: Vec<Complex64> = signal_spectrum
        .iter()
        .zip(kernel_spectrum.iter())
        .map(|(x, h)| x * h)
        .collect();
    // DC and Nyquist bins of a real signal are real.
    product[0].im = 0.0;
    if let Some(last) = product.last_mut() {
        last.im = 0.0;
    }

    let mut output = inverse.make_output_vec();
    inverse
        .process(&mut product, &mut output)
        .map_err(|e| FilterError::Fft(e.to_string()))?;

    let scale = 1.0 / n_fft as f64;
    output.truncate(full_len);
    output.iter_mut().for_each(|y| *y *= scale);
    Ok(output)
}

/// One-sided spectrum of `data` zero-padded to `n_fft` samples,
/// `n_fft / 2 + 1` bins.
pub fn real_spectrum(data: &[f64], n_fft: usize) -> Result<Vec<Complex64>, FilterError> {
    let mut planner = RealFftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(n_fft);
    let mut input = forward.make_input_vec();
    let len = data.len().min(n_fft);
    input[..len].copy_from_slice(&data[..len]);
    let mut spectrum = forward.make_output_vec();
    forward
        .process(&mut input, &mut spectrum)
        .map_err(|e| FilterError::Fft(e.to_string()))?;
    Ok(spectrum)
}

fn direct_convolve(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let mut output = vec![0.0; signal.len() + kernel.len() - 1];
    for (i, &x) in signal.iter().enumerate() {
        for (j, &h) in kernel.iter().enumerate() {
            output[i + j] += x * h;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn small_inputs_convolve_directly() {
        let y = fft_convolve(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]).unwrap();
        assert_eq!(y, vec![0.0, 1.0, 2.5, 4.0, 1.5]);
    }

    #[test]
    fn fft_path_matches_direct_path() {
        let signal: Vec<f64> = (0..3000).map(|i| ((i * 7919) % 101) as f64 / 50.0 - 1.0).collect();
        let kernel: Vec<f64> = (0..40).map(|i| 1.0 / (1.0 + i as f64)).collect();
        let fast = fft_convolve(&signal, &kernel).unwrap();
        let slow = direct_convolve(&signal, &kernel);
        assert_eq!(fast.len(), slow.len());
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_inputs_give_empty_output() {
        assert!(fft_convolve(&[], &[1.0]).unwrap().is_empty());
    }
}
