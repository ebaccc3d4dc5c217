use crate::error::FilterError;
use crate::filters::LinearFilter;

/// Zero-phase filtering: runs `filter` forward, then backward over the
/// time-reversed result, so the phase shifts of both passes cancel and the
/// magnitude response is squared.
///
/// The signal is extended at both ends by an odd reflection of
/// `filter.padlen()` samples and each pass starts from the filter's steady
/// state for the first sample it sees, which keeps edge transients small.
/// The output has the same length as the input.
pub fn filtfilt<F: LinearFilter + ?Sized>(filter: &F, signal: &[f64]) -> Result<Vec<f64>, FilterError> {
    if signal.iter().any(|x| !x.is_finite()) {
        return Err(FilterError::NonFinite("signal"));
    }

    let padlen = filter.padlen();
    if signal.len() <= padlen {
        return Err(FilterError::SignalTooShort {
            len: signal.len(),
            padlen,
        });
    }

    let extended = odd_extend(signal, padlen);

    let mut forward = filter.lfilter(&extended, extended[0])?;
    forward.reverse();

    let mut backward = filter.lfilter(&forward, forward[0])?;
    backward.reverse();

    Ok(backward[padlen..padlen + signal.len()].to_vec())
}

/// Odd extension: `2 * x[0] - x[n..=1]` in front, `2 * x[last] - x[last-1..]` behind.
pub fn odd_extend(signal: &[f64], n: usize) -> Vec<f64> {
    let len = signal.len();
    if n == 0 || len < 2 {
        return signal.to_vec();
    }
    let n = n.min(len - 1);
    let first = signal[0];
    let last = signal[len - 1];

    let mut extended = Vec::with_capacity(len + 2 * n);
    extended.extend((1..=n).rev().map(|i| 2.0 * first - signal[i]));
    extended.extend_from_slice(signal);
    extended.extend((1..=n).map(|i| 2.0 * last - signal[len - 1 - i]));
    extended
}
