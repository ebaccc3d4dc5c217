use super::{Figure, Series, SeriesColor};
use crate::config::bands::BandTable;
use crate::error::FilterError;
use crate::filters::{butter_bandpass, butter_bandpass_two_stage, LinearFilter};

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Complex response of a filter on a uniform grid from DC up to (but not
/// including) Nyquist.
#[derive(Debug, Clone)]
pub struct FrequencyResponse {
    pub frequencies_hz: Vec<f64>,
    pub response: Vec<Complex64>,
}

impl FrequencyResponse {
    pub fn evaluate(filter: &dyn LinearFilter, fs: f64, points: usize) -> Result<Self, FilterError> {
        let response = filter.response_grid(points)?;
        let frequencies_hz = (0..points)
            .map(|i| 0.5 * fs * i as f64 / points as f64)
            .collect();
        Ok(FrequencyResponse {
            frequencies_hz,
            response,
        })
    }

    pub fn magnitude(&self) -> Vec<f64> {
        self.response.iter().map(|h| h.norm()).collect()
    }

    /// `(frequency, |H|)` pairs for which `keep(frequency)` holds.
    pub fn magnitude_points<F: Fn(f64) -> bool>(&self, keep: F) -> Vec<(f64, f64)> {
        self.frequencies_hz
            .iter()
            .zip(self.response.iter())
            .filter(|(f, _)| keep(**f))
            .map(|(&f, h)| (f, h.norm()))
            .collect()
    }
}

/// Orders for the two designs compared on a response figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseOrders {
    pub order_lowpass: usize,
    pub order_highpass: usize,
    pub order_bandpass: usize,
}

pub fn response_title(band_name: &str, low: f64, high: f64) -> String {
    format!("Bandpass Filter {} ({} - {} Hz) Frequency Response", band_name, low, high)
}

/// File name stem: cutoffs truncated toward zero.
pub fn response_file_stem(band_name: &str, low: f64, high: f64) -> String {
    format!(
        "Bandpass Filter {} ({} - {} Hz) Frequency Response",
        band_name,
        low.trunc() as i64,
        high.trunc() as i64
    )
}

/// Overlays the single-stage band-pass response with the two-stage
/// low-pass/high-pass pair. The high-pass curve is drawn below the band
/// centre and the low-pass curve above it; both cutoffs are marked at the
/// half-power gain.
pub fn frequency_response_figure(
    band_name: &str,
    orders: ResponseOrders,
    bands: &BandTable,
    fs: f64,
    points: usize,
) -> Result<Figure, FilterError> {
    let band = bands.get(band_name)?;
    let (lowcut, highcut) = (band.low, band.high);
    let threshold = band.center();
    let x_max = 1.5 * highcut;

    let (lowpass, highpass) =
        butter_bandpass_two_stage(lowcut, highcut, fs, orders.order_lowpass, orders.order_highpass)?;
    let bandpass = butter_bandpass(lowcut, highcut, fs, orders.order_bandpass)?;

    let lowpass_response = FrequencyResponse::evaluate(&lowpass, fs, points)?;
    let highpass_response = FrequencyResponse::evaluate(&highpass, fs, points)?;
    let bandpass_response = FrequencyResponse::evaluate(&bandpass, fs, points)?;

    let mut figure = Figure::new(
        &response_title(band_name, lowcut, highcut),
        &response_file_stem(band_name, lowcut, highcut),
        "Frequency [Hz]",
    );
    figure.x_range = (0.0, x_max);
    figure.y_range = (0.0, 1.05);

    figure.series.push(Series::new(
        Some("version 2: bandpass"),
        bandpass_response.magnitude_points(|f| f <= x_max),
        SeriesColor::GREY,
        3,
    ));
    figure.series.push(Series::new(
        Some("version 1: lowpass + highpass"),
        lowpass_response.magnitude_points(|f| f >= threshold && f <= x_max),
        SeriesColor::BLUE,
        3,
    ));
    figure.series.push(Series::new(
        None,
        highpass_response.magnitude_points(|f| f <= threshold),
        SeriesColor::BLUE,
        3,
    ));

    figure.markers = vec![(lowcut, FRAC_1_SQRT_2), (highcut, FRAC_1_SQRT_2)];
    figure.vertical_lines = vec![lowcut, highcut];
    Ok(figure)
}
