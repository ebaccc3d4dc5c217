use super::fir::{firwin_bandpass, FirFilter};
use super::second_order::IirFilter;
use super::{butterworth, normalize_cutoff, LinearFilter};
use crate::config::bands::Band;
use crate::error::FilterError;
use crate::processing::filtfilt::filtfilt;

use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BANDPASS_ORDER: usize = 5;
pub const DEFAULT_FIR_TAPS: usize = 10000;

/// Butterworth low-pass at `highcut` and high-pass at `lowcut`, each with its
/// own order, so the two band edges can roll off at different rates.
/// Returns `(lowpass, highpass)`.
pub fn butter_bandpass_two_stage(
    lowcut: f64,
    highcut: f64,
    fs: f64,
    order_lowpass: usize,
    order_highpass: usize,
) -> Result<(IirFilter, IirFilter), FilterError> {
    let low = normalize_cutoff(lowcut, fs)?;
    let high = normalize_cutoff(highcut, fs)?;

    let lowpass = IirFilter::new(butterworth::lowpass(order_lowpass, high)?)?;
    let highpass = IirFilter::new(butterworth::highpass(order_highpass, low)?)?;
    debug!(
        "two-stage bandpass {}-{} Hz: lowpass order {}, highpass order {}",
        lowcut, highcut, order_lowpass, order_highpass
    );
    Ok((lowpass, highpass))
}

/// Single Butterworth band-pass; one order shared by both edges.
pub fn butter_bandpass(lowcut: f64, highcut: f64, fs: f64, order: usize) -> Result<IirFilter, FilterError> {
    let low = normalize_cutoff(lowcut, fs)?;
    let high = normalize_cutoff(highcut, fs)?;
    if low >= high {
        return Err(FilterError::InvalidBand {
            low: lowcut,
            high: highcut,
        });
    }
    let filter = IirFilter::new(butterworth::bandpass(order, low, high)?)?;
    debug!("bandpass {}-{} Hz: order {}", lowcut, highcut, order);
    Ok(filter)
}

/// Windowed-sinc FIR band-pass with `taps` coefficients.
pub fn fir_bandpass(lowcut: f64, highcut: f64, fs: f64, taps: usize) -> Result<FirFilter, FilterError> {
    let low = normalize_cutoff(lowcut, fs)?;
    let high = normalize_cutoff(highcut, fs)?;
    if low >= high {
        return Err(FilterError::InvalidBand {
            low: lowcut,
            high: highcut,
        });
    }
    let filter = FirFilter::new(firwin_bandpass(taps, low, high)?)?;
    debug!("FIR bandpass {}-{} Hz: {} taps", lowcut, highcut, taps);
    Ok(filter)
}

/// How a band is turned into a filter.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandpassDesign {
    TwoStage {
        order_lowpass: usize,
        order_highpass: usize,
    },
    Butterworth {
        order: usize,
    },
    Fir {
        taps: usize,
    },
}

impl Default for BandpassDesign {
    fn default() -> Self {
        BandpassDesign::Butterworth {
            order: DEFAULT_BANDPASS_ORDER,
        }
    }
}

impl BandpassDesign {
    pub fn design(&self, band: Band, fs: f64) -> Result<DesignedBandpass, FilterError> {
        band.validate(fs)?;
        let stages: Vec<Box<dyn LinearFilter>> = match *self {
            BandpassDesign::TwoStage {
                order_lowpass,
                order_highpass,
            } => {
                let (lowpass, highpass) =
                    butter_bandpass_two_stage(band.low, band.high, fs, order_lowpass, order_highpass)?;
                vec![Box::new(lowpass) as Box<dyn LinearFilter>, Box::new(highpass)]
            }
            BandpassDesign::Butterworth { order } => {
                vec![Box::new(butter_bandpass(band.low, band.high, fs, order)?) as Box<dyn LinearFilter>]
            }
            BandpassDesign::Fir { taps } => {
                vec![Box::new(fir_bandpass(band.low, band.high, fs, taps)?) as Box<dyn LinearFilter>]
            }
        };
        Ok(DesignedBandpass {
            design: *self,
            band,
            sample_rate: fs,
            stages,
        })
    }

    pub fn label(&self) -> String {
        match self {
            BandpassDesign::TwoStage {
                order_lowpass,
                order_highpass,
            } => format!(
                "Butterworth lowpass (order {}) + highpass (order {})",
                order_lowpass, order_highpass
            ),
            BandpassDesign::Butterworth { order } => format!("Butterworth bandpass (order {})", order),
            BandpassDesign::Fir { taps } => format!("FIR bandpass ({} taps)", taps),
        }
    }
}

/// A designed band-pass: one stage, or low-pass followed by high-pass.
pub struct DesignedBandpass {
    design: BandpassDesign,
    band: Band,
    sample_rate: f64,
    stages: Vec<Box<dyn LinearFilter>>,
}

impl DesignedBandpass {
    pub fn design(&self) -> BandpassDesign {
        self.design
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn stages(&self) -> &[Box<dyn LinearFilter>] {
        &self.stages
    }

    /// Zero-phase filtering, one stage after another.
    pub fn apply(&self, signal: &[f64]) -> Result<Vec<f64>, FilterError> {
        let mut output = signal.to_vec();
        for stage in &self.stages {
            output = filtfilt(&**stage, &output)?;
        }
        Ok(output)
    }

    /// Shortest signal every stage can zero-phase filter.
    pub fn min_signal_len(&self) -> usize {
        self.stages.iter().map(|s| s.padlen() + 1).max().unwrap_or(0)
    }

    /// Single-pass complex response of the whole cascade at `freq_hz`.
    pub fn frequency_response(&self, freq_hz: f64) -> Complex64 {
        let w = 2.0 * std::f64::consts::PI * freq_hz / self.sample_rate;
        self.stages
            .iter()
            .map(|s| s.frequency_response(w))
            .product()
    }

    /// Gain applied by [`DesignedBandpass::apply`] at `freq_hz`, the
    /// squared single-pass magnitude.
    pub fn zero_phase_gain(&self, freq_hz: f64) -> f64 {
        self.frequency_response(freq_hz).norm_sqr()
    }
}

impl std::fmt::Debug for DesignedBandpass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignedBandpass")
            .field("design", &self.design)
            .field("band", &self.band)
            .field("sample_rate", &self.sample_rate)
            .field("stage_orders", &self.stages.iter().map(|s| s.order()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const FS: f64 = 3051.76;

    #[test]
    fn two_stage_lengths_follow_orders() {
        let (lowpass, highpass) = butter_bandpass_two_stage(12.5, 30.0, FS, 9, 7).unwrap();
        let lp = lowpass.transfer_function();
        let hp = highpass.transfer_function();
        assert_eq!((lp.b.len(), lp.a.len()), (10, 10));
        assert_eq!((hp.b.len(), hp.a.len()), (8, 8));
        assert_abs_diff_eq!(lp.a[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_stage_length_is_twice_the_order_plus_one() {
        let filter = butter_bandpass(8.0, 12.0, FS, 3).unwrap();
        let tf = filter.transfer_function();
        assert_eq!(tf.b.len(), 7);
        assert_eq!(tf.a.len(), 7);
        assert_eq!(filter.order(), 6);
    }

    #[test]
    fn cutoff_at_nyquist_fails() {
        assert!(matches!(
            butter_bandpass_two_stage(12.5, FS / 2.0, FS, 4, 4),
            Err(FilterError::InvalidCutoff { .. })
        ));
        assert!(matches!(
            butter_bandpass(12.5, 2000.0, FS, 4),
            Err(FilterError::InvalidCutoff { .. })
        ));
        assert!(matches!(
            fir_bandpass(0.0, 12.0, FS, 101),
            Err(FilterError::InvalidCutoff { .. })
        ));
    }

    #[test]
    fn inverted_edges_fail_for_single_stage() {
        assert!(matches!(
            butter_bandpass(30.0, 12.5, FS, 3),
            Err(FilterError::InvalidBand { .. })
        ));
    }

    #[test]
    fn design_dispatches_to_the_right_stages() {
        let band = Band::new(12.5, 30.0);
        let two_stage = BandpassDesign::TwoStage {
            order_lowpass: 9,
            order_highpass: 7,
        }
        .design(band, FS)
        .unwrap();
        assert_eq!(two_stage.stages().len(), 2);
        assert_eq!(two_stage.stages()[0].order(), 9);
        assert_eq!(two_stage.stages()[1].order(), 7);
        assert_eq!(two_stage.min_signal_len(), 31);

        let fir = BandpassDesign::Fir { taps: 401 }.design(band, FS).unwrap();
        assert_eq!(fir.stages()[0].transfer_function().b.len(), 401);
        assert_eq!(fir.stages()[0].transfer_function().a, vec![1.0]);
    }

    #[test]
    fn cascade_gain_is_flat_inside_band() {
        let designed = BandpassDesign::TwoStage {
            order_lowpass: 9,
            order_highpass: 7,
        }
        .design(Band::new(12.5, 30.0), FS)
        .unwrap();
        assert!(designed.zero_phase_gain(20.0) > 0.99);
        assert!(designed.zero_phase_gain(50.0) < 1e-3);
        assert!(designed.zero_phase_gain(5.0) < 1e-3);
    }

    #[test]
    fn design_parses_from_yaml() {
        let design: BandpassDesign =
            serde_yaml::from_str("kind: two_stage\norder_lowpass: 9\norder_highpass: 7\n").unwrap();
        assert_eq!(
            design,
            BandpassDesign::TwoStage {
                order_lowpass: 9,
                order_highpass: 7
            }
        );
        let fir: BandpassDesign = serde_yaml::from_str("kind: fir\ntaps: 10000\n").unwrap();
        assert_eq!(fir, BandpassDesign::Fir { taps: 10000 });
    }
}
