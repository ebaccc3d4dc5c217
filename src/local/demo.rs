use crate::config::{Config, DemoConfig};
use crate::error::Result;
use crate::filters::bandpass::DesignedBandpass;
use crate::processing::signal::{
    add_uniform_noise, composite_sine, normalized_rms_error, sample_count, sine, steady_state_range,
    to_decibels, tone_amplitude,
};
use crate::utils::log::{log_csv, log_with_header};
use crate::visualization::plotter::{save_figure, waveform_figure};
use crate::visualization::Figure;

use colored::Colorize;
use log::info;

/// Measurements taken from one demo run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub id: String,
    pub samples: usize,
    /// Normalised RMS error against the reference tone, edges excluded.
    pub steady_state_nrmse: f64,
    /// `(frequency, amplitude before, amplitude after)` per tone.
    pub tone_amplitudes: Vec<(f64, f64, f64)>,
}

/// Signals produced by [`simulate`].
#[derive(Debug, Clone)]
pub struct DemoSignals {
    pub raw: Vec<f64>,
    pub filtered: Vec<f64>,
    pub reference: Vec<f64>,
    pub report: DemoReport,
}

/// Synthesises the demo input, filters it with zero phase and measures the
/// result. Nothing is written.
pub fn simulate(demo: &DemoConfig, config: &Config) -> Result<(DesignedBandpass, DemoSignals)> {
    let fs = config.sample_rate;
    let band = config.bands.get(&demo.band)?;
    let filter = demo.design.design(band, fs)?;

    let len = sample_count(fs, demo.duration_s);
    let mut raw = composite_sine(&demo.tones_hz, fs, len);
    add_uniform_noise(&mut raw, demo.noise_amplitude, demo.seed);
    let reference = sine(demo.reference_hz, fs, len);

    let filtered = filter.apply(&raw)?;

    let steady = steady_state_range(len, fs, demo.edge_exclusion_s);
    let steady_state_nrmse =
        normalized_rms_error(&filtered[steady.clone()], &reference[steady.clone()]);
    let tone_amplitudes = demo
        .tones_hz
        .iter()
        .map(|&f| {
            (
                f,
                tone_amplitude(&raw[steady.clone()], fs, f),
                tone_amplitude(&filtered[steady.clone()], fs, f),
            )
        })
        .collect();

    let report = DemoReport {
        id: demo.id.clone(),
        samples: len,
        steady_state_nrmse,
        tone_amplitudes,
    };

    Ok((
        filter,
        DemoSignals {
            raw,
            filtered,
            reference,
            report,
        },
    ))
}

/// Runs every configured demo, saving one waveform figure each.
pub fn run(config: &Config) -> Result<Vec<Figure>> {
    let mut figures = Vec::with_capacity(config.demos.len());

    for demo in &config.demos {
        info!("running demo {} ({} band)", demo.id, demo.band);
        let (filter, signals) = simulate(demo, config)?;
        let report = &signals.report;

        let title = format!("{}: {} band, {}", demo.id, demo.band, demo.design.label());
        let figure = waveform_figure(
            &title,
            &demo.id,
            config.sample_rate,
            &signals.raw,
            &signals.filtered,
            &signals.reference,
            &format!("{} Hz reference", demo.reference_hz),
        );
        let path = save_figure(&figure, &config.output.output_dir, &config.visualization)?;

        print_report(&filter, report);
        log_with_header(&config.output.log_file, &title, &describe(report))?;
        for &(freq, before, after) in &report.tone_amplitudes {
            log_csv(
                "demo_tones.csv",
                &["demo", "frequency_hz", "amplitude_raw", "amplitude_filtered"],
                &[
                    report.id.as_str(),
                    freq.to_string().as_str(),
                    before.to_string().as_str(),
                    after.to_string().as_str(),
                ],
            )?;
        }
        info!("{} written", path.display());

        figures.push(figure);
    }

    Ok(figures)
}

fn describe(report: &DemoReport) -> String {
    let mut lines = vec![
        format!("samples: {}", report.samples),
        format!("steady-state NRMSE: {:.4}", report.steady_state_nrmse),
    ];
    for &(freq, before, after) in &report.tone_amplitudes {
        lines.push(format!(
            "{} Hz: {:.4} -> {:.4} ({:.1} dB)",
            freq,
            before,
            after,
            to_decibels(after / before)
        ));
    }
    lines.join("\n")
}

fn print_report(filter: &DesignedBandpass, report: &DemoReport) {
    println!(
        "{} {} [{}] NRMSE {:.4}",
        "demo".green().bold(),
        report.id,
        filter.design().label(),
        report.steady_state_nrmse
    );
    for &(freq, before, after) in &report.tone_amplitudes {
        let gain = to_decibels(after / before);
        let shown = format!("{:>8.1} dB", gain);
        let shown = if gain > -3.0 { shown.green() } else { shown.red() };
        println!("  {:>7.2} Hz {:.4} -> {:.4} {}", freq, before, after, shown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::bandpass::BandpassDesign;

    fn beta_demo() -> DemoConfig {
        DemoConfig {
            id: "beta".to_string(),
            band: "beta".to_string(),
            design: BandpassDesign::TwoStage {
                order_lowpass: 9,
                order_highpass: 7,
            },
            tones_hz: vec![20.0, 50.0],
            reference_hz: 20.0,
            duration_s: 1.0,
            noise_amplitude: 0.0,
            seed: 0,
            edge_exclusion_s: 0.25,
        }
    }

    #[test]
    fn beta_demo_keeps_the_reference_tone() {
        let config = Config::default();
        let (_, signals) = simulate(&beta_demo(), &config).unwrap();
        assert_eq!(signals.filtered.len(), signals.raw.len());
        assert!(signals.report.steady_state_nrmse < 0.2);

        let (_, _, passed) = signals.report.tone_amplitudes[0];
        let (_, _, rejected) = signals.report.tone_amplitudes[1];
        assert!(passed > 0.9);
        assert!(rejected < 0.1);
    }

    #[test]
    fn unknown_band_is_reported() {
        let mut demo = beta_demo();
        demo.band = "kappa".to_string();
        assert!(simulate(&demo, &Config::default()).is_err());
    }

    #[test]
    fn description_lists_every_tone() {
        let report = DemoReport {
            id: "x".to_string(),
            samples: 10,
            steady_state_nrmse: 0.05,
            tone_amplitudes: vec![(20.0, 1.0, 1.0), (50.0, 1.0, 0.01)],
        };
        let text = describe(&report);
        assert!(text.contains("20 Hz"));
        assert!(text.contains("50 Hz"));
        assert!(text.contains("-40.0 dB"));
    }
}
