pub mod bands;

pub use bands::{Band, BandTable};

use crate::error::Result;
use crate::filters::bandpass::{BandpassDesign, DEFAULT_FIR_TAPS};
use crate::visualization::VisualizationConfig;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SAMPLE_RATE: f64 = 3051.76;
pub const DEFAULT_GRID_POINTS: usize = 50000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sample_rate: f64,
    pub bands: BandTable,
    pub output: OutputConfig,
    pub response: ResponseConfig,
    pub demos: Vec<DemoConfig>,
    pub visualization: VisualizationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub export_csv: bool,
    pub enable_debug_logging: bool,
    pub log_file: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ResponseConfig {
    pub grid_points: usize,
    pub plots: Vec<ResponsePlotConfig>,
}

/// Orders compared on one frequency-response figure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResponsePlotConfig {
    pub band: String,
    pub order_lowpass: usize,
    pub order_highpass: usize,
    pub order_bandpass: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DemoConfig {
    pub id: String,
    pub band: String,
    pub design: BandpassDesign,
    pub tones_hz: Vec<f64>,
    pub reference_hz: f64,
    pub duration_s: f64,
    #[serde(default)]
    pub noise_amplitude: f64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_edge_exclusion_s")]
    pub edge_exclusion_s: f64,
}

fn default_edge_exclusion_s() -> f64 {
    0.25
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            bands: BandTable::default(),
            output: OutputConfig::default(),
            response: ResponseConfig::default(),
            demos: vec![
                DemoConfig {
                    id: "beta_two_stage".to_string(),
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
                },
                DemoConfig {
                    id: "alpha_fir".to_string(),
                    band: "alpha".to_string(),
                    design: BandpassDesign::Fir {
                        taps: DEFAULT_FIR_TAPS,
                    },
                    tones_hz: vec![10.0, 20.0],
                    reference_hz: 10.0,
                    duration_s: 10.0,
                    noise_amplitude: 0.0,
                    seed: 0,
                    edge_exclusion_s: 3.0,
                },
            ],
            visualization: VisualizationConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            export_csv: false,
            enable_debug_logging: false,
            log_file: "bandpass_explorer.log".to_string(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        let plot = |band: &str, order_lowpass, order_highpass, order_bandpass| ResponsePlotConfig {
            band: band.to_string(),
            order_lowpass,
            order_highpass,
            order_bandpass,
        };
        Self {
            grid_points: DEFAULT_GRID_POINTS,
            plots: vec![
                plot("theta", 6, 5, 3),
                plot("alpha", 7, 7, 3),
                plot("beta", 9, 7, 3),
                plot("gamma", 13, 9, 5),
            ],
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&config_str)?)
}

pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_survives_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let parsed: Config = serde_yaml::from_str(
            "sample_rate: 512.0\nresponse:\n  plots:\n    - band: alpha\n      order_lowpass: 4\n      order_highpass: 4\n      order_bandpass: 2\n",
        )
        .unwrap();
        assert_eq!(parsed.sample_rate, 512.0);
        assert_eq!(parsed.response.grid_points, DEFAULT_GRID_POINTS);
        assert_eq!(parsed.response.plots.len(), 1);
        assert_eq!(parsed.bands, BandTable::default());
        assert_eq!(parsed.demos.len(), 2);
    }

    #[test]
    fn band_table_reads_as_a_mapping() {
        let parsed: Config =
            serde_yaml::from_str("bands:\n  mu:\n    low: 8.0\n    high: 13.0\n").unwrap();
        assert_eq!(parsed.bands.get("mu").unwrap(), Band::new(8.0, 13.0));
        assert!(parsed.bands.get("alpha").is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        save_config(&Config::default(), &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), Config::default());
    }
}
