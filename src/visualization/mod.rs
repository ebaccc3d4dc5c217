pub mod plotter;
pub mod response;
pub mod window;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VisualizationConfig {
    pub show_window: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub plot_height_per_figure: u32,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            show_window: false,
            window_width: 1200,
            window_height: 800,
            plot_height_per_figure: 300,
            image_width: 1500,
            image_height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SeriesColor {
    pub const BLACK: SeriesColor = SeriesColor::rgb(0, 0, 0);
    pub const BLUE: SeriesColor = SeriesColor::rgb(0, 0, 255);
    pub const GREY: SeriesColor = SeriesColor::rgb(128, 128, 128);
    pub const ORANGE: SeriesColor = SeriesColor::rgb(255, 127, 14);
    pub const GREEN: SeriesColor = SeriesColor::rgb(44, 160, 44);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        SeriesColor { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub color: SeriesColor,
    pub width: u32,
}

impl Series {
    pub fn new(name: Option<&str>, points: Vec<(f64, f64)>, color: SeriesColor, width: u32) -> Self {
        Series {
            name: name.map(str::to_string),
            points,
            color,
            width,
        }
    }
}

/// A 2D line chart that can be written to disk or shown in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub file_stem: String,
    pub x_label: String,
    pub y_label: Option<String>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub series: Vec<Series>,
    pub markers: Vec<(f64, f64)>,
    pub vertical_lines: Vec<f64>,
}

impl Figure {
    pub fn new(title: &str, file_stem: &str, x_label: &str) -> Self {
        Figure {
            title: title.to_string(),
            file_stem: file_stem.to_string(),
            x_label: x_label.to_string(),
            y_label: None,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            series: Vec::new(),
            markers: Vec::new(),
            vertical_lines: Vec::new(),
        }
    }

    /// Sets the y range to the data extent with a small margin.
    pub fn fit_y_range(&mut self) {
        let (lo, hi) = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .chain(self.markers.iter().map(|p| p.1))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
        if lo.is_finite() && hi.is_finite() {
            let margin = 0.05 * (hi - lo).max(1e-12);
            self.y_range = (lo - margin, hi + margin);
        }
    }
}
