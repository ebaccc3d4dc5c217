use super::{Figure, Series, SeriesColor, VisualizationConfig};
use crate::error::{Error, Result};
use crate::processing::signal::time_axis;

use plotters::prelude::*;
use std::path::{Path, PathBuf};

impl From<SeriesColor> for RGBColor {
    fn from(color: SeriesColor) -> Self {
        RGBColor(color.r, color.g, color.b)
    }
}

/// Raw, filtered and reference waveforms on a shared time axis.
pub fn waveform_figure(
    title: &str,
    file_stem: &str,
    fs: f64,
    raw: &[f64],
    filtered: &[f64],
    reference: &[f64],
    reference_label: &str,
) -> Figure {
    let t = time_axis(fs, raw.len());
    let to_points = |values: &[f64]| -> Vec<(f64, f64)> {
        t.iter().copied().zip(values.iter().copied()).collect()
    };

    let mut figure = Figure::new(title, file_stem, "Time [s]");
    figure.y_label = Some("Amplitude".to_string());
    figure.x_range = (0.0, t.last().copied().unwrap_or(1.0));
    figure.series.push(Series::new(Some("raw"), to_points(raw), SeriesColor::GREY, 1));
    figure.series.push(Series::new(Some(reference_label), to_points(reference), SeriesColor::ORANGE, 2));
    figure.series.push(Series::new(Some("filtered"), to_points(filtered), SeriesColor::BLUE, 2));
    figure.fit_y_range();
    figure
}

/// Writes `figure` as `<output_dir>/<file_stem>.svg` and returns the path.
pub fn save_figure(figure: &Figure, output_dir: &Path, config: &VisualizationConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.svg", figure.file_stem));
    draw_figure(figure, &path, (config.image_width, config.image_height))
        .map_err(|e| Error::Plot(e.to_string()))?;
    Ok(path)
}

fn draw_figure(
    figure: &Figure,
    path: &Path,
    size: (u32, u32),
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = figure.x_range;
    let (y0, y1) = figure.y_range;
    let mut chart = ChartBuilder::on(&root)
        .caption(&figure.title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(figure.x_label.as_str());
    if let Some(y_label) = &figure.y_label {
        mesh.y_desc(y_label.as_str());
    }
    mesh.draw()?;

    for series in &figure.series {
        let color = RGBColor::from(series.color);
        let style = color.stroke_width(series.width);
        let drawn = chart.draw_series(LineSeries::new(series.points.iter().copied(), style))?;
        if let Some(name) = &series.name {
            drawn
                .label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
        }
    }

    for &x in &figure.vertical_lines {
        chart.draw_series(LineSeries::new(vec![(x, y0), (x, y1)], BLACK.stroke_width(2)))?;
    }

    chart.draw_series(
        figure
            .markers
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 5, BLACK.filled())),
    )?;

    if figure.series.iter().any(|s| s.name.is_some()) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform_figure_has_three_named_series() {
        let raw = vec![0.0, 1.0, 0.0, -1.0];
        let figure = waveform_figure("demo", "demo", 4.0, &raw, &raw, &raw, "10 Hz");
        assert_eq!(figure.series.len(), 3);
        assert_eq!(figure.series[0].points[1], (0.25, 1.0));
        assert_eq!(figure.x_range, (0.0, 0.75));
        assert!(figure.series.iter().all(|s| s.name.is_some()));
    }

    #[test]
    fn saved_figure_is_an_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
        let figure = waveform_figure("demo", "demo figure", 100.0, &raw, &raw, &raw, "ref");
        let path = save_figure(&figure, dir.path(), &VisualizationConfig::default()).unwrap();
        assert_eq!(path.file_name().unwrap(), "demo figure.svg");
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("<svg"));
    }
}
