use crate::config::{Config, ResponsePlotConfig};
use crate::error::Result;
use crate::utils::log::{log_with_header, write_columns_csv};
use crate::visualization::plotter::save_figure;
use crate::visualization::response::{frequency_response_figure, ResponseOrders};
use crate::visualization::Figure;

use colored::Colorize;
use log::info;
use std::time::Instant;

/// Draws one response figure per configured band and returns them for
/// display.
pub fn run(config: &Config) -> Result<Vec<Figure>> {
    let mut figures = Vec::with_capacity(config.response.plots.len());

    for plot in &config.response.plots {
        let start = Instant::now();
        let figure = frequency_response_figure(
            &plot.band,
            orders(plot),
            &config.bands,
            config.sample_rate,
            config.response.grid_points,
        )?;
        let path = save_figure(&figure, &config.output.output_dir, &config.visualization)?;

        if config.output.export_csv {
            export_curves(&figure, config)?;
        }

        info!("{} written in {:?}", path.display(), start.elapsed());
        println!(
            "{} {} (lowpass {}, highpass {}, bandpass {}) -> {}",
            "response".green().bold(),
            plot.band,
            plot.order_lowpass,
            plot.order_highpass,
            plot.order_bandpass,
            path.display()
        );
        log_with_header(
            &config.output.log_file,
            &figure.title,
            &format!(
                "orders: lowpass {}, highpass {}, bandpass {}\nfile: {}",
                plot.order_lowpass,
                plot.order_highpass,
                plot.order_bandpass,
                path.display()
            ),
        )?;

        figures.push(figure);
    }

    Ok(figures)
}

fn orders(plot: &ResponsePlotConfig) -> ResponseOrders {
    ResponseOrders {
        order_lowpass: plot.order_lowpass,
        order_highpass: plot.order_highpass,
        order_bandpass: plot.order_bandpass,
    }
}

// One CSV per curve; the two-stage curve is split in two halves.
fn export_curves(figure: &Figure, config: &Config) -> Result<()> {
    for (i, series) in figure.series.iter().enumerate() {
        let path = config
            .output
            .output_dir
            .join(format!("{} curve {}.csv", figure.file_stem, i));
        let (f, gain): (Vec<f64>, Vec<f64>) = series.points.iter().copied().unzip();
        write_columns_csv(&path, &["frequency_hz", "magnitude"], &[&f, &gain])?;
    }
    Ok(())
}
