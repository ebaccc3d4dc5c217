use colored::Colorize;
use neural_bandpass::config::{load_config, save_config, Config};
use neural_bandpass::error::{Error, Result};
use neural_bandpass::local::{demo, frequency_response, process_file};
use neural_bandpass::visualization::window::FigureWindow;
use neural_bandpass::visualization::Figure;

use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: bandpass-explorer [response | demo | filter <input.csv> <output.csv> <band> | init-config <path> | all] [--config <path>] [--show]";

struct Options {
    command: Vec<String>,
    config_path: Option<PathBuf>,
    show: bool,
}

fn parse_args(args: &[String]) -> std::result::Result<Options, String> {
    let mut options = Options {
        command: Vec::new(),
        config_path: None,
        show: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(path) => options.config_path = Some(PathBuf::from(path)),
                None => return Err("--config needs a path".to_string()),
            },
            "--show" => options.show = true,
            "--help" | "-h" => return Err(USAGE.to_string()),
            _ => options.command.push(arg.clone()),
        }
    }
    Ok(options)
}

fn init_logging(config: &Config) {
    let level = if config.output.enable_debug_logging {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(options: Options) -> Result<()> {
    let config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    init_logging(&config);
    std::fs::create_dir_all(&config.output.output_dir)?;

    let command: Vec<&str> = options.command.iter().map(String::as_str).collect();
    let mut figures: Vec<Figure> = Vec::new();

    match command.as_slice() {
        [] | ["all"] => {
            figures.extend(frequency_response::run(&config)?);
            figures.extend(demo::run(&config)?);
        }
        ["response"] => figures.extend(frequency_response::run(&config)?),
        ["demo"] => figures.extend(demo::run(&config)?),
        ["filter", input, output, band] => {
            let band_edges = config.bands.get(band)?;
            let design = config
                .demos
                .iter()
                .find(|d| d.band == *band)
                .map(|d| d.design)
                .unwrap_or_default();
            let count = process_file::process_file(input, output, band_edges, design, config.sample_rate)?;
            println!(
                "{} {} samples ({} band, {}) -> {}",
                "filter".green().bold(),
                count,
                band,
                design.label(),
                output
            );
        }
        ["init-config", path] => {
            save_config(&config, path)?;
            println!("{} {}", "wrote".green().bold(), path);
        }
        _ => {
            println!("{}", USAGE);
            return Ok(());
        }
    }

    if options.show || config.visualization.show_window {
        FigureWindow::run(figures, config.visualization.clone())
            .map_err(|e| Error::Window(e.to_string()))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
