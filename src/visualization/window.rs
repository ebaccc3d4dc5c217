use super::{Figure, SeriesColor, VisualizationConfig};
use eframe::egui;

impl From<SeriesColor> for egui::Color32 {
    fn from(color: SeriesColor) -> Self {
        egui::Color32::from_rgb(color.r, color.g, color.b)
    }
}

pub struct FigureWindow {
    figures: Vec<Figure>,
    config: VisualizationConfig,
}

impl FigureWindow {
    pub fn new(figures: Vec<Figure>, config: VisualizationConfig) -> Self {
        Self { figures, config }
    }

    /// Blocks until the window is closed.
    pub fn run(figures: Vec<Figure>, config: VisualizationConfig) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.window_width as f32, config.window_height as f32])
                .with_title("Bandpass Explorer"),
            ..Default::default()
        };

        eframe::run_native(
            "Bandpass Explorer",
            options,
            Box::new(|_cc| Ok(Box::new(FigureWindow::new(figures, config)))),
        )
    }
}

impl eframe::App for FigureWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Bandpass Explorer");
            ui.separator();

            if self.figures.is_empty() {
                ui.label("No figures to show.");
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for figure in &self.figures {
                    ui.heading(&figure.title);
                    self.plot_figure(ui, figure);
                    ui.add_space(10.0);
                }
            });
        });
    }
}

impl FigureWindow {
    fn plot_figure(&self, ui: &mut egui::Ui, figure: &Figure) {
        use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points, VLine};

        let plot_height = self.config.plot_height_per_figure as f32;
        let (x0, x1) = figure.x_range;
        let (y0, y1) = figure.y_range;

        Plot::new(&figure.file_stem)
            .height(plot_height)
            .legend(Legend::default())
            .show_axes([true, true])
            .show_grid([true, true])
            .include_x(x0)
            .include_x(x1)
            .include_y(y0)
            .include_y(y1)
            .allow_zoom(true)
            .allow_drag(true)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for series in &figure.series {
                    let points: PlotPoints = series.points.iter().map(|&(x, y)| [x, y]).collect();
                    let mut line = Line::new(points)
                        .color(egui::Color32::from(series.color))
                        .width(series.width as f32);
                    if let Some(name) = &series.name {
                        line = line.name(name);
                    }
                    plot_ui.line(line);
                }

                for &x in &figure.vertical_lines {
                    plot_ui.vline(VLine::new(x).color(egui::Color32::BLACK).width(2.0));
                }

                if !figure.markers.is_empty() {
                    let markers: PlotPoints = figure.markers.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.points(
                        Points::new(markers)
                            .shape(MarkerShape::Circle)
                            .radius(5.0)
                            .color(egui::Color32::BLACK),
                    );
                }
            });
    }
}
