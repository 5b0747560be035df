//! Chart Viewer
//! Every rendered chart opens in its own floating window with a PNG export button.

use crate::charts::{ChartData, ChartPlotter};
use egui::RichText;

const WINDOW_WIDTH: f32 = 640.0;
const CASCADE: f32 = 24.0;

struct ChartWindow {
    id: u64,
    chart: ChartData,
    open: bool,
}

/// Open chart windows, newest last.
#[derive(Default)]
pub struct ChartViewer {
    windows: Vec<ChartWindow>,
    next_id: u64,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, chart: ChartData) {
        let id = self.next_id;
        self.next_id += 1;
        self.windows.push(ChartWindow {
            id,
            chart,
            open: true,
        });
    }

    pub fn clear(&mut self) {
        self.windows.clear();
    }

    /// Draw all chart windows. Returns a chart whose "Save PNG" was pressed.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<ChartData> {
        let mut export = None;

        for window in &mut self.windows {
            let offset = (window.id % 10) as f32 * CASCADE;
            let ChartWindow { id, chart, open } = window;

            egui::Window::new(RichText::new(&chart.title).strong())
                .id(egui::Id::new(("chart_window", *id)))
                .open(open)
                .default_width(WINDOW_WIDTH)
                .default_pos(egui::pos2(380.0 + offset, 40.0 + offset))
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(chart.kind.label()).size(11.0));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Save PNG").clicked() {
                                export = Some(chart.clone());
                            }
                        });
                    });
                    ui.separator();
                    ChartPlotter::draw(ui, chart, *id);
                });
        }

        self.windows.retain(|w| w.open);
        export
    }
}
