//! Read-only grid of the entered records.

use crate::data::Grid;
use egui::{Color32, RichText, ScrollArea};

pub struct DataTable;

impl DataTable {
    pub fn show(ui: &mut egui::Ui, grid: &Grid) {
        if grid.headers.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0).color(Color32::GRAY));
            });
            return;
        }

        ui.label(
            RichText::new(format!("{} rows x {} columns", grid.row_count(), grid.headers.len()))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.separator();

        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("data_grid")
                .striped(true)
                .min_col_width(80.0)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for header in &grid.headers {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for row in &grid.rows {
                        for cell in row {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });
    }
}
