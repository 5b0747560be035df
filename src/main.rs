//! Matrix - Tabular Data Entry & Chart Viewer
//!
//! Enter records by hand or import them from CSV, then chart them as
//! correlation heatmaps, scatter plots, stacked bars or lines.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use config::AppConfig;
use eframe::egui;
use gui::MatrixApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = AppConfig::load();
    log::debug!("config: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title("Matrix"),
        ..Default::default()
    };

    eframe::run_native(
        "Matrix",
        options,
        Box::new(|cc| Ok(Box::new(MatrixApp::new(cc, config)))),
    )
}
