//! Matrix Main Application
//! Main window with the control panel, the record grid and floating chart windows.

use crate::charts::{ChartBuilder, ChartData, ChartKind, StaticChartRenderer};
use crate::config::AppConfig;
use crate::data::{DataLoader, TableError, TableManager};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DataTable, Dialog, DialogOutcome};
use anyhow::Context as _;
use egui::SidePanel;
use std::path::PathBuf;

/// Main application window. Owns every piece of mutable state.
pub struct MatrixApp {
    config: AppConfig,
    loader: DataLoader,
    table: TableManager,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    dialog: Option<Dialog>,
}

impl MatrixApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            loader: DataLoader::new(config.separator_byte()),
            config,
            table: TableManager::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            dialog: None,
        }
    }

    fn report_table_error(&mut self, err: TableError) {
        log::warn!("{err}");
        let title = match &err {
            TableError::EmptyCsv | TableError::Load(_) => "Error",
            _ => "Invalid Input",
        };
        self.dialog = Some(Dialog::error(title, err.to_string()));
    }

    fn handle_set_schema(&mut self) {
        match self.table.set_schema(&self.control_panel.schema_text) {
            Ok(()) => {
                self.control_panel.schema_text = self.table.schema().joined();
                self.control_panel
                    .set_status(format!("Columns: {}", self.table.schema().joined()));
            }
            Err(e) => self.report_table_error(e),
        }
    }

    fn handle_upload_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.table.import_csv(&self.loader, &path) {
            Ok(summary) => {
                self.control_panel.schema_text = self.table.schema().joined();
                let mut text = format!("Loaded {} rows.", summary.rows);
                if summary.text_cells > 0 {
                    text.push_str(&format!(
                        " {} non-numeric values were kept as text.",
                        summary.text_cells
                    ));
                }
                self.control_panel.set_status(text.clone());
                self.dialog = Some(Dialog::info("CSV Loaded", text));
            }
            Err(e) => self.report_table_error(e),
        }
    }

    fn handle_add_row(&mut self) {
        match self.table.submit_form() {
            Ok(()) => self
                .control_panel
                .set_status(format!("{} rows", self.table.row_count())),
            Err(e) => self.report_table_error(e),
        }
    }

    fn handle_reset_confirmed(&mut self) {
        self.table.reset();
        self.chart_viewer.clear();
        self.control_panel.schema_text.clear();
        self.control_panel.set_status("Ready");
    }

    fn handle_chart(&mut self, kind: ChartKind) {
        log::info!("{} chart requested", kind.label());
        match ChartBuilder::from_records(kind, self.table.schema(), self.table.records()) {
            Ok(chart) => self.chart_viewer.open(chart),
            Err(e) => {
                log::warn!("{} chart: {e}", kind.label());
                self.dialog = Some(if e.is_warning() {
                    Dialog::warning(e.title(), e.to_string())
                } else {
                    Dialog::error(e.title(), e.to_string())
                });
            }
        }
    }

    fn handle_export(&mut self, chart: ChartData) {
        let file_name = format!("{}.png", chart.kind.label().to_lowercase().replace(' ', "_"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        match self.export_png(&chart, path) {
            Ok(path) => self
                .control_panel
                .set_status(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("export failed: {e:#}");
                self.dialog = Some(Dialog::error("Export Failed", format!("{e:#}")));
            }
        }
    }

    fn export_png(&self, chart: &ChartData, path: PathBuf) -> anyhow::Result<PathBuf> {
        StaticChartRenderer::save_png(chart, &path, self.config.export_size())
            .with_context(|| format!("saving {}", path.display()))?;
        if self.config.open_after_export {
            open::that(&path).with_context(|| format!("opening {}", path.display()))?;
        }
        Ok(path)
    }
}

impl eframe::App for MatrixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_enabled_ui(self.dialog.is_none(), |ui| {
                        match self.control_panel.show(ui, &mut self.table) {
                            ControlPanelAction::SetSchema => self.handle_set_schema(),
                            ControlPanelAction::UploadCsv => self.handle_upload_csv(),
                            ControlPanelAction::AddRow => self.handle_add_row(),
                            ControlPanelAction::Reset => self.dialog = Some(Dialog::ConfirmReset),
                            ControlPanelAction::Chart(kind) => self.handle_chart(kind),
                            ControlPanelAction::None => {}
                        }
                    });
                });
            });

        // Central panel - record grid
        egui::CentralPanel::default().show(ctx, |ui| {
            DataTable::show(ui, self.table.grid());
        });

        if let Some(chart) = self.chart_viewer.show(ctx) {
            self.handle_export(chart);
        }

        let outcome = self.dialog.as_ref().map(|dialog| dialog.show(ctx));
        match outcome {
            Some(DialogOutcome::Dismissed) => self.dialog = None,
            // Only the reset dialog can be confirmed
            Some(DialogOutcome::Confirmed) => {
                self.dialog = None;
                self.handle_reset_confirmed();
            }
            Some(DialogOutcome::Open) | None => {}
        }
    }
}
