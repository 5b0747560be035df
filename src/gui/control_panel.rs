//! Control Panel Widget
//! Left side panel with schema entry, the record form and chart buttons.

use crate::charts::ChartKind;
use crate::data::TableManager;
use egui::{Color32, RichText};

/// Left side control panel. Owns only the schema entry text; everything
/// else it shows lives in the [`TableManager`].
#[derive(Default)]
pub struct ControlPanel {
    pub schema_text: String,
    pub status: String,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            schema_text: String::new(),
            status: "Ready".to_string(),
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, table: &mut TableManager) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let schema_locked = table.data_entry_enabled();

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Matrix")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Data Entry & Charts")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Schema Section =====
        ui.label(RichText::new("Columns").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.add_enabled(
                    !schema_locked,
                    egui::TextEdit::singleline(&mut self.schema_text)
                        .hint_text("name, height, weight")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!schema_locked, egui::Button::new("Set Columns"))
                        .clicked()
                    {
                        action = ControlPanelAction::SetSchema;
                    }
                    if ui.button("Upload CSV").clicked() {
                        action = ControlPanelAction::UploadCsv;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Entry Form Section =====
        ui.label(RichText::new("New Row").size(14.0).strong());
        ui.add_space(5.0);

        let label_width = 110.0;
        ui.add_enabled_ui(schema_locked, |ui| {
            if table.form().fields.is_empty() {
                ui.label(RichText::new("Set columns to start entering data").color(Color32::GRAY));
            }
            for field in &mut table.form_mut().fields {
                ui.horizontal(|ui| {
                    ui.add_sized(
                        [label_width, 20.0],
                        egui::Label::new(format!("{}:", field.column)).truncate(),
                    );
                    ui.text_edit_singleline(&mut field.value);
                });
            }
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.button("Add Row").clicked() {
                    action = ControlPanelAction::AddRow;
                }
                if ui.button("Reset").clicked() {
                    action = ControlPanelAction::Reset;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Buttons =====
        ui.label(RichText::new("Charts").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(schema_locked, |ui| {
            egui::Grid::new("chart_buttons")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    for (i, kind) in ChartKind::ALL.into_iter().enumerate() {
                        let button = egui::Button::new(kind.label()).min_size(egui::vec2(140.0, 28.0));
                        if ui.add(button).clicked() {
                            action = ControlPanelAction::Chart(kind);
                        }
                        if i % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(
            RichText::new(format!("{} rows", table.row_count()))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    SetSchema,
    UploadCsv,
    AddRow,
    Reset,
    Chart(ChartKind),
}
