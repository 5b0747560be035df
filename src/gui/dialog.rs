//! Message and confirmation dialogs.

use egui::{Color32, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn color(self) -> Color32 {
        match self {
            Severity::Info => Color32::from_rgb(40, 167, 69),
            Severity::Warning => Color32::from_rgb(255, 193, 7),
            Severity::Error => Color32::from_rgb(220, 53, 69),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Message {
        severity: Severity,
        title: String,
        text: String,
    },
    ConfirmReset,
}

/// What the user did with the open dialog this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Open,
    Dismissed,
    Confirmed,
}

impl Dialog {
    pub fn info(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::message(Severity::Info, title, text)
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::message(Severity::Warning, title, text)
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::message(Severity::Error, title, text)
    }

    fn message(severity: Severity, title: impl Into<String>, text: impl Into<String>) -> Self {
        Dialog::Message {
            severity,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn show(&self, ctx: &egui::Context) -> DialogOutcome {
        let mut outcome = DialogOutcome::Open;
        let title = match self {
            Dialog::Message { title, .. } => title.as_str(),
            Dialog::ConfirmReset => "Reset",
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.set_min_width(280.0);
                match self {
                    Dialog::Message { severity, text, .. } => {
                        ui.label(RichText::new(text).color(severity.color()));
                        ui.add_space(8.0);
                        if ui.button("OK").clicked() {
                            outcome = DialogOutcome::Dismissed;
                        }
                    }
                    Dialog::ConfirmReset => {
                        ui.label("Clear all data and reset?");
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            if ui.button("Yes").clicked() {
                                outcome = DialogOutcome::Confirmed;
                            }
                            if ui.button("No").clicked() {
                                outcome = DialogOutcome::Dismissed;
                            }
                        });
                    }
                }
            });

        outcome
    }
}
