//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod data_table;
mod dialog;

pub use app::MatrixApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use data_table::DataTable;
pub use dialog::{Dialog, DialogOutcome};
