//! Charts module - chart preparation, interactive plotting and PNG export

mod builder;
pub mod colors;
mod plotter;
mod renderer;

pub use builder::{
    CategoryData, ChartBody, ChartBuilder, ChartData, ChartKind, HeatmapData, Orientation,
    ScatterData,
};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
