//! Chart Plotter Module
//! Draws prepared charts interactively using egui_plot.

use crate::charts::colors::{self, Rgb};
use crate::charts::{CategoryData, ChartBody, ChartData, HeatmapData, Orientation, ScatterData};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, GridInput, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text,
};
use std::ops::RangeInclusive;

const PLOT_HEIGHT: f32 = 420.0;

pub fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

/// Grid marks at every integer position `0..n`.
fn category_marks(n: usize) -> impl Fn(GridInput) -> Vec<GridMark> + 'static {
    move |_input| {
        (0..n)
            .map(|i| GridMark {
                value: i as f64,
                step_size: 1.0,
            })
            .collect()
    }
}

/// Axis formatter that prints `labels[i]` at integer position `i`,
/// or `labels[n - 1 - i]` when `reversed`.
fn category_formatter(
    labels: Vec<String>,
    reversed: bool,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        let idx = idx as usize;
        let idx = if reversed {
            match labels.len().checked_sub(idx + 1) {
                Some(i) => i,
                None => return String::new(),
            }
        } else {
            idx
        };
        labels.get(idx).cloned().unwrap_or_default()
    }
}

/// Creates interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw `chart`. `id` must be unique among charts shown at once.
    pub fn draw(ui: &mut egui::Ui, chart: &ChartData, id: u64) {
        match &chart.body {
            ChartBody::Heatmap(heat) => Self::draw_heatmap(ui, heat, id),
            ChartBody::Scatter(scatter) => Self::draw_scatter(ui, chart, scatter, id),
            ChartBody::StackedBars { orientation, data } => {
                Self::draw_stacked_bars(ui, chart, *orientation, data, id)
            }
            ChartBody::Lines(data) => Self::draw_lines(ui, chart, data, id),
        }
    }

    /// Correlation matrix as colored cells, first column at the top left.
    pub fn draw_heatmap(ui: &mut egui::Ui, heat: &HeatmapData, id: u64) {
        let labels = heat.matrix.labels.clone();
        let n = labels.len();
        let range = heat.matrix.finite_range();

        Plot::new(("heatmap", id))
            .height(PLOT_HEIGHT)
            .data_aspect(1.0)
            .show_grid(false)
            .allow_scroll(false)
            .x_grid_spacer(category_marks(n))
            .y_grid_spacer(category_marks(n))
            .x_axis_formatter(category_formatter(labels.clone(), false))
            .y_axis_formatter(category_formatter(labels, true))
            .show(ui, |plot_ui| {
                for (i, row) in heat.matrix.values.iter().enumerate() {
                    let y = (n - 1 - i) as f64;
                    for (j, &value) in row.iter().enumerate() {
                        let x = j as f64;
                        let cell = PlotPoints::from(vec![
                            [x - 0.5, y - 0.5],
                            [x + 0.5, y - 0.5],
                            [x + 0.5, y + 0.5],
                            [x - 0.5, y + 0.5],
                        ]);
                        let fill = color32(colors::heat_color(value, range));
                        plot_ui.polygon(
                            Polygon::new(cell)
                                .fill_color(fill)
                                .stroke(egui::Stroke::new(0.5, Color32::WHITE)),
                        );

                        if heat.annotate && value.is_finite() {
                            let text_color = color32(colors::annotation_color(
                                colors::heat_position(value, range),
                            ));
                            plot_ui.text(Text::new(
                                PlotPoint::new(x, y),
                                RichText::new(format!("{value:.2}")).color(text_color),
                            ));
                        }
                    }
                }
            });

        Self::draw_color_bar(ui, range);
    }

    /// Horizontal ramp with its value range printed at both ends.
    fn draw_color_bar(ui: &mut egui::Ui, range: Option<(f64, f64)>) {
        let Some((lo, hi)) = range else {
            return;
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{lo:.2}")).size(11.0));
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(240.0, 12.0), egui::Sense::hover());
            let steps = 48;
            let step_w = rect.width() / steps as f32;
            for s in 0..steps {
                let t = s as f64 / (steps - 1) as f64;
                let x0 = rect.left() + s as f32 * step_w;
                let cell = egui::Rect::from_min_size(
                    egui::pos2(x0, rect.top()),
                    egui::vec2(step_w + 0.5, rect.height()),
                );
                ui.painter().rect_filled(cell, 0.0, color32(colors::ylgnbu(t)));
            }
            ui.label(RichText::new(format!("{hi:.2}")).size(11.0));
        });
    }

    pub fn draw_scatter(ui: &mut egui::Ui, chart: &ChartData, scatter: &ScatterData, id: u64) {
        if let Some(title) = &scatter.legend_title {
            ui.label(RichText::new(format!("Legend: {title}")).size(12.0).strong());
        }
        let palette = colors::series_palette(scatter.groups.len());

        Plot::new(("scatter", id))
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .show(ui, |plot_ui| {
                for (group, color) in scatter.groups.iter().zip(&palette) {
                    plot_ui.points(
                        Points::new(PlotPoints::from(group.points.clone()))
                            .shape(MarkerShape::Circle)
                            .radius(5.0)
                            .filled(true)
                            .color(color32(*color))
                            .name(&group.name),
                    );
                }
            });
    }

    pub fn draw_stacked_bars(
        ui: &mut egui::Ui,
        chart: &ChartData,
        orientation: Orientation,
        data: &CategoryData,
        id: u64,
    ) {
        let palette = colors::series_palette(data.series.len());
        let stacked = data.stacked();
        let n = data.categories.len();

        let plot = Plot::new(("bars", id))
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone());
        let plot = match orientation {
            Orientation::Vertical => plot
                .x_grid_spacer(category_marks(n))
                .x_axis_formatter(category_formatter(data.categories.clone(), false)),
            Orientation::Horizontal => plot
                .y_grid_spacer(category_marks(n))
                .y_axis_formatter(category_formatter(data.categories.clone(), false)),
        };

        plot.show(ui, |plot_ui| {
            for ((series, segments), color) in data.series.iter().zip(&stacked).zip(&palette) {
                let bars = segments
                    .iter()
                    .enumerate()
                    .map(|(i, seg)| {
                        Bar::new(i as f64, seg.value)
                            .base_offset(seg.base)
                            .width(0.6)
                            .name(format!("{}: {}", data.categories[i], series.name))
                    })
                    .collect();
                let chart = BarChart::new(bars)
                    .color(color32(*color))
                    .name(&series.name);
                let chart = match orientation {
                    Orientation::Horizontal => chart.horizontal(),
                    Orientation::Vertical => chart,
                };
                plot_ui.bar_chart(chart);
            }
        });
    }

    pub fn draw_lines(ui: &mut egui::Ui, chart: &ChartData, data: &CategoryData, id: u64) {
        let palette = colors::series_palette(data.series.len());
        let n = data.categories.len();

        Plot::new(("lines", id))
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .x_grid_spacer(category_marks(n))
            .x_axis_formatter(category_formatter(data.categories.clone(), false))
            .show(ui, |plot_ui| {
                for (series, color) in data.series.iter().zip(&palette) {
                    let color = color32(*color);

                    // Same name for every run, so the legend shows one entry
                    for run in series.runs() {
                        plot_ui.line(
                            Line::new(PlotPoints::from(run))
                                .color(color)
                                .width(2.0)
                                .name(&series.name),
                        );
                    }
                    plot_ui.points(
                        Points::new(PlotPoints::from(series.points()))
                            .shape(MarkerShape::Circle)
                            .radius(4.0)
                            .filled(true)
                            .color(color)
                            .name(&series.name),
                    );
                }
            });
    }
}
