//! Static Chart Renderer
//! Renders prepared charts off-screen with plotters and encodes them as PNG.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Plot area with axis labels
//! 3. Series legend (scatter, bars, lines) or a color bar (heatmaps)

use crate::charts::colors::{self, Rgb};
use crate::charts::{CategoryData, ChartBody, ChartData, HeatmapData, Orientation, ScatterData};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image size {0}x{1} is too small")]
    InvalidSize(u32, u32),
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Pixel buffer does not match image size")]
    Buffer,
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

const MIN_SIZE: u32 = 200;
const COLOR_BAR_WIDTH: u32 = 110;

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Axis span padded by 5% on each side. A flat range gets one unit of room.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad)..(hi + pad)
    } else {
        (lo - 1.0)..(hi + 1.0)
    }
}

/// Category axis covering positions `0..n`.
fn category_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Label for a category tick, empty between integer positions.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` into PNG bytes.
    pub fn render_png(chart: &ChartData, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if width < MIN_SIZE || height < MIN_SIZE {
            return Err(RenderError::InvalidSize(width, height));
        }

        let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            Self::draw_chart(&root, chart, width)?;
            root.present()?;
        }

        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer)?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render `chart` and write it to `path` as PNG.
    pub fn save_png(
        chart: &ChartData,
        path: &Path,
        (width, height): (u32, u32),
    ) -> Result<(), RenderError> {
        let bytes = Self::render_png(chart, width, height)?;
        std::fs::write(path, bytes)?;
        log::info!("chart '{}' written to {}", chart.title, path.display());
        Ok(())
    }

    fn draw_chart<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        width: u32,
    ) -> DrawResult<DB> {
        match &chart.body {
            ChartBody::Heatmap(heat) => Self::draw_heatmap(root, chart, heat, width),
            ChartBody::Scatter(scatter) => Self::draw_scatter(root, chart, scatter),
            ChartBody::StackedBars { orientation, data } => {
                Self::draw_stacked_bars(root, chart, *orientation, data)
            }
            ChartBody::Lines(data) => Self::draw_lines(root, chart, data),
        }
    }

    fn draw_heatmap<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        heat: &HeatmapData,
        width: u32,
    ) -> DrawResult<DB> {
        let labels = &heat.matrix.labels;
        let n = labels.len();
        let range = heat.matrix.finite_range();
        let (plot_area, bar_area) = root.split_horizontally(width.saturating_sub(COLOR_BAR_WIDTH) as i32);

        let mut ctx = ChartBuilder::on(&plot_area)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(110)
            .build_cartesian_2d(category_range(n), category_range(n))?;

        ctx.configure_mesh()
            .disable_mesh()
            .x_labels(n + 1)
            .y_labels(n + 1)
            .x_label_formatter(&|v| category_label(labels, *v))
            .y_label_formatter(&|v| category_label(labels, (n as f64 - 1.0) - *v))
            .draw()?;

        let cells = heat.matrix.values.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, &value)| (j as f64, (n - 1 - i) as f64, value))
        });

        ctx.draw_series(cells.clone().map(|(x, y, value)| {
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                rgb(colors::heat_color(value, range)).filled(),
            )
        }))?;

        if heat.annotate {
            ctx.draw_series(cells.filter(|(_, _, v)| v.is_finite()).map(|(x, y, value)| {
                let text_color = rgb(colors::annotation_color(colors::heat_position(value, range)));
                Text::new(
                    format!("{value:.2}"),
                    (x, y),
                    ("sans-serif", 14)
                        .into_font()
                        .color(&text_color)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                )
            }))?;
        }

        Self::draw_color_bar(&bar_area, range)
    }

    /// Vertical ramp from the smallest to the largest coefficient.
    fn draw_color_bar<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        range: Option<(f64, f64)>,
    ) -> DrawResult<DB> {
        let Some((lo, hi)) = range else {
            return Ok(());
        };
        let span = if hi > lo { hi - lo } else { 1.0 };

        let mut ctx = ChartBuilder::on(area)
            .margin_top(60)
            .margin_bottom(80)
            .margin_right(10)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..1f64, lo..(lo + span))?;

        ctx.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v| format!("{v:.2}"))
            .draw()?;

        let steps = 64;
        ctx.draw_series((0..steps).map(|s| {
            let t0 = s as f64 / steps as f64;
            let t1 = (s + 1) as f64 / steps as f64;
            Rectangle::new(
                [(0.0, lo + t0 * span), (1.0, lo + t1 * span)],
                rgb(colors::ylgnbu(t0)).filled(),
            )
        }))?;
        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        scatter: &ScatterData,
    ) -> DrawResult<DB> {
        let all = scatter.groups.iter().flat_map(|g| g.points.iter());
        let (x_lo, x_hi, y_lo, y_hi) = all.fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), p| (x0.min(p[0]), x1.max(p[0]), y0.min(p[1]), y1.max(p[1])),
        );
        let (x_range, y_range) = if x_lo.is_finite() && y_lo.is_finite() {
            (padded(x_lo, x_hi), padded(y_lo, y_hi))
        } else {
            (0.0..1.0, 0.0..1.0)
        };

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()?;

        let palette = colors::series_palette(scatter.groups.len());
        for (group, color) in scatter.groups.iter().zip(palette) {
            let color = rgb(color);
            ctx.draw_series(
                group
                    .points
                    .iter()
                    .map(move |p| Circle::new((p[0], p[1]), 5, color.filled())),
            )?
            .label(group.name.as_str())
            .legend(move |(x, y)| Circle::new((x + 8, y), 5, color.filled()));
        }

        if scatter.legend_title.is_some() {
            ctx.configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }

    fn draw_stacked_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        orientation: Orientation,
        data: &CategoryData,
    ) -> DrawResult<DB> {
        let n = data.categories.len();
        let (lo, hi) = data.stacked_range();
        let values = padded(lo, hi);
        let categories = &data.categories;
        let palette = colors::series_palette(data.series.len());
        let stacked = data.stacked();
        let half = 0.3;

        let mut builder = ChartBuilder::on(root);
        builder
            .caption(&chart.title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90);

        match orientation {
            Orientation::Vertical => {
                let mut ctx = builder.build_cartesian_2d(category_range(n), values)?;
                ctx.configure_mesh()
                    .disable_x_mesh()
                    .x_labels(n + 1)
                    .x_label_formatter(&|v| category_label(categories, *v))
                    .x_desc(chart.x_label.as_str())
                    .y_desc(chart.y_label.as_str())
                    .draw()?;

                for ((series, segments), color) in data.series.iter().zip(&stacked).zip(&palette) {
                    let color = rgb(*color);
                    ctx.draw_series(segments.iter().enumerate().map(|(i, s)| {
                        let x = i as f64;
                        Rectangle::new(
                            [(x - half, s.base), (x + half, s.base + s.value)],
                            color.filled(),
                        )
                    }))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], color.filled()));
                }
                ctx.configure_series_labels()
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()?;
            }
            Orientation::Horizontal => {
                let mut ctx = builder.build_cartesian_2d(values, category_range(n))?;
                ctx.configure_mesh()
                    .disable_y_mesh()
                    .y_labels(n + 1)
                    .y_label_formatter(&|v| category_label(categories, *v))
                    .x_desc(chart.x_label.as_str())
                    .y_desc(chart.y_label.as_str())
                    .draw()?;

                for ((series, segments), color) in data.series.iter().zip(&stacked).zip(&palette) {
                    let color = rgb(*color);
                    ctx.draw_series(segments.iter().enumerate().map(|(i, s)| {
                        let y = i as f64;
                        Rectangle::new(
                            [(s.base, y - half), (s.base + s.value, y + half)],
                            color.filled(),
                        )
                    }))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], color.filled()));
                }
                ctx.configure_series_labels()
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()?;
            }
        }
        Ok(())
    }

    fn draw_lines<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        data: &CategoryData,
    ) -> DrawResult<DB> {
        let n = data.categories.len();
        let (lo, hi) = data.value_range().unwrap_or((0.0, 1.0));
        let categories = &data.categories;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(category_range(n), padded(lo, hi))?;

        ctx.configure_mesh()
            .x_labels(n + 1)
            .x_label_formatter(&|v| category_label(categories, *v))
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()?;

        let palette = colors::series_palette(data.series.len());
        for (series, color) in data.series.iter().zip(palette) {
            let color = rgb(color);
            for run in series.runs() {
                ctx.draw_series(LineSeries::new(
                    run.into_iter().map(|[x, y]| (x, y)),
                    color.stroke_width(2),
                ))?;
            }
            ctx.draw_series(
                series
                    .points()
                    .into_iter()
                    .map(|[x, y]| Circle::new((x, y), 4, color.filled())),
            )?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}
