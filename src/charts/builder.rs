//! Chart Builder Module
//! Turns the record store into one of six chart descriptions. Both the
//! interactive plotter and the static renderer draw from these.

use crate::data::{Record, Schema};
use crate::stats::{CorrelationMatrix, Frame, FrameError, StatsCalculator};
use std::borrow::Cow;
use thiserror::Error;

/// The six supported chart recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Heatmap,
    OneHotHeatmap,
    Scatter,
    Bar,
    Column,
    Line,
}

impl ChartKind {
    pub const ALL: [Self; 6] = [
        Self::Heatmap,
        Self::OneHotHeatmap,
        Self::Scatter,
        Self::Bar,
        Self::Column,
        Self::Line,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Heatmap => "Heatmap",
            Self::OneHotHeatmap => "One-Hot Heatmap",
            Self::Scatter => "Scatter",
            Self::Bar => "Bar",
            Self::Column => "Column",
            Self::Line => "Line",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("At least 2 entries needed.")]
    NotEnoughEntries,
    #[error("No data to plot.")]
    NoData,
    #[error("Need at least two numeric columns for heatmap.")]
    HeatmapColumns,
    #[error("No categorical column found for one-hot encoding.")]
    NoCategorical,
    #[error("At least two numeric columns needed for scatter plot.")]
    ScatterColumns,
    #[error("No numeric columns to plot.")]
    NoNumeric,
    #[error("Could not prepare chart data: {0}")]
    Prepare(String),
}

impl From<FrameError> for ChartError {
    fn from(err: FrameError) -> Self {
        ChartError::Prepare(err.to_string())
    }
}

impl ChartError {
    /// Too few records is a warning; everything else is a data error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NotEnoughEntries | Self::NoData)
    }

    pub fn title(&self) -> &'static str {
        if self.is_warning() {
            "Not Enough Data"
        } else {
            "Data Error"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapData {
    pub matrix: CorrelationMatrix,
    /// Print each coefficient inside its cell.
    pub annotate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterData {
    /// Column the points are colored by, when grouped.
    pub legend_title: Option<String>,
    pub groups: Vec<ScatterGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    /// `(index, value)` points, NaN skipped.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.runs().into_iter().flatten().collect()
    }

    /// Maximal stretches of consecutive non-NaN values. A line is drawn
    /// per run so that missing values leave a gap.
    pub fn runs(&self) -> Vec<Vec<[f64; 2]>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for (i, &v) in self.values.iter().enumerate() {
            if v.is_nan() {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            } else {
                current.push([i as f64, v]);
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

/// One bar piece in a stacked chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub base: f64,
    pub value: f64,
}

/// Numeric series indexed by category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryData {
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl CategoryData {
    /// Stack series per category: positives grow up from zero, negatives
    /// grow down from zero, each in series order. NaN contributes nothing.
    pub fn stacked(&self) -> Vec<Vec<Segment>> {
        let n = self.categories.len();
        let mut pos = vec![0.0; n];
        let mut neg = vec![0.0; n];

        self.series
            .iter()
            .map(|s| {
                s.values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| {
                        if v.is_nan() {
                            Segment { base: pos[i], value: 0.0 }
                        } else if v >= 0.0 {
                            let seg = Segment { base: pos[i], value: v };
                            pos[i] += v;
                            seg
                        } else {
                            let seg = Segment { base: neg[i], value: v };
                            neg[i] += v;
                            seg
                        }
                    })
                    .collect::<Vec<Segment>>()
            })
            .collect()
    }

    /// Value extent of the stacked bars, always including zero.
    pub fn stacked_range(&self) -> (f64, f64) {
        self.stacked()
            .iter()
            .flatten()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), s| {
                let top = s.base + s.value;
                (lo.min(top).min(s.base), hi.max(top).max(s.base))
            })
    }

    /// Value extent of the raw series, ignoring NaN.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None::<(f64, f64)>, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Heatmap(HeatmapData),
    Scatter(ScatterData),
    StackedBars {
        orientation: Orientation,
        data: CategoryData,
    },
    Lines(CategoryData),
}

/// A fully prepared chart, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

/// Builds chart descriptions from the record store.
pub struct ChartBuilder;

impl ChartBuilder {
    pub fn from_records(
        kind: ChartKind,
        schema: &Schema,
        records: &[Record],
    ) -> Result<ChartData, ChartError> {
        Self::build(kind, &Frame::from_records(schema, records))
    }

    pub fn build(kind: ChartKind, frame: &Frame) -> Result<ChartData, ChartError> {
        match kind {
            ChartKind::Heatmap => Self::heatmap(frame),
            ChartKind::OneHotHeatmap => Self::one_hot_heatmap(frame),
            ChartKind::Scatter => Self::scatter(frame),
            ChartKind::Bar | ChartKind::Column | ChartKind::Line => {
                Self::category_chart(kind, frame)
            }
        }
    }

    fn heatmap(frame: &Frame) -> Result<ChartData, ChartError> {
        if frame.height() < 2 {
            return Err(ChartError::NotEnoughEntries);
        }
        if frame.numeric_columns().len() < 2 {
            return Err(ChartError::HeatmapColumns);
        }

        let categorical = frame.categorical_columns();
        let source = group_by_first(frame, &categorical)?;
        let matrix = StatsCalculator::correlation_matrix(&source);

        Ok(ChartData {
            kind: ChartKind::Heatmap,
            title: "Correlation Heatmap (Grouped)".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            body: ChartBody::Heatmap(HeatmapData {
                matrix,
                annotate: true,
            }),
        })
    }

    fn one_hot_heatmap(frame: &Frame) -> Result<ChartData, ChartError> {
        if frame.height() < 2 {
            return Err(ChartError::NotEnoughEntries);
        }
        let categorical = frame.categorical_columns();
        let first = categorical.first().ok_or(ChartError::NoCategorical)?;
        let encoded = frame.one_hot(first)?;

        let remaining = encoded.categorical_columns();
        let source = group_by_first(&encoded, &remaining)?;
        let matrix = StatsCalculator::correlation_matrix(&source);
        if matrix.labels.is_empty() {
            return Err(ChartError::NoNumeric);
        }

        Ok(ChartData {
            kind: ChartKind::OneHotHeatmap,
            title: "One-Hot Encoded Heatmap (Grouped)".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            body: ChartBody::Heatmap(HeatmapData {
                matrix,
                annotate: false,
            }),
        })
    }

    fn scatter(frame: &Frame) -> Result<ChartData, ChartError> {
        if frame.height() == 0 {
            return Err(ChartError::NoData);
        }
        let numeric = frame.numeric_columns();
        let [x_col, y_col, ..] = numeric.as_slice() else {
            return Err(ChartError::ScatterColumns);
        };

        let categorical = frame.categorical_columns();
        let hue = categorical.first().cloned();
        let source = group_by_first(frame, &categorical)?;

        let xs = source.numeric(x_col).unwrap_or_default();
        let ys = source.numeric(y_col).unwrap_or_default();
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| [x, y])
            .enumerate()
            .filter(|(_, [x, y])| !x.is_nan() && !y.is_nan());

        let groups = match &hue {
            Some(hue_col) => {
                let keys = source
                    .column(hue_col)
                    .and_then(|c| c.as_categorical())
                    .unwrap_or_default();
                points
                    .map(|(row, point)| ScatterGroup {
                        name: keys
                            .get(row)
                            .cloned()
                            .flatten()
                            .unwrap_or_default(),
                        points: vec![point],
                    })
                    .collect()
            }
            None => vec![ScatterGroup {
                name: y_col.clone(),
                points: points.map(|(_, p)| p).collect(),
            }],
        };

        Ok(ChartData {
            kind: ChartKind::Scatter,
            title: format!("Scatter Plot ({x_col} vs {y_col}) - Grouped"),
            x_label: x_col.clone(),
            y_label: y_col.clone(),
            body: ChartBody::Scatter(ScatterData {
                legend_title: hue,
                groups,
            }),
        })
    }

    fn category_chart(kind: ChartKind, frame: &Frame) -> Result<ChartData, ChartError> {
        if frame.height() == 0 {
            return Err(ChartError::NoData);
        }
        let numeric = frame.numeric_columns();
        if numeric.is_empty() {
            return Err(ChartError::NoNumeric);
        }

        let categorical = frame.categorical_columns();
        let group_col = categorical.first();
        let source = group_by_first(frame, &categorical)?;

        let categories: Vec<String> = match group_col {
            Some(col) => source
                .column(col)
                .and_then(|c| c.as_categorical())
                .map(|keys| keys.iter().map(|k| k.clone().unwrap_or_default()).collect())
                .unwrap_or_default(),
            None => (0..source.height()).map(|i| i.to_string()).collect(),
        };
        let series = numeric
            .iter()
            .map(|name| Series {
                name: name.clone(),
                values: source.numeric(name).map(<[f64]>::to_vec).unwrap_or_default(),
            })
            .collect();
        let data = CategoryData { categories, series };

        let chart = match kind {
            ChartKind::Bar => ChartData {
                kind,
                title: "Grouped Bar Chart".to_string(),
                x_label: "Values".to_string(),
                y_label: "Categories".to_string(),
                body: ChartBody::StackedBars {
                    orientation: Orientation::Horizontal,
                    data,
                },
            },
            ChartKind::Column => ChartData {
                kind,
                title: match group_col {
                    Some(col) => format!("Grouped Column Chart ({col})"),
                    None => "Column Chart".to_string(),
                },
                x_label: group_col.cloned().unwrap_or_else(|| "Index".to_string()),
                y_label: "Values".to_string(),
                body: ChartBody::StackedBars {
                    orientation: Orientation::Vertical,
                    data,
                },
            },
            _ => ChartData {
                kind: ChartKind::Line,
                title: "Grouped Line Chart".to_string(),
                x_label: group_col.cloned().unwrap_or_else(|| "Index".to_string()),
                y_label: "Values".to_string(),
                body: ChartBody::Lines(data),
            },
        };
        Ok(chart)
    }
}

/// Sum the frame by its first categorical column, if it has one.
fn group_by_first<'a>(
    frame: &'a Frame,
    categorical: &[String],
) -> Result<Cow<'a, Frame>, FrameError> {
    match categorical.first() {
        Some(col) => Ok(Cow::Owned(frame.group_sum(col)?)),
        None => Ok(Cow::Borrowed(frame)),
    }
}
