//! Statistics Calculator Module
//! Pearson correlation between numeric frame columns.

use crate::stats::Frame;
use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Square correlation matrix with row/column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Smallest and largest finite coefficient, if any.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None::<(f64, f64)>, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Pearson correlation over the rows where both values are present.
    ///
    /// Returns NaN for fewer than two complete rows or a constant input.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y)
            .filter(|(a, b)| !a.is_nan() && !b.is_nan())
            .map(|(a, b)| (*a, *b))
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }

        let cov = xs.iter().covariance(ys.iter());
        (cov / (sx * sy)).clamp(-1.0, 1.0)
    }

    /// Correlation matrix of every numeric column of `frame`, in column order.
    pub fn correlation_matrix(frame: &Frame) -> CorrelationMatrix {
        let (labels, columns): (Vec<String>, Vec<&[f64]>) = frame
            .numeric_slices()
            .into_iter()
            .map(|(name, values)| (name.to_string(), values))
            .unzip();

        // Rows in parallel
        let values = (0..columns.len())
            .into_par_iter()
            .map(|i| {
                (0..columns.len())
                    .map(|j| Self::pearson(columns[i], columns[j]))
                    .collect::<Vec<f64>>()
            })
            .collect();

        CorrelationMatrix { labels, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartBody, ChartBuilder, ChartKind};
    use crate::data::{Record, Schema, Value};

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(close(StatsCalculator::pearson(&x, &[2.0, 4.0, 6.0, 8.0]), 1.0));
        assert!(close(StatsCalculator::pearson(&x, &[8.0, 6.0, 4.0, 2.0]), -1.0));
    }

    #[test]
    fn constant_or_short_input_is_nan() {
        assert!(StatsCalculator::pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_nan());
        assert!(StatsCalculator::pearson(&[1.0], &[2.0]).is_nan());
    }

    #[test]
    fn nan_rows_are_dropped_pairwise() {
        let x = [1.0, f64::NAN, 2.0, 3.0];
        let y = [1.0, 100.0, 2.0, 3.0];
        assert!(close(StatsCalculator::pearson(&x, &y), 1.0));
    }

    #[test]
    fn matrix_is_symmetric_and_skips_categorical() {
        let schema = Schema::new(vec!["k".into(), "x".into(), "y".into()]);
        let records = vec![
            Record::new(vec![text("a"), Value::Number(1.0), Value::Number(1.0)]),
            Record::new(vec![text("b"), Value::Number(2.0), Value::Number(3.0)]),
            Record::new(vec![Value::Missing, Value::Number(3.0), Value::Number(2.0)]),
        ];
        let frame = Frame::from_records(&schema, &records);
        let matrix = StatsCalculator::correlation_matrix(&frame);
        assert_eq!(matrix.labels, ["x", "y"]);
        assert!(close(matrix.values[0][0], 1.0));
        assert!(close(matrix.values[0][1], matrix.values[1][0]));
        assert!(close(matrix.values[0][1], 0.5));
        let (lo, hi) = matrix.finite_range().expect("finite values");
        assert!(close(lo, 0.5));
        assert!(close(hi, 1.0));
    }

    #[test]
    fn indicator_named_like_a_column_is_correlated_separately() {
        let schema = Schema::new(vec!["store".into(), "v".into(), "w".into()]);
        let records = vec![
            Record::new(vec![text("w"), Value::Number(1.0), Value::Number(1.0)]),
            Record::new(vec![text("a"), Value::Number(2.0), Value::Number(2.0)]),
            Record::new(vec![text("w"), Value::Number(3.0), Value::Number(4.0)]),
        ];
        let frame = Frame::from_records(&schema, &records);
        let encoded = frame.one_hot("store").expect("encoded");
        let matrix = StatsCalculator::correlation_matrix(&encoded);
        assert_eq!(matrix.labels, ["v", "w", "a", "store_w"]);

        let w = [1.0, 2.0, 4.0];
        let indicator = [1.0, 0.0, 1.0];
        let expected = StatsCalculator::pearson(&w, &indicator);
        assert!(!close(expected, 1.0));
        assert!(close(matrix.values[1][3], expected));
        assert!(close(matrix.values[1][1], 1.0));

        let chart = ChartBuilder::build(ChartKind::OneHotHeatmap, &frame).expect("chart");
        let ChartBody::Heatmap(heat) = chart.body else {
            panic!("expected heatmap");
        };
        assert_eq!(heat.matrix, matrix);
    }
}
