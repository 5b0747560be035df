//! Column-oriented view of the record store used for charting.
//!
//! A column is numeric when every cell is a number or missing, and
//! categorical otherwise. Missing numbers are stored as NaN; missing
//! categories as `None`.

use crate::data::{Record, Schema, Value};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Unknown column '{0}'.")]
    UnknownColumn(String),
    #[error("Column '{0}' is not categorical.")]
    NotCategorical(String),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

static MISSING: Value = Value::Missing;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    pub name: String,
    pub data: ColumnData,
}

impl FrameColumn {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<FrameColumn>,
    height: usize,
}

impl Frame {
    /// Build a typed frame from the record store.
    pub fn from_records(schema: &Schema, records: &[Record]) -> Self {
        let columns = schema
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&Value> = records
                    .iter()
                    .map(|r| r.values().get(idx).unwrap_or(&MISSING))
                    .collect();
                let numeric = cells.iter().all(|v| !v.is_text());
                if numeric {
                    FrameColumn::numeric(
                        name.clone(),
                        cells
                            .iter()
                            .map(|v| v.as_number().unwrap_or(f64::NAN))
                            .collect(),
                    )
                } else {
                    FrameColumn::categorical(
                        name.clone(),
                        cells
                            .iter()
                            .map(|v| match v {
                                Value::Missing => None,
                                other => Some(other.to_string()),
                            })
                            .collect(),
                    )
                }
            })
            .collect();

        Self {
            columns,
            height: records.len(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn column(&self, name: &str) -> Option<&FrameColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Values of a numeric column.
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(FrameColumn::as_numeric)
    }

    /// Numeric columns by position, name alongside values.
    pub fn numeric_slices(&self) -> Vec<(&str, &[f64])> {
        self.columns
            .iter()
            .filter_map(|c| c.as_numeric().map(|v| (c.name.as_str(), v)))
            .collect()
    }

    /// Polars view of the frame. NaN numbers become nulls.
    pub fn to_polars(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let name = PlSmallStr::from(c.name.as_str());
                match &c.data {
                    ColumnData::Numeric(values) => {
                        let values: Vec<Option<f64>> =
                            values.iter().map(|v| (!v.is_nan()).then_some(*v)).collect();
                        Column::new(name, values)
                    }
                    ColumnData::Categorical(values) => Column::new(name, values.as_slice()),
                }
            })
            .collect();
        DataFrame::new(columns)
    }

    /// Back from polars: string columns are categorical, everything else
    /// is cast to f64 with nulls as NaN.
    pub fn from_polars(df: &DataFrame) -> PolarsResult<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(|c| -> PolarsResult<FrameColumn> {
                let name = c.name().to_string();
                if c.dtype() == &DataType::String {
                    let values = c.str()?.into_iter().map(|v| v.map(str::to_string)).collect();
                    Ok(FrameColumn::categorical(name, values))
                } else {
                    let cast = c.cast(&DataType::Float64)?;
                    let values = cast.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
                    Ok(FrameColumn::numeric(name, values))
                }
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self {
            columns,
            height: df.height(),
        })
    }

    fn categorical_keys(&self, name: &str) -> Result<&[Option<String>], FrameError> {
        self.column(name)
            .ok_or_else(|| FrameError::UnknownColumn(name.to_string()))?
            .as_categorical()
            .ok_or_else(|| FrameError::NotCategorical(name.to_string()))
    }

    /// Group rows by the categorical column `by` and sum every numeric
    /// column. Keys come out sorted; rows with a missing key are dropped;
    /// NaN cells are skipped. Other categorical columns are dropped.
    pub fn group_sum(&self, by: &str) -> Result<Frame, FrameError> {
        self.categorical_keys(by)?;

        let sums: Vec<Expr> = self
            .columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| col(c.name.as_str()).sum().fill_null(lit(0.0)))
            .collect();

        let grouped = self
            .to_polars()?
            .lazy()
            .filter(col(by).is_not_null())
            .group_by([col(by)])
            .agg(sums)
            .sort_by_exprs([col(by)], SortMultipleOptions::default())
            .collect()?;

        Ok(Frame::from_polars(&grouped)?)
    }

    /// Replace categorical column `name` with one 0/1 indicator column per
    /// distinct value, appended at the end in sorted order. Indicators are
    /// named by the value alone unless that clashes with a kept column, in
    /// which case the `name_` prefix stays.
    pub fn one_hot(&self, name: &str) -> Result<Frame, FrameError> {
        let keys = self.categorical_keys(name)?;
        let dummies = Series::new(name.into(), keys).to_dummies(None, false)?;
        let prefix = format!("{name}_");

        let mut columns: Vec<FrameColumn> = self
            .columns
            .iter()
            .filter(|c| c.name != name)
            .cloned()
            .collect();

        for dummy in dummies.get_columns() {
            let cast = dummy.cast(&DataType::Float64)?;
            let indicator: Vec<f64> = cast.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect();

            // polars gives missing keys their own group
            let first_hit = indicator.iter().position(|&v| v == 1.0);
            if first_hit.is_some_and(|row| keys[row].is_none()) {
                continue;
            }

            let full = dummy.name().as_str();
            let value = full.strip_prefix(prefix.as_str()).unwrap_or(full);
            let label = if columns.iter().any(|c| c.name == value) {
                log::debug!("one-hot column '{value}' clashes, keeping '{full}'");
                full
            } else {
                value
            };
            columns.push(FrameColumn::numeric(label, indicator));
        }

        Ok(Frame {
            columns,
            height: self.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn sample() -> Frame {
        let schema = Schema::new(vec![
            "store".into(),
            "sales".into(),
            "profit".into(),
            "tier".into(),
        ]);
        let records = vec![
            Record::new(vec![text("b"), Value::Number(1.0), Value::Number(10.0), text("gold")]),
            Record::new(vec![text("a"), Value::Number(2.0), Value::Missing, text("gold")]),
            Record::new(vec![text("b"), Value::Number(3.0), Value::Number(30.0), text("silver")]),
        ];
        Frame::from_records(&schema, &records)
    }

    #[test]
    fn classifies_columns_by_content() {
        let frame = sample();
        assert_eq!(frame.numeric_columns(), ["sales", "profit"]);
        assert_eq!(frame.categorical_columns(), ["store", "tier"]);
        assert!(frame.numeric("profit").expect("profit")[1].is_nan());
    }

    #[test]
    fn text_in_numeric_column_makes_it_categorical() {
        let schema = Schema::new(vec!["k".into(), "v".into()]);
        let records = vec![
            Record::new(vec![text("x"), Value::Number(1.0)]),
            Record::new(vec![text("y"), text("oops")]),
        ];
        let frame = Frame::from_records(&schema, &records);
        assert_eq!(frame.categorical_columns(), ["k", "v"]);
        assert_eq!(
            frame.column("v").and_then(FrameColumn::as_categorical),
            Some(&[Some("1".to_string()), Some("oops".to_string())][..])
        );
    }

    #[test]
    fn group_sum_sorts_keys_and_skips_nan() {
        let grouped = sample().group_sum("store").expect("grouped");
        assert_eq!(grouped.height(), 2);
        assert_eq!(grouped.categorical_columns(), ["store"]);
        assert_eq!(grouped.numeric("sales"), Some(&[2.0, 4.0][..]));
        assert_eq!(grouped.numeric("profit"), Some(&[0.0, 40.0][..]));
    }

    #[test]
    fn group_sum_requires_categorical_key() {
        assert!(matches!(
            sample().group_sum("sales"),
            Err(FrameError::NotCategorical(ref c)) if c == "sales"
        ));
        assert!(matches!(
            sample().group_sum("nope"),
            Err(FrameError::UnknownColumn(_))
        ));
    }

    #[test]
    fn group_sum_drops_missing_keys() {
        let schema = Schema::new(vec!["k".into(), "v".into()]);
        let records = vec![
            Record::new(vec![text("x"), Value::Number(1.0)]),
            Record::new(vec![Value::Missing, Value::Number(5.0)]),
            Record::new(vec![text("x"), Value::Number(2.0)]),
        ];
        let grouped = Frame::from_records(&schema, &records)
            .group_sum("k")
            .expect("grouped");
        assert_eq!(
            grouped.column("k").and_then(FrameColumn::as_categorical),
            Some(&[Some("x".to_string())][..])
        );
        assert_eq!(grouped.numeric("v"), Some(&[3.0][..]));
    }

    #[test]
    fn one_hot_appends_indicators_named_by_value() {
        let encoded = sample().one_hot("store").expect("encoded");
        assert_eq!(encoded.numeric_columns(), ["sales", "profit", "a", "b"]);
        assert_eq!(encoded.numeric("a"), Some(&[0.0, 1.0, 0.0][..]));
        assert_eq!(encoded.numeric("b"), Some(&[1.0, 0.0, 1.0][..]));
        assert_eq!(encoded.categorical_columns(), ["tier"]);
    }

    #[test]
    fn one_hot_leaves_missing_keys_all_zero() {
        let schema = Schema::new(vec!["k".into(), "v".into()]);
        let records = vec![
            Record::new(vec![text("x"), Value::Number(1.0)]),
            Record::new(vec![Value::Missing, Value::Number(2.0)]),
        ];
        let encoded = Frame::from_records(&schema, &records)
            .one_hot("k")
            .expect("encoded");
        assert_eq!(encoded.numeric_columns(), ["v", "x"]);
        assert_eq!(encoded.numeric("x"), Some(&[1.0, 0.0][..]));
    }

    #[test]
    fn one_hot_keeps_prefix_when_value_matches_a_column() {
        let schema = Schema::new(vec!["store".into(), "v".into(), "w".into()]);
        let records = vec![
            Record::new(vec![text("w"), Value::Number(1.0), Value::Number(1.0)]),
            Record::new(vec![text("a"), Value::Number(2.0), Value::Number(2.0)]),
            Record::new(vec![text("w"), Value::Number(3.0), Value::Number(4.0)]),
        ];
        let encoded = Frame::from_records(&schema, &records)
            .one_hot("store")
            .expect("encoded");
        assert_eq!(encoded.numeric_columns(), ["v", "w", "a", "store_w"]);
        assert_eq!(encoded.numeric("w"), Some(&[1.0, 2.0, 4.0][..]));
        assert_eq!(encoded.numeric("store_w"), Some(&[1.0, 0.0, 1.0][..]));
    }

    #[test]
    fn polars_round_trip_keeps_nan_and_missing() {
        let frame = sample();
        let df = frame.to_polars().expect("to polars");
        assert_eq!(df.column("profit").expect("profit").null_count(), 1);
        let back = Frame::from_polars(&df).expect("from polars");
        assert_eq!(back.numeric_columns(), frame.numeric_columns());
        assert_eq!(back.categorical_columns(), frame.categorical_columns());
        assert_eq!(back.numeric("sales"), frame.numeric("sales"));
        assert!(back.numeric("profit").expect("profit")[1].is_nan());
    }
}
