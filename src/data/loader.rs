//! CSV Data Loader Module
//! Reads a headed CSV file with Polars and converts it into a schema plus records.

use crate::data::model::{first_duplicate, Record, Schema, Value};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file is empty.")]
    Empty,
    #[error("Column '{0}' is listed more than once.")]
    DuplicateColumn(String),
}

/// Result of reading a CSV file.
#[derive(Debug, Clone)]
pub struct LoadedCsv {
    pub schema: Schema,
    pub records: Vec<Record>,
    /// Cells in non-label columns that could not be read as numbers.
    pub text_cells: usize,
}

/// Loads CSV files with Polars.
pub struct DataLoader {
    separator: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl DataLoader {
    pub fn new(separator: u8) -> Self {
        Self { separator }
    }

    /// Load a CSV file. Every column is read as text; the label column stays
    /// text and the others are coerced cell by cell.
    pub fn load_csv(&self, path: &Path) -> Result<LoadedCsv, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(self.separator)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        let loaded = Self::from_dataframe(&df)?;

        // polars renames repeated headers, so check the raw first line
        let header = self.raw_header(path)?;
        if let Some(dup) = first_duplicate(&header) {
            return Err(LoaderError::DuplicateColumn(dup.to_string()));
        }

        Ok(loaded)
    }

    /// The first line of the file as written, read as a data row.
    fn raw_header(&self, path: &Path) -> Result<Vec<String>, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(false)
            .with_separator(self.separator)
            .with_infer_schema_length(Some(0))
            .with_n_rows(Some(1))
            .finish()?
            .collect()?;

        let header = df
            .get_columns()
            .iter()
            .map(|c| -> PolarsResult<String> {
                Ok(c.str()?.get(0).unwrap_or_default().trim().to_string())
            })
            .collect::<PolarsResult<Vec<String>>>()?;
        Ok(header)
    }

    fn from_dataframe(df: &DataFrame) -> Result<LoadedCsv, LoaderError> {
        if df.height() == 0 {
            return Err(LoaderError::Empty);
        }

        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let cells = df
            .get_columns()
            .iter()
            .map(|col| col.as_materialized_series().str())
            .collect::<PolarsResult<Vec<&StringChunked>>>()?;

        let mut text_cells = 0;
        let mut records = Vec::with_capacity(df.height());

        for row in 0..df.height() {
            let values = cells
                .iter()
                .enumerate()
                .map(|(idx, ca)| match ca.get(row) {
                    None => Value::Missing,
                    Some(raw) if idx == 0 => Value::Text(raw.to_string()),
                    Some(raw) => {
                        let value = Value::coerce(raw);
                        if value.is_text() {
                            text_cells += 1;
                        }
                        value
                    }
                })
                .collect();
            records.push(Record::new(values));
        }

        log::debug!(
            "parsed {} rows x {} columns ({} text cells in numeric columns)",
            records.len(),
            columns.len(),
            text_cells
        );

        Ok(LoadedCsv {
            schema: Schema::new(columns),
            records,
            text_cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file.flush().expect("flush csv");
        file
    }

    #[test]
    fn loads_header_as_schema_and_coerces_numbers() {
        let file = write_csv("city,sales,profit\nParis,10,2.5\nRome,7,x\n");
        let loaded = DataLoader::default().load_csv(file.path()).expect("load");

        assert_eq!(loaded.schema.columns(), ["city", "sales", "profit"]);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(
            loaded.records[0].values(),
            [
                Value::Text("Paris".into()),
                Value::Number(10.0),
                Value::Number(2.5)
            ]
        );
        assert_eq!(loaded.records[1].values().get(2), Some(&Value::Text("x".into())));
        assert_eq!(loaded.text_cells, 1);
    }

    #[test]
    fn label_column_stays_text_even_when_numeric() {
        let file = write_csv("id,value\n1,3\n2,4\n");
        let loaded = DataLoader::default().load_csv(file.path()).expect("load");
        assert_eq!(loaded.records[0].values().get(0), Some(&Value::Text("1".into())));
    }

    #[test]
    fn empty_cells_become_missing() {
        let file = write_csv("name,a,b\nx,,1\ny,2,3\n");
        let loaded = DataLoader::default().load_csv(file.path()).expect("load");
        assert_eq!(loaded.records[0].values().get(1), Some(&Value::Missing));
        assert_eq!(loaded.text_cells, 0);
    }

    #[test]
    fn header_only_file_is_rejected() {
        let file = write_csv("name,a,b\n");
        assert!(DataLoader::default().load_csv(file.path()).is_err());
    }

    #[test]
    fn repeated_header_is_rejected() {
        let file = write_csv("name,a,a\nx,1,2\n");
        let err = DataLoader::default().load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateColumn(ref c) if c == "a"));
    }

    #[test]
    fn quoted_header_names_are_compared_unquoted() {
        let file = write_csv("\"name\",\"a,b\",a\nx,1,2\n");
        let loaded = DataLoader::default().load_csv(file.path()).expect("load");
        assert_eq!(loaded.schema.columns(), ["name", "a,b", "a"]);
    }

    #[test]
    fn custom_separator() {
        let file = write_csv("name;a\nx;1\n");
        let loaded = DataLoader::new(b';').load_csv(file.path()).expect("load");
        assert_eq!(loaded.schema.columns(), ["name", "a"]);
        assert_eq!(loaded.records[0].values().get(1), Some(&Value::Number(1.0)));
    }
}
