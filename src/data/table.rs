//! Schema/Table Manager
//! Owns the column schema, the record store, the display grid and the entry
//! form, and keeps all four in step on every schema transition.

use crate::data::loader::{DataLoader, LoaderError};
use crate::data::model::{first_duplicate, parse_number, Record, Schema, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Please enter at least one column name.")]
    EmptySchema,
    #[error("Invalid column names.")]
    InvalidColumns,
    #[error("Column '{0}' is listed more than once.")]
    DuplicateColumn(String),
    #[error("Set the columns before adding rows.")]
    NoSchema,
    #[error("Expected {expected} values but got {actual}.")]
    FieldCount { expected: usize, actual: usize },
    #[error("Field '{0}' cannot be empty")]
    EmptyField(String),
    #[error("Field '{0}' must be numeric")]
    NotNumeric(String),
    #[error("CSV file is empty.")]
    EmptyCsv,
    #[error(transparent)]
    Load(LoaderError),
}

impl From<LoaderError> for TableError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::Empty => TableError::EmptyCsv,
            LoaderError::DuplicateColumn(name) => TableError::DuplicateColumn(name),
            other => TableError::Load(other),
        }
    }
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub text_cells: usize,
}

/// One labeled input of the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryField {
    pub column: String,
    pub value: String,
}

/// Data entry form, one field per schema column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub fields: Vec<EntryField>,
}

impl EntryForm {
    /// Build a blank form for `schema`.
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            fields: schema
                .columns()
                .iter()
                .map(|column| EntryField {
                    column: column.clone(),
                    value: String::new(),
                })
                .collect(),
        }
    }

    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.clone()).collect()
    }

    pub fn clear(&mut self) {
        self.fields.iter_mut().for_each(|f| f.value.clear());
    }
}

/// Display rows shown in the table view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    fn from_schema(schema: &Schema) -> Self {
        Self {
            headers: schema.columns().to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Holds the active schema and all records.
#[derive(Debug, Default)]
pub struct TableManager {
    schema: Schema,
    records: Vec<Record>,
    grid: Grid,
    form: EntryForm,
}

impl TableManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Data entry is possible once a schema is active.
    pub fn data_entry_enabled(&self) -> bool {
        !self.schema.is_empty()
    }

    /// Parse comma-separated column names and make them the active schema.
    pub fn set_schema(&mut self, input: &str) -> Result<(), TableError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TableError::EmptySchema);
        }

        let columns: Vec<String> = input
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if columns.is_empty() {
            return Err(TableError::InvalidColumns);
        }
        if let Some(dup) = first_duplicate(&columns) {
            return Err(TableError::DuplicateColumn(dup.to_string()));
        }

        log::info!("schema set: {}", columns.join(", "));
        self.replace_schema(Schema::new(columns));
        Ok(())
    }

    /// Validate one row of raw form values and append it.
    pub fn add_record(&mut self, values: &[String]) -> Result<(), TableError> {
        if self.schema.is_empty() {
            return Err(TableError::NoSchema);
        }
        if values.len() != self.schema.len() {
            return Err(TableError::FieldCount {
                expected: self.schema.len(),
                actual: values.len(),
            });
        }

        let mut row = Vec::with_capacity(values.len());
        for (idx, (column, raw)) in self.schema.columns().iter().zip(values).enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(TableError::EmptyField(column.clone()));
            }
            if idx == 0 {
                row.push(Value::Text(raw.to_string()));
            } else {
                let n = parse_number(raw).ok_or_else(|| TableError::NotNumeric(column.clone()))?;
                row.push(Value::Number(n));
            }
        }

        let record = Record::new(row);
        self.grid.rows.push(record.display_row());
        self.records.push(record);
        self.form.clear();
        Ok(())
    }

    /// Submit the entry form contents as a new record.
    pub fn submit_form(&mut self) -> Result<(), TableError> {
        let values = self.form.values();
        self.add_record(&values)
    }

    /// Replace schema and records with the contents of a CSV file.
    pub fn import_csv(
        &mut self,
        loader: &DataLoader,
        path: &Path,
    ) -> Result<ImportSummary, TableError> {
        let loaded = loader.load_csv(path)?;

        self.replace_schema(loaded.schema);
        self.grid.rows = loaded.records.iter().map(Record::display_row).collect();
        self.records = loaded.records;

        let summary = ImportSummary {
            rows: self.records.len(),
            text_cells: loaded.text_cells,
        };
        log::info!(
            "imported {} rows from {}",
            summary.rows,
            path.display()
        );
        if summary.text_cells > 0 {
            log::warn!(
                "{} non-numeric cells kept as text in numeric columns",
                summary.text_cells
            );
        }
        Ok(summary)
    }

    /// Clear schema, records, grid and form. Confirmation is the caller's job.
    pub fn reset(&mut self) {
        log::info!("table reset ({} records dropped)", self.records.len());
        *self = Self::default();
    }

    fn replace_schema(&mut self, schema: Schema) {
        self.records.clear();
        self.grid = Grid::from_schema(&schema);
        self.form = EntryForm::from_schema(&schema);
        self.schema = schema;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn table_with(columns: &str) -> TableManager {
        let mut table = TableManager::new();
        table.set_schema(columns).expect("schema");
        table
    }

    #[test]
    fn blank_schema_is_rejected() {
        let mut table = TableManager::new();
        assert!(matches!(table.set_schema("   "), Err(TableError::EmptySchema)));
        assert!(matches!(table.set_schema(" , ,"), Err(TableError::InvalidColumns)));
        assert!(!table.data_entry_enabled());
    }

    #[test]
    fn schema_names_are_trimmed_and_split() {
        let table = table_with(" name ,sales,, profit ");
        assert_eq!(table.schema().columns(), ["name", "sales", "profit"]);
        assert_eq!(table.grid().headers, ["name", "sales", "profit"]);
        let form_columns: Vec<&str> = table
            .form()
            .fields
            .iter()
            .map(|f| f.column.as_str())
            .collect();
        assert_eq!(form_columns, ["name", "sales", "profit"]);
        assert!(table.data_entry_enabled());
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let mut table = TableManager::new();
        let err = table.set_schema("a, b, a").unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn(ref c) if c == "a"));
    }

    #[test]
    fn empty_field_is_rejected_by_name() {
        let mut table = table_with("name, sales");
        let err = table.add_record(&strings(&["Paris", " "])).unwrap_err();
        assert_eq!(err.to_string(), "Field 'sales' cannot be empty");
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let mut table = table_with("name, sales");
        let err = table.add_record(&strings(&["Paris", "ten"])).unwrap_err();
        assert_eq!(err.to_string(), "Field 'sales' must be numeric");
    }

    #[test]
    fn label_may_be_any_text() {
        let mut table = table_with("name, sales");
        table.add_record(&strings(&["42", "1.5"])).expect("add");
        assert_eq!(
            table.records()[0].values(),
            [Value::Text("42".into()), Value::Number(1.5)]
        );
        assert_eq!(table.grid().rows, vec![strings(&["42", "1.5"])]);
    }

    #[test]
    fn submit_form_appends_and_clears() {
        let mut table = table_with("name, sales");
        table.form_mut().fields[0].value = "Rome".into();
        table.form_mut().fields[1].value = "3".into();
        table.submit_form().expect("submit");
        assert_eq!(table.row_count(), 1);
        assert!(table.form().fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn failed_submit_keeps_form_contents() {
        let mut table = table_with("name, sales");
        table.form_mut().fields[0].value = "Rome".into();
        assert!(table.submit_form().is_err());
        assert_eq!(table.form().fields[0].value, "Rome");
    }

    #[test]
    fn schema_change_clears_store_and_grid() {
        let mut table = table_with("name, sales");
        table.add_record(&strings(&["a", "1"])).expect("add");
        table.set_schema("x, y, z").expect("schema");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.grid().row_count(), 0);
        assert_eq!(table.form().fields.len(), 3);
    }

    #[test]
    fn add_without_schema_fails() {
        let mut table = TableManager::new();
        assert!(matches!(
            table.add_record(&strings(&["a"])),
            Err(TableError::NoSchema)
        ));
    }

    #[test]
    fn reset_clears_everything() {
        let mut table = table_with("name, sales");
        table.add_record(&strings(&["a", "1"])).expect("add");
        table.reset();
        assert!(table.schema().is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.grid(), &Grid::default());
        assert!(!table.data_entry_enabled());
    }

    #[test]
    fn csv_import_replaces_schema_and_rows() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        writeln!(file, "region,q1,q2\nnorth,1,2\nsouth,3,oops\neast,5,6").expect("write");
        file.flush().expect("flush");

        let mut table = table_with("name, sales");
        table.add_record(&strings(&["a", "1"])).expect("add");

        let summary = table
            .import_csv(&DataLoader::default(), file.path())
            .expect("import");
        assert_eq!(summary, ImportSummary { rows: 3, text_cells: 1 });
        assert_eq!(table.schema().columns(), ["region", "q1", "q2"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.grid().row_count(), 3);
        assert_eq!(table.grid().rows[1], strings(&["south", "3", "oops"]));
    }

    #[test]
    fn csv_import_without_rows_is_rejected() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        writeln!(file, "region,q1").expect("write");
        file.flush().expect("flush");

        let mut table = table_with("name, sales");
        assert!(table.import_csv(&DataLoader::default(), file.path()).is_err());
        assert_eq!(table.schema().columns(), ["name", "sales"]);
    }

    #[test]
    fn csv_import_with_repeated_header_keeps_previous_table() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        writeln!(file, "name,a,a\nx,1,2").expect("write");
        file.flush().expect("flush");

        let mut table = table_with("name, sales");
        let err = table.import_csv(&DataLoader::default(), file.path()).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn(ref c) if c == "a"));
        assert_eq!(table.schema().columns(), ["name", "sales"]);
    }

    #[test]
    fn csv_import_of_missing_file_fails() {
        let mut table = TableManager::new();
        let result = table.import_csv(&DataLoader::default(), Path::new("/nonexistent/data.csv"));
        assert!(matches!(result, Err(TableError::Load(_))));
    }
}
