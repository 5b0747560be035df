//! Record Model
//! Cell values, records and the column schema they share.

use std::fmt;

/// A single cell of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    /// Empty cell from an imported file.
    Missing,
}

impl Value {
    /// Best-effort numeric coercion used by CSV import: numbers become
    /// `Number`, anything else is kept verbatim as `Text`.
    pub fn coerce(raw: &str) -> Self {
        match parse_number(raw) {
            Some(n) => Value::Number(n),
            None => Value::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Missing => Ok(()),
        }
    }
}

/// Parse a trimmed decimal number. Returns `None` for blanks and text.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// First name that appears more than once, in column order.
pub fn first_duplicate(columns: &[String]) -> Option<&str> {
    columns
        .iter()
        .enumerate()
        .find(|&(i, c)| columns[..i].contains(c))
        .map(|(_, c)| c.as_str())
}

/// Ordered list of unique column names. The first column is the label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns joined the way they are typed into the schema entry.
    pub fn joined(&self) -> String {
        self.columns.join(", ")
    }
}

/// One row of data. Values are stored in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Display strings for the grid, one per column.
    pub fn display_row(&self) -> Vec<String> {
        self.values.iter().map(ToString::to_string).collect()
    }
}
