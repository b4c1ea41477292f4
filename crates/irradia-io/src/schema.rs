//! Schema and column kinds for measurement tables

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What a column holds, decided by sampling its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Mostly parseable as f64; unparseable cells become NaN
    Numeric,
    /// The designated timestamp column
    Timestamp,
    /// Free text, kept in the schema but not materialized
    Text,
}

impl ColumnKind {
    /// Check if this kind carries measurement values
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name as it appears in the header row
    pub name: String,

    /// Detected kind
    pub kind: ColumnKind,
}

impl ColumnMeta {
    /// Create a new column descriptor
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Schema describing the structure of one source table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSchema {
    /// Column descriptors in header order
    pub columns: Vec<ColumnMeta>,

    /// Number of data rows
    pub num_rows: usize,
}

impl TableSchema {
    /// Create a new schema
    pub fn new(columns: Vec<ColumnMeta>, num_rows: usize) -> Self {
        Self { columns, num_rows }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of the numeric columns, in header order
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Which of the given columns are absent from this schema
    pub fn require(&self, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .filter(|n| self.column(n).is_none())
            .map(|n| n.to_string())
            .collect()
    }
}

/// One source file, parsed into numeric columns plus an optional
/// timestamp column. Text columns appear in the schema only.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Path the table was read from
    pub path: String,

    /// Detected schema
    pub schema: TableSchema,

    /// Numeric columns in header order; NaN marks a missing or
    /// unparseable cell
    pub columns: Vec<(String, Vec<f64>)>,

    /// Parsed timestamps when a timestamp column was found; rows whose
    /// cell failed to parse hold `None`
    pub timestamps: Option<Vec<Option<NaiveDateTime>>>,
}

impl SourceTable {
    /// Number of data rows
    pub fn num_rows(&self) -> usize {
        self.schema.num_rows
    }

    /// Values of a numeric column by name
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }
}
