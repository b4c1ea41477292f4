//! Dataset loading and merging
//!
//! Each group is backed by one CSV export. The loader reads every
//! source it can, skips the ones it cannot (with a warning), and
//! concatenates the survivors into a [`MergedTable`] over the union of
//! their numeric columns. Columns a source lacks are NaN-filled so the
//! merged table stays rectangular.

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::MergedTable;
use chrono::NaiveDateTime;
use irradia_io::{read_csv, ReadOptions, SourceTable};

/// One group's backing file
#[derive(Debug, Clone)]
pub struct SourceSpec {
    /// Group label the rows will carry
    pub group: String,
    /// Path of the CSV export
    pub path: String,
}

impl SourceSpec {
    /// Create a new source spec
    pub fn new(group: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            path: path.into(),
        }
    }
}

/// Loads a set of sources into one merged table
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader {
    required_columns: Vec<String>,
    timestamp_column: Option<String>,
    delimiter: Option<u8>,
}

impl DatasetLoader {
    /// Create a loader with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns every loaded source must have
    pub fn with_required_columns(mut self, columns: &[&str]) -> Self {
        self.required_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Header of the timestamp column, overriding auto-detection
    pub fn with_timestamp_column(mut self, name: impl Into<String>) -> Self {
        self.timestamp_column = Some(name.into());
        self
    }

    /// Field delimiter for every source
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Load and merge the given sources.
    ///
    /// A source that cannot be read is logged and skipped; the load
    /// fails with [`AnalysisError::DataUnavailable`] only when nothing
    /// could be read at all. A source that reads but lacks a required
    /// column fails the whole load.
    pub fn load(&self, sources: &[SourceSpec]) -> AnalysisResult<MergedTable> {
        let options = ReadOptions {
            delimiter: self.delimiter.unwrap_or(b','),
            timestamp_column: self.timestamp_column.clone(),
        };
        let required: Vec<&str> = self.required_columns.iter().map(|c| c.as_str()).collect();

        let mut loaded: Vec<(String, SourceTable)> = Vec::new();
        for spec in sources {
            match read_csv(&spec.path, &options) {
                Ok(table) => {
                    let missing = table.schema.require(&required);
                    if !missing.is_empty() {
                        return Err(AnalysisError::SchemaInvalid {
                            path: spec.path.clone(),
                            missing,
                        });
                    }
                    tracing::info!(
                        "Loaded {} rows for group '{}' from {}",
                        table.num_rows(),
                        spec.group,
                        spec.path
                    );
                    loaded.push((spec.group.clone(), table));
                }
                Err(e) => {
                    tracing::warn!("Skipping source '{}' ({}): {}", spec.group, spec.path, e);
                }
            }
        }

        if loaded.is_empty() {
            return Err(AnalysisError::DataUnavailable);
        }
        Ok(merge(&loaded))
    }
}

fn merge(loaded: &[(String, SourceTable)]) -> MergedTable {
    let mut groups: Vec<String> = Vec::new();
    let mut group_of_source: Vec<usize> = Vec::with_capacity(loaded.len());
    for (group, _) in loaded {
        let gi = match groups.iter().position(|g| g == group) {
            Some(i) => i,
            None => {
                groups.push(group.clone());
                groups.len() - 1
            }
        };
        group_of_source.push(gi);
    }

    // Union of numeric columns, first-seen order
    let mut metric_names: Vec<String> = Vec::new();
    for (_, table) in loaded {
        for (name, _) in &table.columns {
            if !metric_names.iter().any(|m| m == name) {
                metric_names.push(name.clone());
            }
        }
    }

    let total_rows: usize = loaded.iter().map(|(_, t)| t.num_rows()).sum();
    let any_timestamps = loaded.iter().any(|(_, t)| t.timestamps.is_some());

    let mut group_index = Vec::with_capacity(total_rows);
    let mut columns: Vec<(String, Vec<f64>)> = metric_names
        .into_iter()
        .map(|name| (name, Vec::with_capacity(total_rows)))
        .collect();
    let mut timestamps: Vec<Option<NaiveDateTime>> = Vec::new();

    for ((_, table), &gi) in loaded.iter().zip(&group_of_source) {
        let rows = table.num_rows();
        group_index.extend(std::iter::repeat(gi).take(rows));

        for (name, column) in columns.iter_mut() {
            match table.column(name) {
                Some(values) => column.extend_from_slice(values),
                None => column.extend(std::iter::repeat(f64::NAN).take(rows)),
            }
        }

        if any_timestamps {
            match &table.timestamps {
                Some(ts) => timestamps.extend(ts.iter().copied()),
                None => timestamps.extend(std::iter::repeat(None).take(rows)),
            }
        }
    }

    MergedTable::from_parts(
        groups,
        group_index,
        columns,
        any_timestamps.then_some(timestamps),
    )
}
