//! CSV source reader with column-kind detection

use crate::error::{IoError, IoResult};
use crate::schema::{ColumnKind, ColumnMeta, SourceTable, TableSchema};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Options for reading a CSV source
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field delimiter
    pub delimiter: u8,

    /// Header of the timestamp column. When `None`, a header matching
    /// "timestamp" case-insensitively is used if present.
    pub timestamp_column: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            timestamp_column: None,
        }
    }
}

/// Read a CSV file into a [`SourceTable`].
///
/// The header row is required. Column kinds are detected by sampling:
/// a column where at least half of the sampled non-empty cells parse
/// as f64 is numeric, and its unparseable or empty cells become NaN.
/// A column with no values at all is numeric too, all NaN. Everything
/// else is kept as text in the schema without materializing the data.
pub fn read_csv(path: &str, options: &ReadOptions) -> IoResult<SourceTable> {
    if !Path::new(path).exists() {
        return Err(IoError::FileNotFound {
            path: path.to_string(),
        });
    }

    let file = File::open(path).map_err(|source| IoError::OpenFailed {
        path: path.to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(IoError::EmptyTable {
            path: path.to_string(),
        });
    }

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for result in reader.records() {
        rows.push(result?);
    }

    let timestamp_index = locate_timestamp(&headers, options.timestamp_column.as_deref());

    let metas: Vec<ColumnMeta> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let kind = if Some(i) == timestamp_index {
                ColumnKind::Timestamp
            } else {
                sniff_kind(&rows, i)
            };
            ColumnMeta::new(name.clone(), kind)
        })
        .collect();

    let columns: Vec<(String, Vec<f64>)> = metas
        .iter()
        .enumerate()
        .filter(|(_, meta)| meta.kind.is_numeric())
        .map(|(i, meta)| {
            let values = rows
                .iter()
                .map(|row| {
                    row.get(i)
                        .map_or(f64::NAN, |cell| cell.trim().parse().unwrap_or(f64::NAN))
                })
                .collect();
            (meta.name.clone(), values)
        })
        .collect();

    let timestamps = timestamp_index.map(|i| {
        rows.iter()
            .map(|row| row.get(i).and_then(parse_timestamp))
            .collect()
    });

    let num_rows = rows.len();
    Ok(SourceTable {
        path: path.to_string(),
        schema: TableSchema::new(metas, num_rows),
        columns,
        timestamps,
    })
}

fn locate_timestamp(headers: &[String], configured: Option<&str>) -> Option<usize> {
    if let Some(name) = configured {
        return headers.iter().position(|h| h == name);
    }
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("timestamp"))
}

// Sample up to 100 non-empty cells; a majority of f64 parses makes the
// column numeric. An entirely empty column reads as numeric with every
// value NaN, matching how instrument exports represent unused fields.
fn sniff_kind(rows: &[csv::StringRecord], index: usize) -> ColumnKind {
    let mut sampled = 0;
    let mut parsed = 0;
    for row in rows {
        let cell = match row.get(index) {
            Some(c) => c.trim(),
            None => continue,
        };
        if cell.is_empty() {
            continue;
        }
        sampled += 1;
        if cell.parse::<f64>().is_ok() {
            parsed += 1;
        }
        if sampled >= 100 {
            break;
        }
    }

    if sampled == 0 || parsed * 2 >= sampled {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

// Accepts the timestamp layouts seen in measurement exports; a failed
// parse marks the row as having no timestamp rather than failing the
// whole read.
fn parse_timestamp(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%m/%d/%Y %H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(cell, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
