//! irradia-io - Source ingestion for irradiance measurement tables
//!
//! Measurement exports arrive as CSV files with a header row, an
//! optional timestamp column, and an arbitrary mix of numeric and
//! free-text columns. This crate reads one file into a [`SourceTable`]:
//!
//! - **Column kinds** are detected by sampling, never configured per
//!   metric
//! - **Missing or unparseable cells** become NaN so every numeric
//!   column keeps its full row count
//! - **Timestamps** are parsed leniently; a bad cell costs that row its
//!   timestamp, not the whole file
//!
//! # Design
//!
//! Merging tables from several sources and everything statistical
//! happens downstream in `irradia-core`; this crate stops at faithfully
//! representing one file.

pub mod csv_source;
pub mod error;
pub mod schema;

pub use csv_source::{read_csv, ReadOptions};
pub use error::{IoError, IoResult};
pub use schema::{ColumnKind, ColumnMeta, SourceTable, TableSchema};
