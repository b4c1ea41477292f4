//! Merged measurement table
//!
//! All engines operate on a [`MergedTable`]: the row-wise concatenation
//! of every loadable source, tagged with its group label. After the
//! merge every row carries a group and every metric column spans the
//! full row count, with NaN standing in for cells a source never had.

use chrono::NaiveDateTime;

/// The merged dataset the analysis engines run against
#[derive(Debug, Clone)]
pub struct MergedTable {
    /// Distinct group labels in first-encountered order
    groups: Vec<String>,

    /// Per-row index into `groups`
    group_index: Vec<usize>,

    /// Metric columns in first-encountered order, each spanning every
    /// row
    columns: Vec<(String, Vec<f64>)>,

    /// Per-row timestamps when at least one source had a timestamp
    /// column
    timestamps: Option<Vec<Option<NaiveDateTime>>>,
}

impl MergedTable {
    pub(crate) fn from_parts(
        groups: Vec<String>,
        group_index: Vec<usize>,
        columns: Vec<(String, Vec<f64>)>,
        timestamps: Option<Vec<Option<NaiveDateTime>>>,
    ) -> Self {
        debug_assert!(columns.iter().all(|(_, v)| v.len() == group_index.len()));
        Self {
            groups,
            group_index,
            columns,
            timestamps,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.group_index.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.group_index.is_empty()
    }

    /// Distinct group labels in first-encountered order
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Per-row group index, parallel to every column
    pub fn group_index(&self) -> &[usize] {
        &self.group_index
    }

    /// Metric names in first-encountered order
    pub fn metrics(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Check if a metric column exists
    pub fn has_metric(&self, metric: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == metric)
    }

    /// Full column of a metric, NaN where a value is missing
    pub fn metric_values(&self, metric: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == metric)
            .map(|(_, v)| v.as_slice())
    }

    /// Row indices belonging to a group
    pub fn group_rows(&self, group: &str) -> Option<Vec<usize>> {
        let gi = self.groups.iter().position(|g| g == group)?;
        Some(
            self.group_index
                .iter()
                .enumerate()
                .filter(|(_, &g)| g == gi)
                .map(|(row, _)| row)
                .collect(),
        )
    }

    /// Usable observations of a metric within a group: the group's
    /// values with NaN dropped, in row order
    pub fn group_values(&self, metric: &str, group: &str) -> Option<Vec<f64>> {
        let values = self.metric_values(metric)?;
        let gi = self.groups.iter().position(|g| g == group)?;
        Some(
            self.group_index
                .iter()
                .zip(values)
                .filter(|(&g, v)| g == gi && v.is_finite())
                .map(|(_, &v)| v)
                .collect(),
        )
    }

    /// Per-row timestamps, if any source carried them
    pub fn timestamps(&self) -> Option<&[Option<NaiveDateTime>]> {
        self.timestamps.as_deref()
    }

    /// Earliest and latest parsed timestamps
    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let timestamps = self.timestamps.as_ref()?;
        let mut present = timestamps.iter().flatten();
        let first = present.next()?;
        let mut min = *first;
        let mut max = *first;
        for ts in present {
            if *ts < min {
                min = *ts;
            }
            if *ts > max {
                max = *ts;
            }
        }
        Some((min, max))
    }
}
