//! Per-group descriptive statistics
//!
//! The summary table is the first thing every report shows: one row per
//! (group, metric) with counts, location, spread, and data
//! completeness. Shape diagnostics (skewness, excess kurtosis) live in
//! a second, narrower table.

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::MergedTable;
use irradia_stats::{kurtosis, skewness, MetricSummary};
use serde::{Deserialize, Serialize};

/// One row of the descriptive summary table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStatRow {
    pub group: String,
    pub metric: String,
    /// Usable observations
    pub count: usize,
    /// Share of the group's rows with no usable value, 0-100
    pub missing_pct: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Coefficient of variation in percent
    pub cv: f64,
    pub min: f64,
    pub q1: f64,
    pub q3: f64,
    /// Interquartile range (q3 - q1)
    pub iqr: f64,
    pub max: f64,
}

/// Summarize a metric for the selected groups.
///
/// Rows follow the table's group order, not the selection order. A
/// group whose values are all missing still gets a row: count 0,
/// missing 100%, NaN everywhere else.
pub fn summarize(
    table: &MergedTable,
    metric: &str,
    groups: &[&str],
) -> AnalysisResult<Vec<SummaryStatRow>> {
    let series = group_series(table, metric, groups)?;

    Ok(series
        .into_iter()
        .map(|(group, values)| {
            let summary = MetricSummary::from_values(&values);
            SummaryStatRow {
                group,
                metric: metric.to_string(),
                count: summary.count,
                missing_pct: summary.missing_pct(),
                mean: summary.mean,
                median: summary.median,
                std_dev: summary.std_dev,
                cv: summary.cv(),
                min: summary.min,
                q1: summary.q1,
                q3: summary.q3,
                iqr: summary.iqr(),
                max: summary.max,
            }
        })
        .collect())
}

/// Skewness and excess kurtosis per group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeRow {
    pub group: String,
    pub metric: String,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// Distribution-shape diagnostics for a metric, one row per selected
/// group in table order.
pub fn distribution_shape(
    table: &MergedTable,
    metric: &str,
    groups: &[&str],
) -> AnalysisResult<Vec<ShapeRow>> {
    let series = group_series(table, metric, groups)?;

    Ok(series
        .into_iter()
        .map(|(group, values)| {
            let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
            ShapeRow {
                group,
                metric: metric.to_string(),
                skewness: skewness(&finite),
                kurtosis: kurtosis(&finite),
            }
        })
        .collect())
}

// Full per-group series (NaN included) for the selected groups, in the
// table's group order.
fn group_series(
    table: &MergedTable,
    metric: &str,
    groups: &[&str],
) -> AnalysisResult<Vec<(String, Vec<f64>)>> {
    let values = table
        .metric_values(metric)
        .ok_or_else(|| AnalysisError::UnknownMetric {
            metric: metric.to_string(),
        })?;
    for group in groups {
        if !table.groups().iter().any(|g| g == group) {
            return Err(AnalysisError::UnknownGroup {
                group: group.to_string(),
            });
        }
    }

    Ok(table
        .groups()
        .iter()
        .filter(|g| groups.iter().any(|s| s == g))
        .map(|group| {
            let rows = table.group_rows(group).unwrap_or_default();
            (
                group.clone(),
                rows.iter().map(|&row| values[row]).collect(),
            )
        })
        .collect())
}
