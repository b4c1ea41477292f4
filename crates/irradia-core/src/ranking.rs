//! Group ranking by mean metric value
//!
//! Descending by mean, ties broken by group name so repeated runs list
//! tied groups identically. Groups with no usable values sink to the
//! bottom with a NaN mean.

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::MergedTable;
use irradia_stats::{mean_ci, MetricSummary};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Bounds of a confidence interval around the mean
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceBounds {
    pub lower: f64,
    pub upper: f64,
}

/// One row of the ranking table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position after sorting
    pub rank: usize,
    pub group: String,
    pub mean: f64,
    /// Sample standard deviation; NaN below 2 observations
    pub std_dev: f64,
    /// Usable observations behind the mean
    pub count: usize,
    /// 95% confidence interval; `None` below 2 observations
    pub ci95: Option<ConfidenceBounds>,
}

/// Rank every group of the table by its mean for one metric.
pub fn rank(table: &MergedTable, metric: &str) -> AnalysisResult<Vec<RankingEntry>> {
    if !table.has_metric(metric) {
        return Err(AnalysisError::UnknownMetric {
            metric: metric.to_string(),
        });
    }

    let mut entries: Vec<RankingEntry> = table
        .groups()
        .iter()
        .map(|group| {
            let values = table.group_values(metric, group).unwrap_or_default();
            let summary = MetricSummary::from_values(&values);
            let ci95 = mean_ci(&values, 0.95).map(|(lower, upper)| ConfidenceBounds {
                lower,
                upper,
            });
            RankingEntry {
                rank: 0,
                group: group.clone(),
                mean: summary.mean,
                std_dev: summary.std_dev,
                count: summary.count,
                ci95,
            }
        })
        .collect();

    entries.sort_by(|a, b| match (a.mean.is_nan(), b.mean.is_nan()) {
        (true, true) => a.group.cmp(&b.group),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .mean
            .partial_cmp(&a.mean)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.group.cmp(&b.group)),
    });
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position + 1;
    }
    Ok(entries)
}
