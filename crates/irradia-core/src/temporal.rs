//! Seasonal and diurnal profiles
//!
//! Bins a metric by calendar month ("YYYY-MM") or by hour of day
//! ("00".."23"), per group. Rows without a parsed timestamp or without
//! a usable value are skipped; a table with no timestamp column
//! profiles to nothing.

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::MergedTable;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean of one metric for one group in one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileBin {
    pub group: String,
    /// "YYYY-MM" for monthly bins, "00".."23" for hourly bins
    pub period: String,
    pub mean: f64,
    pub count: usize,
}

/// Per-group monthly means of a metric.
pub fn monthly_profile(table: &MergedTable, metric: &str) -> AnalysisResult<Vec<ProfileBin>> {
    profile(table, metric, |ts| ts.format("%Y-%m").to_string())
}

/// Per-group hourly means of a metric.
pub fn hourly_profile(table: &MergedTable, metric: &str) -> AnalysisResult<Vec<ProfileBin>> {
    profile(table, metric, |ts| format!("{:02}", ts.hour()))
}

fn profile(
    table: &MergedTable,
    metric: &str,
    period_of: impl Fn(&NaiveDateTime) -> String,
) -> AnalysisResult<Vec<ProfileBin>> {
    let values = table
        .metric_values(metric)
        .ok_or_else(|| AnalysisError::UnknownMetric {
            metric: metric.to_string(),
        })?;
    let timestamps = match table.timestamps() {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let mut bins: BTreeMap<(usize, String), (f64, usize)> = BTreeMap::new();
    for ((&gi, value), timestamp) in table.group_index().iter().zip(values).zip(timestamps) {
        let ts = match timestamp {
            Some(ts) => ts,
            None => continue,
        };
        if !value.is_finite() {
            continue;
        }
        let bin = bins.entry((gi, period_of(ts))).or_insert((0.0, 0));
        bin.0 += value;
        bin.1 += 1;
    }

    Ok(bins
        .into_iter()
        .map(|((gi, period), (sum, count))| ProfileBin {
            group: table.groups()[gi].clone(),
            period,
            mean: sum / count as f64,
            count,
        })
        .collect())
}
